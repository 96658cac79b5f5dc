//! Command-line interface for Oncopredict.

use crate::config::PredictorConfig;
use crate::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Oncopredict - breast-cancer screening predictions with a stored history.
#[derive(Parser)]
#[command(name = "oncopredict")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (JSON)
    #[arg(short, long, env = "ONCOPREDICT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long, env = "ONCOPREDICT_LOG_LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// SQLite database file
        #[arg(long)]
        database: Option<PathBuf>,

        /// Model artifact file
        #[arg(long)]
        model: Option<PathBuf>,
    },

    /// Classify one set of measurements and store it
    Submit {
        /// Name recorded with the prediction
        #[arg(short, long)]
        username: String,

        /// 30 comma-separated measurements
        #[arg(short, long)]
        features: String,
    },

    /// Print the stored history, newest first
    Records,

    /// Create the prediction table if it does not exist
    InitDb,

    /// Show version information
    Version,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Configuration from `--config` (or defaults), with global flags applied.
    pub fn load_config(&self) -> Result<PredictorConfig> {
        let mut config = match &self.config {
            Some(path) => PredictorConfig::from_file(path)?,
            None => PredictorConfig::default(),
        };
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
        Ok(config)
    }
}
