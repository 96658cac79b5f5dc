//! Oncopredict - breast-cancer screening predictions over a small web service.
//!
//! A user submits 30 clinical measurements, a pre-trained binary classifier
//! labels them benign or malignant, and every prediction is kept in a
//! SQLite history that can be listed newest first.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Web: entry form | history table | JSON API | health        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  PredictionService: validate -> classify -> persist         │
//! ├──────────────────────────────┬──────────────────────────────┤
//! │  Model gateway               │  Record store                │
//! │  artifact or benign stub     │  SQLite, one table           │
//! └──────────────────────────────┴──────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use oncopredict::config::PredictorConfig;
//!
//! #[tokio::main]
//! async fn main() -> oncopredict::Result<()> {
//!     let config = PredictorConfig::development();
//!     oncopredict::observability::init(&config.observability)?;
//!     oncopredict::run(config).await
//! }
//! ```

pub mod config;
pub mod error;
pub mod features;
pub mod types;

pub mod cli;
pub mod compute;
pub mod health;
pub mod observability;
pub mod service;
pub mod shutdown;
pub mod store;
pub mod web;

// Re-exports
pub use error::{PredictError, Result};
pub use features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use service::{PredictionService, RecordListing, SubmitOutcome};
pub use types::{Label, PredictionRecord};

use config::PredictorConfig;
use shutdown::{ShutdownCoordinator, SignalHandler};
use std::sync::Arc;
use store::RecordStore;
use tracing::{error, info};

/// Prepare the store and load the classifier.
///
/// Fails only if the schema cannot be ensured; a missing model artifact
/// falls back to the stub classifier.
pub fn build_service(config: &PredictorConfig) -> Result<PredictionService> {
    let store = RecordStore::from_config(&config.storage);
    store.ensure_schema()?;
    info!(path = %store.path().display(), "Prediction table ready");

    let classifier = compute::load_classifier(&config.model.artifact_path);
    Ok(PredictionService::new(classifier, store))
}

/// Run the web service with the given configuration.
pub async fn run(config: PredictorConfig) -> Result<()> {
    config.validate()?;
    info!(addr = %config.server.bind_addr, "Starting prediction service");

    let service = Arc::new(build_service(&config)?);
    let coordinator = ShutdownCoordinator::new();

    if config.observability.metrics_enabled {
        info!("Starting metrics server on {}", config.observability.metrics_addr);
        let obs_config = config.observability.clone();
        let metrics_coordinator = coordinator.clone();

        tokio::spawn(async move {
            tokio::select! {
                result = observability::run_metrics_server(obs_config) => {
                    if let Err(e) = result {
                        error!("Metrics server error: {}", e);
                    }
                }
                _ = metrics_coordinator.wait_for_shutdown() => {}
            }
        });
    }

    let signal_coordinator = coordinator.clone();
    tokio::spawn(async move {
        SignalHandler::new(signal_coordinator).run().await;
    });

    web::run_web_server(config.server.bind_addr, service, coordinator).await?;

    info!("Prediction service shutdown complete");
    Ok(())
}
