//! Oncopredict CLI - Main entry point.

use oncopredict::cli::{Cli, Commands};
use oncopredict::store::RecordStore;
use oncopredict::SubmitOutcome;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    let mut config = cli.load_config()?;

    match cli.command {
        Commands::Serve {
            port,
            database,
            model,
        } => {
            if let Some(port) = port {
                config = config.with_port(port);
            }
            if let Some(database) = database {
                config.storage.database_path = database;
            }
            if let Some(model) = model {
                config.model.artifact_path = model;
            }

            oncopredict::observability::init(&config.observability)?;
            oncopredict::run(config).await?;
        }

        Commands::Submit { username, features } => {
            oncopredict::observability::init(&config.observability)?;
            let service = oncopredict::build_service(&config)?;

            match service.submit(&username, &features) {
                Ok(SubmitOutcome::Saved { id, label }) => {
                    println!("Prediction for {}: {} (record #{})", username.trim(), label, id);
                }
                Ok(SubmitOutcome::Unsaved { label, reason }) => {
                    println!("Prediction for {}: {}", username.trim(), label);
                    eprintln!("Warning: prediction was not saved: {}", reason);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Records => {
            oncopredict::observability::init(&config.observability)?;
            let store = RecordStore::from_config(&config.storage);
            let records = store.list_all()?;

            if records.is_empty() {
                println!("(no predictions)");
            }
            for record in &records {
                println!(
                    "#{:<6} {:<20} {}  {:<9}  {}",
                    record.id,
                    record.username,
                    record.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    record.label_name(),
                    record.features.to_csv()
                );
            }
            println!("Total: {} prediction(s)", records.len());
        }

        Commands::InitDb => {
            oncopredict::observability::init(&config.observability)?;
            let store = RecordStore::from_config(&config.storage);
            store.ensure_schema()?;
            println!("Prediction table ready in {}", store.path().display());
        }

        Commands::Version => {
            println!("oncopredict {}", env!("CARGO_PKG_VERSION"));
            println!("Features per prediction: {}", oncopredict::FEATURE_COUNT);
        }
    }

    Ok(())
}
