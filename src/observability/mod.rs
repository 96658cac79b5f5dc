//! Observability module.
//!
//! Provides logging initialisation, Prometheus metrics and the counters the
//! prediction pipeline records.

use crate::config::ObservabilityConfig;
use crate::error::{PredictError, Result};
use crate::types::Label;
use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging.
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json())
            .try_init()
            .map_err(|e| PredictError::Internal(format!("Failed to init logging: {}", e)))?;
    } else {
        subscriber
            .with(fmt::layer())
            .try_init()
            .map_err(|e| PredictError::Internal(format!("Failed to init logging: {}", e)))?;
    }

    info!("Observability initialized");
    Ok(())
}

/// Run the Prometheus metrics server.
pub async fn run_metrics_server(config: ObservabilityConfig) -> Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| PredictError::Internal(format!("Failed to install metrics recorder: {}", e)))?;

    register_metrics();

    let app = axum::Router::new()
        .route("/metrics", axum::routing::get(move || async move {
            handle.render()
        }))
        .route("/health", axum::routing::get(|| async { "OK" }));

    let listener = TcpListener::bind(config.metrics_addr).await?;
    info!(addr = %config.metrics_addr, "Metrics server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| PredictError::Network(e.to_string()))?;

    Ok(())
}

/// Register standard metrics.
fn register_metrics() {
    for outcome in ["saved", "unsaved", "rejected", "failed"] {
        counter!("oncopredict_submissions_total", "outcome" => outcome).absolute(0);
    }
    for label in [Label::Benign, Label::Malignant] {
        counter!("oncopredict_predictions_total", "label" => label.name()).absolute(0);
    }
    for operation in ["append", "list"] {
        counter!("oncopredict_storage_errors_total", "operation" => operation).absolute(0);
    }
}

/// Record the outcome of one submission.
pub fn record_submission(outcome: &'static str) {
    counter!("oncopredict_submissions_total", "outcome" => outcome).increment(1);
}

/// Record a computed label.
pub fn record_prediction(label: Label) {
    counter!("oncopredict_predictions_total", "label" => label.name()).increment(1);
}

/// Record a failed store operation.
pub fn record_storage_error(operation: &'static str) {
    counter!("oncopredict_storage_errors_total", "operation" => operation).increment(1);
}
