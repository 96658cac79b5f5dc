//! Web front end: entry form, history table, JSON API and health endpoint.

pub mod handlers;
pub mod pages;

use crate::error::{PredictError, Result};
use crate::service::PredictionService;
use crate::shutdown::ShutdownCoordinator;
use axum::{routing::get, Router};
use handlers::*;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::info;

/// Shared state for handlers.
#[derive(Clone)]
pub struct AppState {
    /// Prediction pipeline, shared read-only by every request.
    pub service: Arc<PredictionService>,
    /// When the server started, for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(service: Arc<PredictionService>) -> Self {
        Self {
            service,
            start_time: Instant::now(),
        }
    }
}

/// Build the router with every route.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(show_form).post(submit_form))
        .route("/records", get(list_records))
        .route("/api/predictions", get(api_list).post(api_submit))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Serve until the coordinator signals shutdown.
pub async fn run_web_server(
    bind_addr: SocketAddr,
    service: Arc<PredictionService>,
    coordinator: ShutdownCoordinator,
) -> Result<()> {
    let app = router(AppState::new(service));

    let listener = TcpListener::bind(bind_addr).await?;
    info!(addr = %bind_addr, "Web server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { coordinator.wait_for_shutdown().await })
        .await
        .map_err(|e| PredictError::Network(e.to_string()))?;

    info!("Web server stopped");
    Ok(())
}
