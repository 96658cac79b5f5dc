//! Health report for `GET /health`: a database round trip and the active
//! classifier.

use crate::compute::ClassifierKind;
use crate::service::PredictionService;
use serde::Serialize;
use std::time::Instant;

/// Component or overall status. Ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    /// Serving, but with the stub classifier.
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// HTTP status for the report. Degraded still answers 200.
    pub fn to_status_code(self) -> u16 {
        match self {
            HealthStatus::Healthy | HealthStatus::Degraded => 200,
            HealthStatus::Unhealthy => 503,
        }
    }
}

/// One checked component.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: &'static str,
    pub status: HealthStatus,
    /// Database path or classifier description, plus the failure if any.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Worst component status.
    pub status: HealthStatus,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub components: Vec<ComponentHealth>,
    pub timestamp: String,
}

/// `SELECT 1` against the configured database file.
pub fn check_database(service: &PredictionService) -> ComponentHealth {
    let start = Instant::now();
    let path = service.store().path().display();
    let (status, message) = match service.store().ping() {
        Ok(()) => (HealthStatus::Healthy, path.to_string()),
        Err(e) => (HealthStatus::Unhealthy, format!("{}: {}", path, e)),
    };
    ComponentHealth {
        name: "database",
        status,
        message,
        latency_ms: Some(start.elapsed().as_millis() as u64),
    }
}

/// Which classifier is serving predictions. The stub is degraded.
pub fn check_model(service: &PredictionService) -> ComponentHealth {
    let status = match service.classifier_kind() {
        ClassifierKind::Artifact => HealthStatus::Healthy,
        ClassifierKind::Stub => HealthStatus::Degraded,
    };
    ComponentHealth {
        name: "model",
        status,
        message: service.classifier_description(),
        latency_ms: None,
    }
}

/// Run every check for the service.
pub fn check_health(service: &PredictionService, start_time: Instant) -> HealthResponse {
    let components = vec![check_database(service), check_model(service)];
    let status = components
        .iter()
        .map(|c| c.status)
        .max()
        .unwrap_or(HealthStatus::Healthy);

    HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: start_time.elapsed().as_secs(),
        components,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::StubClassifier;
    use crate::store::RecordStore;
    use std::sync::Arc;

    #[test]
    fn test_status_order_and_codes() {
        assert!(HealthStatus::Healthy < HealthStatus::Degraded);
        assert!(HealthStatus::Degraded < HealthStatus::Unhealthy);
        assert_eq!(HealthStatus::Degraded.to_status_code(), 200);
        assert_eq!(HealthStatus::Unhealthy.to_status_code(), 503);
    }

    #[test]
    fn test_stub_model_is_degraded() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("predictions.db"));
        store.ensure_schema().unwrap();
        let service = PredictionService::new(Arc::new(StubClassifier::new("missing")), store);

        let health = check_health(&service, Instant::now());
        assert_eq!(health.status, HealthStatus::Degraded);
        assert_eq!(health.components.len(), 2);
        assert_eq!(health.components[0].status, HealthStatus::Healthy);
        assert!(health.components[1].message.contains("always benign"));
    }

    #[test]
    fn test_unreachable_database_is_unhealthy() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("missing-dir").join("x.db"));
        let service = PredictionService::new(Arc::new(StubClassifier::new("missing")), store);

        let health = check_database(&service);
        assert_eq!(health.status, HealthStatus::Unhealthy);
        assert!(health.message.contains("x.db"));
        assert_eq!(check_health(&service, Instant::now()).status.to_status_code(), 503);
    }
}
