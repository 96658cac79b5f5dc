//! Common test utilities for integration tests.

pub mod fixtures;

use oncopredict::compute::{load_classifier, Classifier, StubClassifier};
use oncopredict::store::RecordStore;
use oncopredict::PredictionService;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub use fixtures::*;

/// Test environment holding a temporary directory for the database and
/// model artifact. Everything is removed when it is dropped.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub db_path: PathBuf,
    pub model_path: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("predictions.db");
        let model_path = temp_dir.path().join("breast_cancer_model.json");

        Self {
            temp_dir,
            db_path,
            model_path,
        }
    }

    /// Store over this environment's database file, schema not yet created.
    pub fn store(&self) -> RecordStore {
        RecordStore::new(&self.db_path)
    }

    /// Store with the prediction table already created.
    pub fn ready_store(&self) -> RecordStore {
        let store = self.store();
        store.ensure_schema().expect("Failed to create schema");
        store
    }

    /// Service backed by the radius-threshold artifact.
    pub fn artifact_service(&self) -> PredictionService {
        radius_threshold_artifact()
            .save(&self.model_path)
            .expect("Failed to write artifact");
        PredictionService::new(load_classifier(&self.model_path), self.ready_store())
    }

    /// Service backed by the always-benign stub.
    pub fn stub_service(&self) -> PredictionService {
        let classifier: Arc<dyn Classifier> = Arc::new(StubClassifier::new("test"));
        PredictionService::new(classifier, self.ready_store())
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
