//! Prediction service: validate, classify, persist.
//!
//! [`PredictionService::submit`] is a short-circuiting pipeline. The first
//! failing step ends it, and nothing is written unless every validation and
//! the classifier succeeded. A storage failure after a successful
//! prediction is not an error: it comes back as
//! [`SubmitOutcome::Unsaved`] so callers can tell the user the label was
//! computed but not kept.

use crate::compute::{Classifier, ClassifierKind};
use crate::error::{PredictError, Result};
use crate::features::parse_features;
use crate::observability;
use crate::store::RecordStore;
use crate::types::{Label, NewPrediction, PredictionRecord, RecordId};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of a submission that produced a label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SubmitOutcome {
    /// Label computed and row written.
    Saved { id: RecordId, label: Label },
    /// Label computed but the row could not be written.
    Unsaved { label: Label, reason: String },
}

impl SubmitOutcome {
    /// The computed label, saved or not.
    pub fn label(&self) -> Label {
        match self {
            SubmitOutcome::Saved { label, .. } | SubmitOutcome::Unsaved { label, .. } => *label,
        }
    }

    /// Whether the row is durable.
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved { .. })
    }
}

/// History listing. A failed read yields no records and the error text.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordListing {
    pub records: Vec<PredictionRecord>,
    pub error: Option<String>,
}

/// Ties the classifier to the record store.
pub struct PredictionService {
    classifier: Arc<dyn Classifier>,
    store: RecordStore,
}

impl PredictionService {
    /// Create a service from a classifier loaded at startup and a store.
    pub fn new(classifier: Arc<dyn Classifier>, store: RecordStore) -> Self {
        Self { classifier, store }
    }

    /// The record store.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Which classifier implementation is active.
    pub fn classifier_kind(&self) -> ClassifierKind {
        self.classifier.kind()
    }

    /// Description of the active classifier.
    pub fn classifier_description(&self) -> String {
        self.classifier.describe()
    }

    /// Validate, classify and persist one submission.
    pub fn submit(&self, username: &str, raw_features: &str) -> Result<SubmitOutcome> {
        let username = username.trim();
        if username.is_empty() {
            observability::record_submission("rejected");
            return Err(PredictError::EmptyName);
        }

        let features = parse_features(raw_features).map_err(|e| {
            observability::record_submission("rejected");
            e
        })?;

        let label = self.classifier.classify(&features).map_err(|e| {
            warn!(user = %username, error = %e, "Classifier failed");
            observability::record_submission("failed");
            e
        })?;
        observability::record_prediction(label);

        let prediction = NewPrediction {
            username: username.to_string(),
            label,
            features,
        };

        match self.store.append(&prediction) {
            Ok(id) => {
                info!(id, user = %username, label = %label, "Prediction saved");
                observability::record_submission("saved");
                Ok(SubmitOutcome::Saved { id, label })
            }
            Err(e) => {
                warn!(user = %username, label = %label, error = %e, "Prediction computed but not saved");
                observability::record_storage_error("append");
                observability::record_submission("unsaved");
                Ok(SubmitOutcome::Unsaved {
                    label,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Full history, newest first.
    pub fn history(&self) -> RecordListing {
        match self.store.list_all() {
            Ok(records) => RecordListing {
                records,
                error: None,
            },
            Err(e) => {
                warn!(error = %e, "Failed to read prediction history");
                observability::record_storage_error("list");
                RecordListing {
                    records: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
