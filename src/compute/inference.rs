// Classifier Gateway

use super::model::ModelArtifact;
use crate::error::Result;
use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::types::Label;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Which implementation is serving predictions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierKind {
    /// A trained artifact loaded from disk
    Artifact,
    /// Always-benign fallback
    Stub,
}

/// Binary classifier over a full feature vector.
///
/// Implementations are immutable once built and shared across requests
/// behind an `Arc`.
pub trait Classifier: Send + Sync {
    /// Scales the vector (if the implementation carries a scaler) and
    /// returns the predicted label.
    fn classify(&self, features: &FeatureVector) -> Result<Label>;

    /// Implementation kind
    fn kind(&self) -> ClassifierKind;

    /// Short description for logs and health output
    fn describe(&self) -> String;
}

/// Classifier backed by a loaded [`ModelArtifact`]
#[derive(Debug, Clone)]
pub struct ArtifactClassifier {
    artifact: ModelArtifact,
}

impl ArtifactClassifier {
    /// Wraps an artifact
    pub fn new(artifact: ModelArtifact) -> Self {
        Self { artifact }
    }

    /// Gets the artifact
    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }
}

impl Classifier for ArtifactClassifier {
    fn classify(&self, features: &FeatureVector) -> Result<Label> {
        let positive = self.artifact.predict(&features.to_array())?;
        Ok(if positive {
            Label::Malignant
        } else {
            Label::Benign
        })
    }

    fn kind(&self) -> ClassifierKind {
        ClassifierKind::Artifact
    }

    fn describe(&self) -> String {
        let name = self.artifact.metadata.name.as_deref().unwrap_or("unnamed");
        let scaler = if self.artifact.scaler.is_some() {
            "with scaler"
        } else {
            "no scaler"
        };
        format!("artifact '{}' ({})", name, scaler)
    }
}

/// Fallback used when no usable artifact exists: identity scaling, always benign
#[derive(Debug, Clone, Default)]
pub struct StubClassifier {
    reason: String,
}

impl StubClassifier {
    /// Creates a stub, remembering why it was substituted
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Why the stub is active
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Classifier for StubClassifier {
    fn classify(&self, _features: &FeatureVector) -> Result<Label> {
        Ok(Label::Benign)
    }

    fn kind(&self) -> ClassifierKind {
        ClassifierKind::Stub
    }

    fn describe(&self) -> String {
        format!("stub classifier (always benign): {}", self.reason)
    }
}

/// Loads the classifier once at startup.
///
/// A missing or undecodable artifact never fails startup: it is logged and
/// replaced by a [`StubClassifier`].
pub fn load_classifier(path: &Path) -> Arc<dyn Classifier> {
    match ModelArtifact::from_file(path) {
        Ok(artifact) => {
            for (stage, dim) in artifact.dimension_mismatches(FEATURE_COUNT) {
                warn!(
                    path = %path.display(),
                    stage,
                    expected = FEATURE_COUNT,
                    actual = dim,
                    "Model artifact dimension does not match the feature schema"
                );
            }
            let classifier = ArtifactClassifier::new(artifact);
            info!(path = %path.display(), model = %classifier.describe(), "Model artifact loaded");
            Arc::new(classifier)
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Model artifact unavailable, falling back to stub classifier"
            );
            Arc::new(StubClassifier::new(e.to_string()))
        }
    }
}
