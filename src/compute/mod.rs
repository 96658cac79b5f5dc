//! Model gateway
//!
//! Loads the trained classifier once at startup and exposes it through the
//! [`Classifier`] trait:
//! - JSON artifact format (bare decision function or classifier + scaler bundle)
//! - Logistic regression and linear SVM decision functions
//! - Standard and min-max scalers
//! - Always-benign stub when the artifact is missing or corrupt

pub mod inference;
pub mod model;

pub use inference::{load_classifier, ArtifactClassifier, Classifier, ClassifierKind, StubClassifier};
pub use model::{ArtifactMetadata, DecisionFunction, ModelArtifact, Scaler};
