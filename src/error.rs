//! Error types for the prediction service.
//!
//! This module provides a unified error type [`PredictError`] for all
//! operations, along with a convenient [`Result`] type alias.
//!
//! # Error Categories
//!
//! Every variant falls into one of four [`FaultKind`]s:
//!
//! - **Validation**: malformed or missing input; always user-correctable and
//!   always raised before any side effect
//! - **Prediction**: the classifier failed while scaling or scoring a vector
//! - **Storage**: schema creation or a row read/write failed
//! - **Internal**: configuration, IO, serialization and network plumbing
//!
//! # Example
//!
//! ```rust
//! use oncopredict::error::{FaultKind, PredictError, Result};
//!
//! fn require_name(name: &str) -> Result<&str> {
//!     let name = name.trim();
//!     if name.is_empty() {
//!         return Err(PredictError::EmptyName);
//!     }
//!     Ok(name)
//! }
//!
//! let err = require_name("   ").unwrap_err();
//! assert_eq!(err.kind(), FaultKind::Validation);
//! ```

use serde::Serialize;
use std::io;
use thiserror::Error;

/// Main error type for prediction service operations.
#[derive(Error, Debug)]
pub enum PredictError {
    // Validation faults
    #[error("Username is required")]
    EmptyName,

    #[error("All feature fields must be valid numbers (could not parse {0:?})")]
    InvalidFeature(String),

    #[error("Expected {expected} feature values, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    // Prediction faults
    #[error("Prediction failed: {0}")]
    Prediction(String),

    #[error("Dimension mismatch in {stage}: model expects {expected} values, got {actual}")]
    DimensionMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    // Storage faults
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Schema mismatch: table {table} is missing columns {missing:?}")]
    SchemaMismatch { table: String, missing: Vec<String> },

    #[error("Corrupt record {id}: {reason}")]
    CorruptRecord { id: i64, reason: String },

    // Model artifact errors (recovered at startup by the stub fallback)
    #[error("Model artifact error: {0}")]
    Artifact(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    // External errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`PredictError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultKind {
    Validation,
    Prediction,
    Storage,
    Internal,
}

impl PredictError {
    /// Which fault category this error belongs to.
    pub fn kind(&self) -> FaultKind {
        match self {
            PredictError::EmptyName
            | PredictError::InvalidFeature(_)
            | PredictError::FeatureCount { .. } => FaultKind::Validation,
            PredictError::Prediction(_) | PredictError::DimensionMismatch { .. } => {
                FaultKind::Prediction
            }
            PredictError::Storage(_)
            | PredictError::SchemaMismatch { .. }
            | PredictError::CorruptRecord { .. } => FaultKind::Storage,
            _ => FaultKind::Internal,
        }
    }

    /// Check if the caller can fix the error by changing their input.
    pub fn is_user_correctable(&self) -> bool {
        self.kind() == FaultKind::Validation
    }

    /// HTTP status code used when the error reaches the web layer.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            FaultKind::Validation => 422,
            FaultKind::Storage => 503,
            FaultKind::Prediction | FaultKind::Internal => 500,
        }
    }
}

impl From<rusqlite::Error> for PredictError {
    fn from(e: rusqlite::Error) -> Self {
        PredictError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for PredictError {
    fn from(e: serde_json::Error) -> Self {
        PredictError::Serialization(e.to_string())
    }
}

/// Result type alias for prediction service operations.
pub type Result<T> = std::result::Result<T, PredictError>;
