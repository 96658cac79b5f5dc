// Classifier Artifact Definition

use crate::error::{PredictError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Decision function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecisionFunction {
    /// Logistic regression: sigmoid(w.x + b) >= threshold is malignant
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
    /// Linear SVM: w.x + b > 0 is malignant
    LinearSvm {
        coefficients: Vec<f64>,
        intercept: f64,
    },
}

fn default_threshold() -> f64 {
    0.5
}

impl DecisionFunction {
    /// Number of inputs the function was trained on
    pub fn input_dim(&self) -> usize {
        match self {
            DecisionFunction::LogisticRegression { coefficients, .. }
            | DecisionFunction::LinearSvm { coefficients, .. } => coefficients.len(),
        }
    }

    /// Signed distance from the decision boundary
    pub fn margin(&self, inputs: &[f64]) -> Result<f64> {
        let (coefficients, intercept) = match self {
            DecisionFunction::LogisticRegression {
                coefficients,
                intercept,
                ..
            }
            | DecisionFunction::LinearSvm {
                coefficients,
                intercept,
            } => (coefficients, *intercept),
        };
        if coefficients.len() != inputs.len() {
            return Err(PredictError::DimensionMismatch {
                stage: "decision function",
                expected: coefficients.len(),
                actual: inputs.len(),
            });
        }
        let margin = coefficients
            .iter()
            .zip(inputs)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + intercept;
        if !margin.is_finite() {
            return Err(PredictError::Prediction(
                "decision function produced a non-finite margin".to_string(),
            ));
        }
        Ok(margin)
    }

    /// Whether the inputs fall on the malignant side
    pub fn is_positive(&self, inputs: &[f64]) -> Result<bool> {
        let margin = self.margin(inputs)?;
        Ok(match self {
            DecisionFunction::LogisticRegression { threshold, .. } => {
                sigmoid(margin) >= *threshold
            }
            DecisionFunction::LinearSvm { .. } => margin > 0.0,
        })
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Feature scaling transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Scaler {
    /// (x - mean) / scale
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// x * scale + min
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

impl Scaler {
    /// Number of inputs the scaler was fitted on
    pub fn input_dim(&self) -> usize {
        match self {
            Scaler::Standard { mean, .. } => mean.len(),
            Scaler::MinMax { min, .. } => min.len(),
        }
    }

    /// Applies the transform, returning a new vector
    pub fn transform(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        let (offsets, scale) = match self {
            Scaler::Standard { mean, scale } => (mean, scale),
            Scaler::MinMax { min, scale } => (min, scale),
        };
        for len in [offsets.len(), scale.len()] {
            if len != inputs.len() {
                return Err(PredictError::DimensionMismatch {
                    stage: "scaler",
                    expected: len,
                    actual: inputs.len(),
                });
            }
        }

        let scaled: Vec<f64> = match self {
            Scaler::Standard { .. } => inputs
                .iter()
                .zip(offsets.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / s)
                .collect(),
            Scaler::MinMax { .. } => inputs
                .iter()
                .zip(offsets.iter().zip(scale))
                .map(|(x, (m, s))| x * s + m)
                .collect(),
        };

        if scaled.iter().any(|v| !v.is_finite()) {
            return Err(PredictError::Prediction(
                "scaler produced a non-finite value".to_string(),
            ));
        }
        Ok(scaled)
    }
}

/// Artifact metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Model name, shown in logs and the health report
    #[serde(default)]
    pub name: Option<String>,
}

/// On-disk layout: either a bare decision function or a bundle
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ArtifactFile {
    Bundle {
        classifier: DecisionFunction,
        #[serde(default)]
        scaler: Option<Scaler>,
        #[serde(default)]
        metadata: ArtifactMetadata,
    },
    Bare(DecisionFunction),
}

/// A trained classifier with its optional scaler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Decision function
    pub classifier: DecisionFunction,
    /// Scaling applied before the decision function
    pub scaler: Option<Scaler>,
    /// Metadata
    #[serde(default)]
    pub metadata: ArtifactMetadata,
}

impl ModelArtifact {
    /// Creates an artifact without a scaler
    pub fn new(classifier: DecisionFunction) -> Self {
        Self {
            classifier,
            scaler: None,
            metadata: ArtifactMetadata::default(),
        }
    }

    /// Sets the scaler
    pub fn with_scaler(mut self, scaler: Scaler) -> Self {
        self.scaler = Some(scaler);
        self
    }

    /// Sets the model name
    pub fn with_name(mut self, name: &str) -> Self {
        self.metadata.name = Some(name.to_string());
        self
    }

    /// Decodes either accepted layout
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let file: ArtifactFile = serde_json::from_slice(bytes)
            .map_err(|e| PredictError::Artifact(format!("undecodable artifact: {}", e)))?;
        Ok(match file {
            ArtifactFile::Bundle {
                classifier,
                scaler,
                metadata,
            } => Self {
                classifier,
                scaler,
                metadata,
            },
            ArtifactFile::Bare(classifier) => Self::new(classifier),
        })
    }

    /// Reads and decodes an artifact file
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            PredictError::Artifact(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&bytes)
    }

    /// Writes the artifact in bundle layout
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Input dimensions that disagree with `expected`, as (stage, dim)
    pub fn dimension_mismatches(&self, expected: usize) -> Vec<(&'static str, usize)> {
        let mut mismatches = Vec::new();
        if let Some(scaler) = &self.scaler {
            if scaler.input_dim() != expected {
                mismatches.push(("scaler", scaler.input_dim()));
            }
        }
        if self.classifier.input_dim() != expected {
            mismatches.push(("decision function", self.classifier.input_dim()));
        }
        mismatches
    }

    /// Scales (if configured) then scores the inputs
    pub fn predict(&self, inputs: &[f64]) -> Result<bool> {
        match &self.scaler {
            Some(scaler) => {
                let scaled = scaler.transform(inputs)?;
                self.classifier.is_positive(&scaled)
            }
            None => self.classifier.is_positive(inputs),
        }
    }
}
