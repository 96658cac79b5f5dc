//! Core domain types shared by the service, the store and the web layer.

use crate::error::PredictError;
use crate::features::FeatureVector;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row identifier assigned by the store.
pub type RecordId = i64;

/// Binary classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Label {
    /// 0
    Benign,
    /// 1
    Malignant,
}

impl Label {
    /// Integer stored in the `prediction` column.
    pub fn as_i64(self) -> i64 {
        match self {
            Label::Benign => 0,
            Label::Malignant => 1,
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Label::Benign => "Benign",
            Label::Malignant => "Malignant",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Label> for u8 {
    fn from(label: Label) -> Self {
        label.as_i64() as u8
    }
}

impl TryFrom<u8> for Label {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Label::try_from(i64::from(value)).map_err(|e| e.to_string())
    }
}

impl TryFrom<i64> for Label {
    type Error = PredictError;

    fn try_from(value: i64) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Label::Benign),
            1 => Ok(Label::Malignant),
            other => Err(PredictError::Prediction(format!(
                "label must be 0 or 1, got {}",
                other
            ))),
        }
    }
}

/// A prediction about to be persisted. Id and timestamp come from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPrediction {
    pub username: String,
    pub label: Label,
    /// Raw submitted values, never the scaled ones.
    pub features: FeatureVector,
}

/// One stored row of the prediction history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    pub id: RecordId,
    pub username: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "prediction")]
    pub label: Label,
    pub features: FeatureVector,
}

impl PredictionRecord {
    /// Human-readable label name, for listings.
    pub fn label_name(&self) -> &'static str {
        self.label.name()
    }
}
