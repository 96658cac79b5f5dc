//! The fixed feature schema: 30 named clinical measurements.
//!
//! The schema is declared exactly once, in [`define_features!`]. That single
//! ordered list generates the display names, the sanitized column names and
//! the typed [`FeatureVector`] struct, so the store's column list, the
//! store's value list and the classifier's input order cannot drift apart.

use crate::error::{PredictError, Result};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Number of measurements in a feature vector.
pub const FEATURE_COUNT: usize = 30;

macro_rules! define_features {
    ($($field:ident => $name:literal),+ $(,)?) => {
        /// Display names, in classifier input order.
        pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [$($name),+];

        /// Column names, in classifier input order.
        pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [$(stringify!($field)),+];

        /// One submission's measurements, one named field per column.
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        pub struct FeatureVector {
            $(pub $field: f64,)+
        }

        impl FeatureVector {
            /// Values in schema order.
            pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
                [$(self.$field),+]
            }

            /// Build from values in schema order.
            pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
                let [$($field),+] = values;
                Self { $($field),+ }
            }
        }
    };
}

define_features! {
    mean_radius => "mean radius",
    mean_texture => "mean texture",
    mean_perimeter => "mean perimeter",
    mean_area => "mean area",
    mean_smoothness => "mean smoothness",
    mean_compactness => "mean compactness",
    mean_concavity => "mean concavity",
    mean_concave_points => "mean concave points",
    mean_symmetry => "mean symmetry",
    mean_fractal_dimension => "mean fractal dimension",
    radius_error => "radius error",
    texture_error => "texture error",
    perimeter_error => "perimeter error",
    area_error => "area error",
    smoothness_error => "smoothness error",
    compactness_error => "compactness error",
    concavity_error => "concavity error",
    concave_points_error => "concave points error",
    symmetry_error => "symmetry error",
    fractal_dimension_error => "fractal dimension error",
    worst_radius => "worst radius",
    worst_texture => "worst texture",
    worst_perimeter => "worst perimeter",
    worst_area => "worst area",
    worst_smoothness => "worst smoothness",
    worst_compactness => "worst compactness",
    worst_concavity => "worst concavity",
    worst_concave_points => "worst concave points",
    worst_symmetry => "worst symmetry",
    worst_fractal_dimension => "worst fractal dimension",
}

/// Column name for a display name.
pub fn column_name(feature_name: &str) -> String {
    feature_name.replace(' ', "_")
}

impl FeatureVector {
    /// Build from a slice, rejecting anything but exactly 30 values.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        let array: [f64; FEATURE_COUNT] =
            values.try_into().map_err(|_| PredictError::FeatureCount {
                expected: FEATURE_COUNT,
                actual: values.len(),
            })?;
        Ok(Self::from_array(array))
    }

    /// `(column, value)` pairs in schema order.
    pub fn columns(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_COLUMNS.into_iter().zip(self.to_array())
    }

    /// Render as the comma-separated form accepted by [`parse_features`].
    pub fn to_csv(&self) -> String {
        self.to_array()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (column, value) in self.columns() {
            map.serialize_entry(column, &value)?;
        }
        map.end()
    }
}

/// Parse a comma-separated list of 30 decimal numbers.
///
/// Empty fragments left by stray separators are skipped. The first fragment
/// that is not a finite number rejects the whole input.
pub fn parse_features(raw: &str) -> Result<FeatureVector> {
    let mut values = Vec::with_capacity(FEATURE_COUNT);
    for fragment in raw.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        let value: f64 = fragment
            .parse()
            .map_err(|_| PredictError::InvalidFeature(fragment.to_string()))?;
        if !value.is_finite() {
            return Err(PredictError::InvalidFeature(fragment.to_string()));
        }
        values.push(value);
    }
    FeatureVector::from_slice(&values)
}
