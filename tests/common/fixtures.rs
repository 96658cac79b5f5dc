// Test fixtures and data generators for integration tests

use oncopredict::compute::{DecisionFunction, ModelArtifact};
use oncopredict::FEATURE_COUNT;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Mean radius above which the fixture artifact answers malignant.
pub const RADIUS_THRESHOLD: f64 = 15.0;

/// Logistic regression that looks only at mean radius:
/// malignant when `mean radius > RADIUS_THRESHOLD`.
pub fn radius_threshold_artifact() -> ModelArtifact {
    let mut coefficients = vec![0.0; FEATURE_COUNT];
    coefficients[0] = 1.0;
    ModelArtifact::new(DecisionFunction::LogisticRegression {
        coefficients,
        intercept: -RADIUS_THRESHOLD,
        threshold: 0.5,
    })
    .with_name("radius-threshold")
}

/// Comma-joined features with the given mean radius and 1.0 everywhere else.
pub fn features_with_radius(radius: f64) -> String {
    std::iter::once(radius)
        .chain(std::iter::repeat(1.0).take(FEATURE_COUNT - 1))
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// A clearly benign submission for the fixture artifact.
pub fn benign_features() -> String {
    features_with_radius(10.0)
}

/// A clearly malignant submission for the fixture artifact.
pub fn malignant_features() -> String {
    features_with_radius(20.0)
}

/// Deterministic random data generator for reproducible tests
pub struct TestDataGenerator {
    rng: StdRng,
}

impl TestDataGenerator {
    /// Creates a new generator with a fixed seed for reproducibility
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Thirty measurements in a plausible positive range
    pub fn feature_values(&mut self) -> Vec<f64> {
        (0..FEATURE_COUNT)
            .map(|_| (self.rng.gen_range(0.0..30.0) * 1000.0_f64).round() / 1000.0)
            .collect()
    }

    /// Random values joined the way the entry form sends them
    pub fn feature_csv(&mut self) -> String {
        self.feature_values()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Generates a random user name of specified length
    pub fn username(&mut self, len: usize) -> String {
        (&mut self.rng)
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }
}

impl Default for TestDataGenerator {
    fn default() -> Self {
        Self::new(42)
    }
}
