//! Prediction service integration tests
//!
//! Submit, classify and persist against a real SQLite file.

#[allow(dead_code)]
mod common;

use common::{
    benign_features, features_with_radius, malignant_features, radius_threshold_artifact,
    TestDataGenerator, TestEnv,
};
use oncopredict::compute::{load_classifier, ClassifierKind, Scaler};
use oncopredict::error::FaultKind;
use oncopredict::features::parse_features;
use oncopredict::{
    FeatureVector, Label, PredictError, PredictionService, SubmitOutcome, FEATURE_COUNT,
};
use std::sync::Arc;
use std::thread;

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_wrong_feature_count_writes_nothing() {
    let env = TestEnv::new();
    let service = env.artifact_service();

    for count in [0usize, 1, 29, 31] {
        let raw = vec!["1.0"; count].join(",");
        let err = service.submit("alice", &raw).unwrap_err();
        match err {
            PredictError::FeatureCount { expected, actual } => {
                assert_eq!(expected, 30);
                assert_eq!(actual, count);
            }
            other => panic!("unexpected error for {} values: {:?}", count, other),
        }
    }

    assert_eq!(service.store().count().unwrap(), 0);
}

#[test]
fn test_non_numeric_value_writes_nothing() {
    let env = TestEnv::new();
    let service = env.artifact_service();

    let mut values: Vec<String> = (0..30).map(|i| i.to_string()).collect();
    values[7] = "abc".into();
    let err = service.submit("alice", &values.join(",")).unwrap_err();

    assert!(matches!(err, PredictError::InvalidFeature(ref v) if v == "abc"));
    assert_eq!(err.kind(), FaultKind::Validation);
    assert_eq!(service.store().count().unwrap(), 0);
}

#[test]
fn test_blank_username_rejected() {
    let env = TestEnv::new();
    let service = env.artifact_service();

    for name in ["", "   ", "\t"] {
        let err = service.submit(name, &benign_features()).unwrap_err();
        assert!(matches!(err, PredictError::EmptyName));
    }
    assert_eq!(service.store().count().unwrap(), 0);
}

// =============================================================================
// Classification and persistence
// =============================================================================

#[test]
fn test_artifact_labels_are_stored() {
    let env = TestEnv::new();
    let service = env.artifact_service();
    assert_eq!(service.classifier_kind(), ClassifierKind::Artifact);

    let benign = service.submit("alice", &benign_features()).unwrap();
    let malignant = service.submit("bob", &malignant_features()).unwrap();

    assert_eq!(benign.label(), Label::Benign);
    assert_eq!(malignant.label(), Label::Malignant);
    assert!(benign.is_saved() && malignant.is_saved());

    let listing = service.history();
    assert!(listing.error.is_none());
    assert_eq!(listing.records.len(), 2);
    assert_eq!(listing.records[0].username, "bob");
    assert_eq!(listing.records[0].label, Label::Malignant);
    assert_eq!(listing.records[1].username, "alice");
    assert_eq!(listing.records[1].label, Label::Benign);
}

#[test]
fn test_missing_artifact_falls_back_to_stub() {
    let env = TestEnv::new();
    // model_path is never written
    let service = PredictionService::new(
        oncopredict::compute::load_classifier(&env.model_path),
        env.ready_store(),
    );
    assert_eq!(service.classifier_kind(), ClassifierKind::Stub);

    let mut gen = TestDataGenerator::new(7);
    for _ in 0..5 {
        let outcome = service.submit("carol", &gen.feature_csv()).unwrap();
        assert_eq!(outcome.label(), Label::Benign);
    }
    // A feature set the real model would call malignant is still benign.
    let outcome = service.submit("carol", &malignant_features()).unwrap();
    assert_eq!(outcome.label(), Label::Benign);

    assert_eq!(service.store().count().unwrap(), 6);
}

#[test]
fn test_features_round_trip_in_column_order() {
    let env = TestEnv::new();
    let service = env.stub_service();

    let values: Vec<f64> = (1..=30).map(|i| i as f64 + 0.25).collect();
    let raw = values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let outcome = service.submit("  dave  ", &raw).unwrap();
    let id = match outcome {
        SubmitOutcome::Saved { id, .. } => id,
        other => panic!("expected saved outcome, got {:?}", other),
    };

    let records = service.history().records;
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.id, id);
    assert_eq!(record.username, "dave");
    assert_eq!(record.features, FeatureVector::from_slice(&values).unwrap());
    assert_eq!(record.features.mean_radius, 1.25);
    assert_eq!(record.features.worst_fractal_dimension, 30.25);
}

#[test]
fn test_scaled_artifact_stores_raw_values() {
    let env = TestEnv::new();
    radius_threshold_artifact()
        .with_scaler(Scaler::Standard {
            mean: vec![100.0; FEATURE_COUNT],
            scale: vec![3.0; FEATURE_COUNT],
        })
        .save(&env.model_path)
        .unwrap();
    let service = PredictionService::new(load_classifier(&env.model_path), env.ready_store());
    assert_eq!(service.classifier_kind(), ClassifierKind::Artifact);

    let mut gen = TestDataGenerator::new(21);
    let raw = gen.feature_csv();
    let parsed = parse_features(&raw).unwrap();

    let outcome = service.submit("grace", &raw).unwrap();
    assert!(outcome.is_saved());

    let records = service.history().records;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].features.to_array(), parsed.to_array());
}

#[test]
fn test_history_newest_first() {
    let env = TestEnv::new();
    let service = env.artifact_service();

    let mut ids = Vec::new();
    for i in 0..12 {
        let radius = if i % 2 == 0 { 10.0 } else { 20.0 };
        match service
            .submit(&format!("user{}", i), &features_with_radius(radius))
            .unwrap()
        {
            SubmitOutcome::Saved { id, .. } => ids.push(id),
            other => panic!("expected saved outcome, got {:?}", other),
        }
    }

    let records = service.history().records;
    assert_eq!(records.len(), 12);

    let listed: Vec<i64> = records.iter().map(|r| r.id).collect();
    ids.reverse();
    assert_eq!(listed, ids);
    assert!(records.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    assert_eq!(records[0].username, "user11");
}

// =============================================================================
// Storage faults
// =============================================================================

#[test]
fn test_unsaved_when_table_missing() {
    let env = TestEnv::new();
    let classifier = oncopredict::compute::load_classifier(&env.model_path);
    // Schema is never created.
    let service = PredictionService::new(classifier, env.store());

    let outcome = service.submit("erin", &benign_features()).unwrap();
    match outcome {
        SubmitOutcome::Unsaved { label, reason } => {
            assert_eq!(label, Label::Benign);
            assert!(!reason.is_empty());
        }
        other => panic!("expected unsaved outcome, got {:?}", other),
    }

    let listing = service.history();
    assert!(listing.records.is_empty());
    assert!(listing.error.is_some());
}

#[test]
fn test_unreadable_database_location() {
    let env = TestEnv::new();
    // A directory cannot be opened as a database file.
    let store = oncopredict::store::RecordStore::new(env.temp_dir.path());
    let service = PredictionService::new(
        oncopredict::compute::load_classifier(&env.model_path),
        store,
    );

    let outcome = service.submit("frank", &benign_features()).unwrap();
    assert!(!outcome.is_saved());
    assert!(service.history().error.is_some());
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_submissions_all_persisted() {
    let env = TestEnv::new();
    let service = Arc::new(env.artifact_service());

    let threads = 8;
    let per_thread = 10;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let service = service.clone();
            thread::spawn(move || {
                let mut gen = TestDataGenerator::new(t as u64);
                let mut ids = Vec::new();
                for _ in 0..per_thread {
                    match service.submit(&gen.username(6), &gen.feature_csv()) {
                        Ok(SubmitOutcome::Saved { id, .. }) => ids.push(id),
                        other => panic!("submission not saved: {:?}", other),
                    }
                }
                ids
            })
        })
        .collect();

    let mut ids: Vec<i64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    ids.sort_unstable();
    ids.dedup();

    assert_eq!(ids.len(), threads * per_thread);
    assert_eq!(service.store().count().unwrap(), threads * per_thread);
    assert_eq!(service.history().records.len(), threads * per_thread);
}
