//! Benchmarks for feature parsing and classification.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use oncopredict::compute::{
    ArtifactClassifier, Classifier, DecisionFunction, ModelArtifact, Scaler, StubClassifier,
};
use oncopredict::features::parse_features;
use oncopredict::FEATURE_COUNT;

fn sample_csv() -> String {
    (0..FEATURE_COUNT)
        .map(|i| format!("{:.4}", 0.5 + i as f64 * 1.37))
        .collect::<Vec<_>>()
        .join(", ")
}

fn logistic() -> DecisionFunction {
    DecisionFunction::LogisticRegression {
        coefficients: (0..FEATURE_COUNT).map(|i| (i as f64 - 15.0) / 10.0).collect(),
        intercept: -0.3,
        threshold: 0.5,
    }
}

fn create_classifiers() -> Vec<(&'static str, Box<dyn Classifier>)> {
    let standard = Scaler::Standard {
        mean: vec![10.0; FEATURE_COUNT],
        scale: vec![4.0; FEATURE_COUNT],
    };
    vec![
        ("stub", Box::new(StubClassifier::new("bench")) as Box<dyn Classifier>),
        (
            "logistic",
            Box::new(ArtifactClassifier::new(ModelArtifact::new(logistic()))),
        ),
        (
            "logistic_scaled",
            Box::new(ArtifactClassifier::new(
                ModelArtifact::new(logistic()).with_scaler(standard),
            )),
        ),
        (
            "linear_svm",
            Box::new(ArtifactClassifier::new(ModelArtifact::new(
                DecisionFunction::LinearSvm {
                    coefficients: vec![0.01; FEATURE_COUNT],
                    intercept: -1.0,
                },
            ))),
        ),
    ]
}

fn bench_parse(c: &mut Criterion) {
    let raw = sample_csv();
    c.bench_function("parse_features", |b| {
        b.iter(|| parse_features(black_box(&raw)))
    });
}

fn bench_classify(c: &mut Criterion) {
    let features = parse_features(&sample_csv()).unwrap();
    let mut group = c.benchmark_group("classify");

    for (name, classifier) in create_classifiers() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &features, |b, features| {
            b.iter(|| classifier.classify(black_box(features)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_classify);
criterion_main!(benches);
