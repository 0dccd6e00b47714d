use healcheck::{
    config::ArtifactsConfig,
    features::{FeatureVector, FEATURE_COUNT},
    HealError, Label, ModelKind, ModelRegistry,
};
use serde_json::json;
use std::path::Path;

fn write_json(dir: &Path, name: &str, value: serde_json::Value) {
    std::fs::write(dir.join(name), serde_json::to_vec_pretty(&value).unwrap()).unwrap();
}

/// Single-layer model that reports healed when `weights · x + bias >= 0`.
fn linear_model(weights: Vec<f64>, bias: f64) -> serde_json::Value {
    json!({
        "input_dim": FEATURE_COUNT,
        "threshold": 0.0,
        "layers": [{ "weights": [weights], "bias": [bias] }],
        "metadata": { "family": "test" }
    })
}

fn write_fixture(dir: &Path) {
    write_json(
        dir,
        "scaler1.json",
        json!({
            "kind": "standard",
            "mean": [0, 0, 0, 0, 0, 0, 0, 80, 0],
            "scale": [1, 1, 1, 1, 1, 1, 1, 10, 1]
        }),
    );

    let mut area = vec![0.0; FEATURE_COUNT];
    area[7] = 1.0;
    write_json(dir, "RandomForest_model.json", linear_model(area.clone(), 0.0));
    write_json(dir, "SVM_model.json", linear_model(area, -5.0));
    write_json(
        dir,
        "KNN_model.json",
        linear_model(vec![0.0; FEATURE_COUNT], -1.0),
    );
}

fn config(dir: &Path) -> ArtifactsConfig {
    ArtifactsConfig {
        dir: dir.to_path_buf(),
        scaler: "scaler1.json".to_string(),
        models: ModelKind::ALL.to_vec(),
    }
}

fn sample(area: f64) -> FeatureVector {
    FeatureVector::new([1.0, 2.0, 3.0, 0.1, 0.2, 0.3, 0.4, area, 50.0])
}

#[test]
fn loads_configured_models_and_predicts() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let registry = ModelRegistry::load(&config(dir.path())).unwrap();
    assert_eq!(registry.model_names(), ["RandomForest", "SVM", "KNN"]);

    // scaled area = (100 - 80) / 10 = 2
    let set = registry.predict(&sample(100.0)).unwrap();
    assert_eq!(set.get(ModelKind::RandomForest), Some(Label::Healed));
    assert_eq!(set.get(ModelKind::Svm), Some(Label::NotHealed));
    assert_eq!(set.get(ModelKind::Knn), Some(Label::NotHealed));

    // scaled area = 14
    let set = registry.predict(&sample(220.0)).unwrap();
    assert_eq!(set.get(ModelKind::Svm), Some(Label::Healed));
}

#[test]
fn loads_only_the_configured_subset() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let mut cfg = config(dir.path());
    cfg.models = vec![ModelKind::Knn];
    let registry = ModelRegistry::load(&cfg).unwrap();
    assert_eq!(registry.model_names(), ["KNN"]);
    assert_eq!(registry.predict(&sample(100.0)).unwrap().len(), 1);
}

#[test]
fn missing_model_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    std::fs::remove_file(dir.path().join("SVM_model.json")).unwrap();

    match ModelRegistry::load(&config(dir.path())) {
        Err(HealError::Artifact(msg)) => assert!(msg.contains("SVM_model.json"), "{msg}"),
        Err(other) => panic!("expected artifact error, got {other:?}"),
        Ok(_) => panic!("expected artifact error"),
    }
}

#[test]
fn scaler_with_wrong_width_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    write_json(
        dir.path(),
        "scaler1.json",
        json!({ "kind": "min_max", "min": [0, 0], "scale": [1, 1] }),
    );

    let err = ModelRegistry::load(&config(dir.path())).err().unwrap();
    assert!(matches!(err, HealError::Artifact(_)), "{err:?}");
}

#[test]
fn model_with_wrong_input_width_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    write_json(
        dir.path(),
        "KNN_model.json",
        json!({ "input_dim": 2, "layers": [{ "weights": [[1.0, 1.0]], "bias": [0.0] }] }),
    );

    let err = ModelRegistry::load(&config(dir.path())).err().unwrap();
    assert!(err.to_string().contains("expects 2 inputs"), "{err}");
}

#[cfg(not(feature = "onnx"))]
#[test]
fn onnx_file_without_the_feature_falls_back_to_json() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    std::fs::write(dir.path().join("SVM_model.onnx"), b"not a model").unwrap();

    let registry = ModelRegistry::load(&config(dir.path())).unwrap();
    assert_eq!(registry.model_names(), ["RandomForest", "SVM", "KNN"]);
    let svm = registry
        .models()
        .iter()
        .find(|m| m.kind == ModelKind::Svm)
        .unwrap();
    assert_eq!(svm.backend(), "dense");
    assert_eq!(
        registry.predict(&sample(100.0)).unwrap().get(ModelKind::Svm),
        Some(Label::NotHealed)
    );
}

#[test]
fn bundled_artifacts_label_the_reference_sample() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("artifacts");
    let registry = ModelRegistry::load(&config(&dir)).unwrap();

    let set = registry.predict(&sample(100.0)).unwrap();
    assert_eq!(set.len(), 3);
    for (kind, label) in set.entries() {
        assert!(ModelKind::ALL.contains(kind));
        assert!(matches!(label, Label::Healed | Label::NotHealed));
    }
}
