//! Process-wide set of fitted artifacts: one scaler and a fixed list of
//! named classifiers. Loaded once before serving, read-only afterwards.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::ArtifactsConfig;
use crate::error::{HealError, Result};
use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::ml::classifier::{Label, Predictor};
use crate::ml::dense::DenseNetwork;
use crate::ml::scaler::Scaler;

/// Deployable classifier families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    #[serde(rename = "RandomForest")]
    RandomForest,
    #[serde(rename = "SVM")]
    Svm,
    #[serde(rename = "KNN")]
    Knn,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [ModelKind::RandomForest, ModelKind::Svm, ModelKind::Knn];

    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::RandomForest => "RandomForest",
            ModelKind::Svm => "SVM",
            ModelKind::Knn => "KNN",
        }
    }

    /// Artifact path for this model with the given extension.
    pub fn artifact_path(&self, dir: &Path, ext: &str) -> PathBuf {
        dir.join(format!("{}_model.{ext}", self.name()))
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub struct LoadedModel {
    pub kind: ModelKind,
    predictor: Box<dyn Predictor>,
}

impl LoadedModel {
    pub fn new(kind: ModelKind, predictor: Box<dyn Predictor>) -> Self {
        Self { kind, predictor }
    }

    pub fn backend(&self) -> &'static str {
        self.predictor.backend()
    }
}

/// Per-model labels for one request, in registry order.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionSet {
    entries: Vec<(ModelKind, Label)>,
}

impl PredictionSet {
    pub fn entries(&self) -> &[(ModelKind, Label)] {
        &self.entries
    }

    pub fn get(&self, kind: ModelKind) -> Option<Label> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, label)| *label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for PredictionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (kind, label) in &self.entries {
            map.serialize_entry(kind.name(), label)?;
        }
        map.end()
    }
}

pub struct ModelRegistry {
    scaler: Scaler,
    models: Vec<LoadedModel>,
}

impl ModelRegistry {
    pub fn new(scaler: Scaler, models: Vec<LoadedModel>) -> Result<Self> {
        scaler.validate().map_err(HealError::Validation)?;
        if models.is_empty() {
            return Err(HealError::Validation(
                "registry needs at least one model".to_string(),
            ));
        }
        Ok(Self { scaler, models })
    }

    /// Load the scaler and every configured classifier from `config.dir`.
    pub fn load(config: &ArtifactsConfig) -> Result<Self> {
        let scaler_path = config.dir.join(&config.scaler);
        let scaler = Scaler::from_file(&scaler_path)?;
        info!(
            "Loaded {} scaler from {}",
            scaler.kind(),
            scaler_path.display()
        );

        let mut models = Vec::with_capacity(config.models.len());
        for kind in &config.models {
            let predictor = load_predictor(*kind, &config.dir)?;
            info!("Loaded {} model ({} backend)", kind, predictor.backend());
            models.push(LoadedModel::new(*kind, predictor));
        }

        Self::new(scaler, models)
    }

    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    pub fn models(&self) -> &[LoadedModel] {
        &self.models
    }

    pub fn model_names(&self) -> Vec<&'static str> {
        self.models.iter().map(|m| m.kind.name()).collect()
    }

    /// Scale the sample once and label it with every model.
    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionSet> {
        let scaled = self.scaler.transform(features)?;

        let mut entries = Vec::with_capacity(self.models.len());
        for model in &self.models {
            let class = model.predictor.predict_class(&scaled)?;
            let label = Label::from_class(class);
            debug!(model = %model.kind, class, label = %label, "prediction");
            entries.push((model.kind, label));
        }

        Ok(PredictionSet { entries })
    }
}

fn load_predictor(kind: ModelKind, dir: &Path) -> Result<Box<dyn Predictor>> {
    // ONNX exports take precedence only in builds that can run them.
    #[cfg(feature = "onnx")]
    {
        let onnx_path = kind.artifact_path(dir, "onnx");
        if onnx_path.exists() {
            let model = crate::ml::onnx::OnnxModel::load(&onnx_path, FEATURE_COUNT)?;
            return Ok(Box::new(model));
        }
    }

    let json_path = kind.artifact_path(dir, "json");
    if !json_path.exists() {
        return Err(HealError::Artifact(format!(
            "no artifact for {kind}: expected {}",
            json_path.display()
        )));
    }

    let network = DenseNetwork::from_file(&json_path)?;
    if network.input_dim != FEATURE_COUNT {
        return Err(HealError::Artifact(format!(
            "model {} expects {} inputs, features provide {FEATURE_COUNT}",
            json_path.display(),
            network.input_dim
        )));
    }
    Ok(Box::new(network))
}
