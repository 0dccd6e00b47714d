//! Fitted feature scaling loaded from JSON.
//!
//! Parameters are exported once by the training pipeline, for example:
//!
//! ```json
//! {"kind": "standard", "mean": [..], "scale": [..]}
//! {"kind": "min_max", "min": [..], "scale": [..]}
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{HealError, Result};
use crate::features::{FeatureVector, FEATURE_COUNT};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// Standardization: `(x - mean) / scale`.
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// Range scaling: `x * scale + min`.
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

impl Scaler {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            HealError::Artifact(format!("failed to read scaler {}: {e}", path.display()))
        })?;
        let scaler: Self = serde_json::from_str(&content).map_err(|e| {
            HealError::Artifact(format!("failed to parse scaler {}: {e}", path.display()))
        })?;
        scaler
            .validate()
            .map_err(|e| HealError::Artifact(format!("invalid scaler {}: {e}", path.display())))?;
        Ok(scaler)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        let (offset_name, offset, scale) = match self {
            Scaler::Standard { mean, scale } => ("mean", mean, scale),
            Scaler::MinMax { min, scale } => ("min", min, scale),
        };
        if offset.len() != FEATURE_COUNT {
            return Err(format!(
                "{offset_name} length {} != feature count {FEATURE_COUNT}",
                offset.len()
            ));
        }
        if scale.len() != FEATURE_COUNT {
            return Err(format!(
                "scale length {} != feature count {FEATURE_COUNT}",
                scale.len()
            ));
        }
        if offset.iter().chain(scale.iter()).any(|v| !v.is_finite()) {
            return Err("parameters must be finite".to_string());
        }
        if matches!(self, Scaler::Standard { .. }) && scale.iter().any(|v| *v == 0.0) {
            return Err("standard scale must be non-zero".to_string());
        }
        Ok(())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Scaler::Standard { .. } => "standard",
            Scaler::MinMax { .. } => "min_max",
        }
    }

    /// Apply the fitted transform. Inputs are taken in declaration order.
    pub fn transform(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        let x = features.as_slice();
        if x.iter().any(|v| !v.is_finite()) {
            return Err(HealError::Inference(
                "Input contains NaN or infinity".to_string(),
            ));
        }

        let out = match self {
            Scaler::Standard { mean, scale } => x
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(v, (m, s))| (v - m) / s)
                .collect(),
            Scaler::MinMax { min, scale } => x
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(v, (m, s))| v * s + m)
                .collect(),
        };
        Ok(out)
    }
}
