//! Dense network classifier loaded from JSON (CPU-only).
//!
//! The artifact carries only weights; inputs arrive already scaled.
//! A single output is read as the healed-class score and compared with
//! `threshold`; several outputs are read as per-class scores (argmax).

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{HealError, Result};
use crate::ml::classifier::Predictor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Linear,
    Relu,
    Tanh,
    Sigmoid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    /// Weights shape: [out_dim][in_dim]
    pub weights: Vec<Vec<f64>>,
    /// Bias shape: [out_dim]
    pub bias: Vec<f64>,
    #[serde(default)]
    pub activation: Activation,
}

impl DenseLayer {
    fn out_dim(&self) -> usize {
        self.weights.len()
    }

    fn apply(&self, x: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| {
                let sum = row.iter().zip(x).fold(*b, |acc, (w, v)| acc + w * v);
                apply_activation(sum, self.activation)
            })
            .collect()
    }
}

fn default_threshold() -> f64 {
    0.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseNetwork {
    /// Expected input dimension.
    pub input_dim: usize,

    pub layers: Vec<DenseLayer>,

    /// Decision threshold for single-output networks.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Optional free-form metadata (versioning, training info, etc).
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl DenseNetwork {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            HealError::Artifact(format!("failed to read model {}: {e}", path.display()))
        })?;
        let model: Self = serde_json::from_str(&content).map_err(|e| {
            HealError::Artifact(format!("failed to parse model {}: {e}", path.display()))
        })?;
        model
            .validate()
            .map_err(|e| HealError::Artifact(format!("invalid model {}: {e}", path.display())))?;
        Ok(model)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.input_dim == 0 {
            return Err("input_dim must be > 0".to_string());
        }
        if self.layers.is_empty() {
            return Err("layers must not be empty".to_string());
        }
        if !self.threshold.is_finite() {
            return Err("threshold must be finite".to_string());
        }

        let mut expected_in = self.input_dim;
        for (idx, layer) in self.layers.iter().enumerate() {
            if layer.out_dim() == 0 {
                return Err(format!("layer[{idx}] out_dim must be > 0"));
            }
            if layer.bias.len() != layer.out_dim() {
                return Err(format!(
                    "layer[{idx}] bias len {} != out_dim {}",
                    layer.bias.len(),
                    layer.out_dim()
                ));
            }
            for (r, row) in layer.weights.iter().enumerate() {
                if row.len() != expected_in {
                    return Err(format!(
                        "layer[{idx}] weights row {r} len {} != expected in_dim {expected_in}",
                        row.len()
                    ));
                }
                if row.iter().any(|v| !v.is_finite()) {
                    return Err(format!("layer[{idx}] weights contain non-finite values"));
                }
            }
            if layer.bias.iter().any(|v| !v.is_finite()) {
                return Err(format!("layer[{idx}] bias contain non-finite values"));
            }
            expected_in = layer.out_dim();
        }
        Ok(())
    }

    pub fn output_dim(&self) -> usize {
        self.layers.last().map(|l| l.out_dim()).unwrap_or(0)
    }

    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_dim {
            return Err(HealError::Inference(format!(
                "dense input dim mismatch: got {}, expected {}",
                input.len(),
                self.input_dim
            )));
        }

        let out = self
            .layers
            .iter()
            .fold(input.to_vec(), |x, layer| layer.apply(&x));
        if out.iter().any(|v| !v.is_finite()) {
            return Err(HealError::Inference(
                "dense forward produced non-finite output".to_string(),
            ));
        }
        Ok(out)
    }
}

impl Predictor for DenseNetwork {
    fn predict_class(&self, scaled: &[f64]) -> Result<i64> {
        let out = self.forward(scaled)?;
        if let [score] = out.as_slice() {
            return Ok(i64::from(*score >= self.threshold));
        }

        let mut best = 0;
        for (idx, score) in out.iter().enumerate() {
            if *score > out[best] {
                best = idx;
            }
        }
        Ok(best as i64)
    }

    fn backend(&self) -> &'static str {
        "dense"
    }
}

fn apply_activation(x: f64, act: Activation) -> f64 {
    match act {
        Activation::Linear => x,
        Activation::Relu => x.max(0.0),
        Activation::Tanh => x.tanh(),
        Activation::Sigmoid => sigmoid(x),
    }
}

fn sigmoid(x: f64) -> f64 {
    // Numerically-stable sigmoid.
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logistic(weights: Vec<f64>) -> DenseNetwork {
        DenseNetwork {
            input_dim: weights.len(),
            layers: vec![DenseLayer {
                weights: vec![weights],
                bias: vec![0.0],
                activation: Activation::Sigmoid,
            }],
            threshold: 0.5,
            metadata: serde_json::json!({}),
        }
    }

    #[test]
    fn single_output_thresholds_score() {
        let net = logistic(vec![1.0, -1.0]);
        net.validate().unwrap();

        assert_eq!(net.predict_class(&[2.0, 0.0]).unwrap(), 1);
        assert_eq!(net.predict_class(&[0.0, 2.0]).unwrap(), 0);
        // sigmoid(0) == 0.5 sits on the threshold
        assert_eq!(net.predict_class(&[0.0, 0.0]).unwrap(), 1);
    }

    #[test]
    fn multi_output_takes_argmax() {
        let net = DenseNetwork {
            input_dim: 2,
            layers: vec![
                DenseLayer {
                    weights: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
                    bias: vec![0.0, 0.0],
                    activation: Activation::Relu,
                },
                DenseLayer {
                    weights: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
                    bias: vec![0.0, 0.0],
                    activation: Activation::Linear,
                },
            ],
            threshold: 0.5,
            metadata: serde_json::Value::Null,
        };
        net.validate().unwrap();
        assert_eq!(net.output_dim(), 2);
        assert_eq!(net.predict_class(&[3.0, 1.0]).unwrap(), 0);
        assert_eq!(net.predict_class(&[1.0, 3.0]).unwrap(), 1);
    }

    #[test]
    fn validates_shapes() {
        let mut bad = logistic(vec![1.0, 2.0]);
        bad.input_dim = 3;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn wrong_input_width_is_inference_error() {
        let net = logistic(vec![1.0, 2.0]);
        let err = net.predict_class(&[1.0]).unwrap_err();
        assert!(matches!(err, HealError::Inference(_)));
    }

    #[test]
    fn threshold_defaults_when_absent() {
        let raw = r#"{"input_dim":1,"layers":[{"weights":[[1.0]],"bias":[0.0]}]}"#;
        let net: DenseNetwork = serde_json::from_str(raw).unwrap();
        assert_eq!(net.threshold, 0.5);
        assert_eq!(net.layers[0].activation, Activation::Linear);
        assert_eq!(net.predict_class(&[0.7]).unwrap(), 1);
        assert_eq!(net.predict_class(&[0.2]).unwrap(), 0);
    }
}
