//! ONNX classifier wrapper (pure Rust via `tract-onnx`).
//!
//! Expects a classifier exported with a single `[1, n_features]` float input
//! whose first output is the predicted label. Exporters that append a
//! probability map (ZipMap) must have it disabled.

use std::path::Path;

use crate::error::{HealError, Result};
use crate::ml::classifier::Predictor;

use tract_onnx::prelude::*;

#[derive(Clone)]
pub struct OnnxModel {
    plan: TypedRunnableModel<TypedModel>,
    input_dim: usize,
}

impl std::fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxModel")
            .field("input_dim", &self.input_dim)
            .finish()
    }
}

impl OnnxModel {
    /// Load a classifier and specialize it to a fixed `[1, input_dim]` f32 input.
    pub fn load<P: AsRef<Path>>(path: P, input_dim: usize) -> Result<Self> {
        let path = path.as_ref();
        if input_dim == 0 {
            return Err(HealError::Validation("input_dim must be > 0".to_string()));
        }

        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| HealError::Artifact(format!("onnx load failed ({}): {e}", path.display())))?;

        let model = model
            .with_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), tvec!(1, input_dim)))
            .map_err(|e| HealError::Artifact(format!("onnx input fact failed: {e}")))?;

        let plan = model
            .into_optimized()
            .map_err(|e| HealError::Artifact(format!("onnx optimize failed: {e}")))?
            .into_runnable()
            .map_err(|e| HealError::Artifact(format!("onnx runnable failed: {e}")))?;

        let loaded = Self { plan, input_dim };

        // Probe once so a model with an unusable label output fails at startup.
        loaded
            .run_label(&vec![0.0; input_dim])
            .map_err(|e| HealError::Artifact(format!("onnx probe failed ({}): {e}", path.display())))?;

        Ok(loaded)
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn run_label(&self, input: &[f64]) -> Result<i64> {
        if input.len() != self.input_dim {
            return Err(HealError::Inference(format!(
                "onnx input dim mismatch: got {}, expected {}",
                input.len(),
                self.input_dim
            )));
        }

        let values: Vec<f32> = input.iter().map(|v| *v as f32).collect();
        let tensor = tract_ndarray::Array2::<f32>::from_shape_vec((1, self.input_dim), values)
            .map_err(|e| HealError::Inference(format!("onnx input reshape failed: {e}")))?
            .into_tvalue();

        let outputs = self
            .plan
            .run(tvec!(tensor))
            .map_err(|e| HealError::Inference(format!("onnx run failed: {e}")))?;
        let Some(label) = outputs.first() else {
            return Err(HealError::Inference("onnx produced no outputs".to_string()));
        };

        let label = label
            .cast_to::<i64>()
            .map_err(|e| HealError::Inference(format!("onnx label decode failed: {e}")))?;
        let classes = label
            .as_slice::<i64>()
            .map_err(|e| HealError::Inference(format!("onnx label decode failed: {e}")))?;
        classes
            .first()
            .copied()
            .ok_or_else(|| HealError::Inference("onnx label output is empty".to_string()))
    }
}

impl Predictor for OnnxModel {
    fn predict_class(&self, scaled: &[f64]) -> Result<i64> {
        self.run_label(scaled)
    }

    fn backend(&self) -> &'static str {
        "onnx"
    }
}
