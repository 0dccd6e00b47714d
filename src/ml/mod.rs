//! Inference over fitted artifacts (deploy-safe, no Python at runtime).
//!
//! Training happens elsewhere; this module only consumes its exports.

pub mod classifier;
pub mod dense;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod registry;
pub mod scaler;

pub use classifier::{Label, Predictor};
pub use dense::{Activation, DenseLayer, DenseNetwork};
#[cfg(feature = "onnx")]
pub use onnx::OnnxModel;
pub use registry::{LoadedModel, ModelKind, ModelRegistry, PredictionSet};
pub use scaler::Scaler;
