pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod ml;
pub mod server;

pub use crate::config::AppConfig;
pub use error::{HealError, Result};
pub use features::{FeatureName, FeatureVector};
pub use ml::{Label, ModelKind, ModelRegistry, PredictionSet, Predictor, Scaler};
