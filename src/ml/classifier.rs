use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// A fitted binary classifier: one scaled vector in, one class out.
pub trait Predictor: Send + Sync {
    fn predict_class(&self, scaled: &[f64]) -> Result<i64>;

    /// Artifact format, for logs and the health probe.
    fn backend(&self) -> &'static str;
}

/// Human-readable outcome of a single classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "healed")]
    Healed,
    #[serde(rename = "not healed")]
    NotHealed,
}

impl Label {
    /// Class `1` is the healed class; every other class reads as not healed.
    pub fn from_class(class: i64) -> Self {
        if class == 1 {
            Label::Healed
        } else {
            Label::NotHealed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Healed => "healed",
            Label::NotHealed => "not healed",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
