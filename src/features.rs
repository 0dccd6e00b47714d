//! Request features: the fixed, ordered set of measurements a sample carries.

use std::collections::HashMap;
use std::fmt;

use crate::error::{HealError, Result};

/// Number of measurements in a feature vector.
pub const FEATURE_COUNT: usize = 9;

/// Named measurement, declared in the order the scaler was fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureName {
    Feature0,
    Feature1,
    Feature2,
    Texture0,
    Texture1,
    Texture2,
    Texture3,
    Area,
    MeanIntensity,
}

impl FeatureName {
    pub const ALL: [FeatureName; FEATURE_COUNT] = [
        FeatureName::Feature0,
        FeatureName::Feature1,
        FeatureName::Feature2,
        FeatureName::Texture0,
        FeatureName::Texture1,
        FeatureName::Texture2,
        FeatureName::Texture3,
        FeatureName::Area,
        FeatureName::MeanIntensity,
    ];

    /// Form key for this measurement.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Feature0 => "feature_0",
            Self::Feature1 => "feature_1",
            Self::Feature2 => "feature_2",
            Self::Texture0 => "texture_0",
            Self::Texture1 => "texture_1",
            Self::Texture2 => "texture_2",
            Self::Texture3 => "texture_3",
            Self::Area => "area",
            Self::MeanIntensity => "mean_intensity",
        }
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One sample's measurements in fixed order. Built per request, never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Build from submitted form fields, looking each measurement up by key.
    ///
    /// Presence of every key is checked before any value is parsed, so a
    /// request that is both incomplete and malformed reports the missing keys.
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self> {
        if !FeatureName::ALL.iter().all(|name| form.contains_key(name.key())) {
            return Err(HealError::MissingFeatures);
        }

        let mut values = [0.0_f64; FEATURE_COUNT];
        for (slot, name) in values.iter_mut().zip(FeatureName::ALL) {
            let raw = &form[name.key()];
            *slot = parse_float(raw)?;
        }
        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, name: FeatureName) -> f64 {
        // ALL is declared in index order
        self.0[name as usize]
    }
}

/// Parse a submitted value as a float.
///
/// Surrounding whitespace is ignored and a single `_` is allowed between two
/// digits as a group separator (`1_000.5`).
fn parse_float(raw: &str) -> Result<f64> {
    let invalid = || HealError::InvalidNumber(raw.to_string());
    let trimmed = raw.trim();

    let chars: Vec<char> = trimmed.chars().collect();
    let mut digits = String::with_capacity(trimmed.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            let between_digits = i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).is_some_and(char::is_ascii_digit);
            if !between_digits {
                return Err(invalid());
            }
            continue;
        }
        digits.push(c);
    }

    digits.parse::<f64>().map_err(|_| invalid())
}

/// Decode an `application/x-www-form-urlencoded` body into a key/value map.
///
/// When a key repeats, the first occurrence wins.
pub fn parse_form_pairs(body: &[u8]) -> HashMap<String, String> {
    let mut form = HashMap::new();
    for (key, value) in url::form_urlencoded::parse(body) {
        form.entry(key.into_owned()).or_insert_with(|| value.into_owned());
    }
    form
}
