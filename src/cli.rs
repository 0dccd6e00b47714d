use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::Result;
use crate::features::FeatureVector;
use crate::ml::{ModelRegistry, PredictionSet};

#[derive(Parser)]
#[command(name = "healcheck")]
#[command(version)]
#[command(about = "Wound-healing classifier service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config directory (default.toml plus per-environment overrides)
    #[arg(short, long, default_value = "config", env = "HEALCHECK_CONFIG_DIR")]
    pub config: PathBuf,

    /// Override the listen port
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the prediction API (default)
    Serve,
    /// Load every artifact and report what was found
    Check,
    /// Run one prediction offline from KEY=VALUE pairs
    Predict {
        /// Feature values, e.g. feature_0=1.0 area=100
        #[arg(required = true, value_parser = parse_key_value)]
        values: Vec<(String, String)>,
    },
}

fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    Ok((key.trim().to_string(), value.to_string()))
}

/// Describe a loaded registry, one line per artifact.
pub fn describe_registry(registry: &ModelRegistry) -> String {
    let mut out = format!("scaler: {}\n", registry.scaler().kind());
    for model in registry.models() {
        out.push_str(&format!("model: {} ({})\n", model.kind, model.backend()));
    }
    out
}

/// Run the pipeline once for pairs given on the command line.
pub fn predict_pairs(registry: &ModelRegistry, values: &[(String, String)]) -> Result<PredictionSet> {
    let mut form = HashMap::new();
    for (key, value) in values {
        form.entry(key.clone()).or_insert_with(|| value.clone());
    }
    let features = FeatureVector::from_form(&form)?;
    registry.predict(&features)
}

pub fn format_predictions(predictions: &PredictionSet) -> String {
    predictions
        .entries()
        .iter()
        .map(|(kind, label)| format!("{kind}: {label}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_COUNT;
    use crate::ml::{DenseLayer, DenseNetwork, LoadedModel, ModelKind, Scaler};

    fn registry() -> ModelRegistry {
        // Healed when the (unscaled) area exceeds 80.
        let mut weights = vec![0.0; FEATURE_COUNT];
        weights[7] = 1.0;
        let net = DenseNetwork {
            input_dim: FEATURE_COUNT,
            layers: vec![DenseLayer {
                weights: vec![weights],
                bias: vec![-80.0],
                activation: Default::default(),
            }],
            threshold: 0.0,
            metadata: serde_json::Value::Null,
        };
        ModelRegistry::new(
            Scaler::Standard {
                mean: vec![0.0; FEATURE_COUNT],
                scale: vec![1.0; FEATURE_COUNT],
            },
            vec![LoadedModel::new(ModelKind::Knn, Box::new(net))],
        )
        .unwrap()
    }

    fn pairs(area: &str) -> Vec<(String, String)> {
        [
            "feature_0=1.0",
            "feature_1=2.0",
            "feature_2=3.0",
            "texture_0=0.1",
            "texture_1=0.2",
            "texture_2=0.3",
            "texture_3=0.4",
            "mean_intensity=50.0",
        ]
        .iter()
        .map(|raw| parse_key_value(raw).unwrap())
        .chain(std::iter::once(("area".to_string(), area.to_string())))
        .collect()
    }

    #[test]
    fn parses_key_value_pairs() {
        assert_eq!(
            parse_key_value("area=1=2").unwrap(),
            ("area".to_string(), "1=2".to_string())
        );
        assert!(parse_key_value("area").is_err());
    }

    #[test]
    fn predicts_from_pairs() {
        let registry = registry();
        let set = predict_pairs(&registry, &pairs("100.0")).unwrap();
        assert_eq!(format_predictions(&set), "KNN: healed\n");

        let set = predict_pairs(&registry, &pairs("10.0")).unwrap();
        assert_eq!(format_predictions(&set), "KNN: not healed\n");
    }

    #[test]
    fn describes_loaded_artifacts() {
        assert_eq!(
            describe_registry(&registry()),
            "scaler: standard\nmodel: KNN (dense)\n"
        );
    }

    #[test]
    fn cli_parses_predict_command() {
        let cli = Cli::try_parse_from(["healcheck", "predict", "area=1", "feature_0=2"]).unwrap();
        match cli.command {
            Some(Commands::Predict { values }) => assert_eq!(values.len(), 2),
            _ => panic!("expected predict command"),
        }
    }
}
