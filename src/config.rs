use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::ml::ModelKind;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Listen port (default: 5008)
    pub port: u16,
    /// Verbose logging and per-request tracing
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsConfig {
    /// Directory holding the scaler and model files
    pub dir: PathBuf,
    /// Scaler file name inside `dir`
    pub scaler: String,
    /// Models to load, in reporting order
    pub models: Vec<ModelKind>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
    /// Directory for daily rotated log files (console only when unset)
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5008)?
            .set_default("server.debug", true)?
            .set_default("artifacts.dir", "artifacts")?
            .set_default("artifacts.scaler", "scaler1.json")?
            .set_default("artifacts.models", vec!["RandomForest", "SVM", "KNN"])?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("HEALCHECK_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (HEALCHECK__SERVER__PORT, etc.)
            .add_source(
                Environment::with_prefix("HEALCHECK")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("artifacts.models")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push("server.port must be non-zero".to_string());
        }

        if self.server.host.trim().is_empty() {
            errors.push("server.host must not be empty".to_string());
        }

        if self.artifacts.scaler.trim().is_empty() {
            errors.push("artifacts.scaler must not be empty".to_string());
        }

        if self.artifacts.models.is_empty() {
            errors.push("artifacts.models must list at least one model".to_string());
        }

        let mut seen = HashSet::new();
        for kind in &self.artifacts.models {
            if !seen.insert(*kind) {
                errors.push(format!("artifacts.models lists {kind} more than once"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Socket address string the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
