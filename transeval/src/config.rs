//! Configuration management for transeval
//!
//! Run settings come from an optional TOML file. The candidate systems are
//! fixed at compile time and are not configurable.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Column holding the reference translations
pub const REFERENCE_COLUMN: &str = "reference";

/// A candidate system: input column and display name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemSpec {
    pub column: &'static str,
    pub name: &'static str,
}

impl SystemSpec {
    pub const fn new(column: &'static str, name: &'static str) -> Self {
        Self { column, name }
    }
}

/// Systems evaluated on every run, in report order
pub const SYSTEMS: &[SystemSpec] = &[
    SystemSpec::new("mixtral_prediction", "Fine-Tuned Mixtral (Final)"),
    SystemSpec::new("google_prediction", "Google Translate API"),
    SystemSpec::new("nllb_prediction", "NLLB"),
    SystemSpec::new("pretrained_prediction", "Base Mixtral (Pretrained)"),
    SystemSpec::new("prediction_4000", "Mixtral Checkpoint-4000"),
    SystemSpec::new("prediction_500", "Mixtral Checkpoint-500"),
];

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Input and output locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_input")]
    pub input: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Optional JSON export
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
            json: None,
        }
    }
}

/// Console report settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Largest provider difference, in points, that passes without a warning
    #[serde(default = "default_agreement_tolerance")]
    pub agreement_tolerance: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            agreement_tolerance: default_agreement_tolerance(),
        }
    }
}

// Default value functions
fn default_input() -> PathBuf { PathBuf::from("data/final_predictions_all.csv") }
fn default_output() -> PathBuf { PathBuf::from("results/metrics_summary.csv") }
fn default_agreement_tolerance() -> f64 { 1.0 }

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from default config location or return defaults
    pub fn load_or_default() -> Self {
        let config_paths = [
            "config/transeval.toml",
            "../config/transeval.toml",
        ];

        for path in &config_paths {
            if !Path::new(path).exists() {
                continue;
            }
            match Self::from_file(path) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", path);
                    return config;
                }
                Err(e) => tracing::warn!("Ignoring {}: {}", path, e),
            }
        }

        tracing::debug!("Using default configuration");
        Self::default()
    }

    /// Save configuration to a TOML file
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, content)
            .map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}
