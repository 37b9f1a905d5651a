//! Configuration management for the GST forecast service

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the TOML configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub models: ModelsConfig,
    pub uploads: UploadsConfig,
    pub metrics: MetricsConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. "0.0.0.0:5000"
    pub bind_addr: String,
}

/// Model artifact locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// ONNX regression model served by /predict
    pub model_path: String,
    /// JSON array of the column names the model was fitted on
    pub columns_path: String,
    /// Model for the /forecasting variant (defaults to `model_path`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecasting_model_path: Option<String>,
    /// Column list for the /forecasting variant (defaults to `columns_path`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecasting_columns_path: Option<String>,
    /// Number of threads for ONNX inference per model (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_onnx_threads() -> usize {
    1
}

impl ModelsConfig {
    /// Artifact paths for the /forecasting variant, if they differ from the
    /// /predict artifacts.
    pub fn forecasting_artifacts(&self) -> Option<(PathBuf, PathBuf)> {
        if self.forecasting_model_path.is_none() && self.forecasting_columns_path.is_none() {
            return None;
        }

        let model = self
            .forecasting_model_path
            .as_deref()
            .unwrap_or(&self.model_path);
        let columns = self
            .forecasting_columns_path
            .as_deref()
            .unwrap_or(&self.columns_path);

        Some((PathBuf::from(model), PathBuf::from(columns)))
    }
}

/// Upload storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadsConfig {
    /// Directory uploaded transaction files are written to
    pub dir: String,
}

/// Metrics reporting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Seconds between periodic metric summaries
    pub report_interval_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from `GST_CONFIG` or the default file path
    pub fn load() -> Result<Self> {
        let path =
            std::env::var("GST_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from_path(path)
    }

    /// Load configuration from a specific path.
    ///
    /// Layers, lowest precedence first: built-in defaults, the TOML file
    /// (optional), then `GST__SECTION__KEY` environment variables.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let defaults = Config::try_from(&AppConfig::default())
            .context("Failed to encode default configuration")?;

        let config = Config::builder()
            .add_source(defaults)
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix("GST")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_addr: "0.0.0.0:5000".to_string(),
            },
            models: ModelsConfig {
                model_path: "models/gst_forecast_model.onnx".to_string(),
                columns_path: "models/columns.json".to_string(),
                forecasting_model_path: None,
                forecasting_columns_path: None,
                onnx_threads: 1,
            },
            uploads: UploadsConfig {
                dir: "uploads".to_string(),
            },
            metrics: MetricsConfig {
                report_interval_secs: 60,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
