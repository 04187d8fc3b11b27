//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/reader.toml
//!
//! Every section is optional; missing keys take the defaults below.

use crate::domain::DEFAULT_LOCATION;
use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/reader.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Backend API base URL, events go to `{base_url}/rfid/event`
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: default_api_base_url(), timeout_ms: default_api_timeout_ms() }
    }
}

fn default_api_base_url() -> String {
    "http://localhost:3001/api".to_string()
}

fn default_api_timeout_ms() -> u64 {
    10_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReaderConfig {
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Cooldown after a failed cycle
    #[serde(default = "default_error_backoff_ms")]
    pub error_backoff_ms: u64,
    /// Read tags from this file instead of the hardware stub
    #[serde(default)]
    pub tag_file: Option<String>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
            poll_interval_ms: default_poll_interval_ms(),
            error_backoff_ms: default_error_backoff_ms(),
            tag_file: None,
        }
    }
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_error_backoff_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log file written alongside stdout
    #[serde(default = "default_log_file")]
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { file: default_log_file() }
    }
}

fn default_log_file() -> String {
    "logs/rfid.log".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Periodic summary interval (0 to disable)
    #[serde(default = "default_metrics_interval")]
    pub interval_secs: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { interval_secs: default_metrics_interval() }
    }
}

fn default_metrics_interval() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub reader: ReaderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    api_base_url: String,
    api_timeout_ms: u64,
    location: String,
    poll_interval_ms: u64,
    error_backoff_ms: u64,
    tag_file: Option<String>,
    log_file: String,
    metrics_interval_secs: u64,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default".to_string())
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, config_file: String) -> Self {
        Self {
            api_base_url: toml_config.api.base_url,
            api_timeout_ms: toml_config.api.timeout_ms,
            location: toml_config.reader.location,
            poll_interval_ms: toml_config.reader.poll_interval_ms,
            error_backoff_ms: toml_config.reader.error_backoff_ms,
            tag_file: toml_config.reader.tag_file,
            log_file: toml_config.logging.file,
            metrics_interval_secs: toml_config.metrics.interval_secs,
            config_file,
        }
    }

    /// Determine config file path from args or environment
    pub fn resolve_config_path(cli_path: Option<&str>) -> String {
        if let Some(path) = cli_path {
            return path.to_string();
        }

        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }

        DEFAULT_CONFIG_PATH.to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self::from_toml(toml_config, path.display().to_string()))
    }

    /// Load configuration - tries TOML file first, falls back to defaults.
    ///
    /// Runs before logging is up, so the warning goes to stderr.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {:#}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Override the API base URL (command line takes precedence over file)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Full URL of the event endpoint
    pub fn event_url(&self) -> String {
        format!("{}/rfid/event", self.api_base_url.trim_end_matches('/'))
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn api_timeout_ms(&self) -> u64 {
        self.api_timeout_ms
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn poll_interval_ms(&self) -> u64 {
        self.poll_interval_ms
    }

    pub fn error_backoff_ms(&self) -> u64 {
        self.error_backoff_ms
    }

    pub fn tag_file(&self) -> Option<&str> {
        self.tag_file.as_deref()
    }

    pub fn log_file(&self) -> &str {
        &self.log_file
    }

    pub fn metrics_interval_secs(&self) -> u64 {
        self.metrics_interval_secs
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }
}
