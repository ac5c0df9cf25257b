//! Configuration management.
//!
//! Settings come from an optional TOML file, overridden by `STUDYOS_*`
//! environment variables (`STUDYOS_SERVICE__BASE_URL`,
//! `STUDYOS_UI__THEME`, ...). Command-line flags are applied on top by the
//! binary.

mod file_config;

pub use file_config::{ConfigFile, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::Endpoints;
use crate::models::TaskKind;
use crate::ui::Theme;
use crate::utils::InputError;

/// Service address used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "STUDYOS";

/// File looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "studyos.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base address shared by all tools
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout; unset means wait indefinitely
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Per-tool base address overrides
    #[serde(default)]
    pub endpoints: EndpointOverrides,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
            endpoints: EndpointOverrides::default(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Optional base address per tool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doubt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl EndpointOverrides {
    pub fn get(&self, kind: TaskKind) -> Option<&str> {
        match kind {
            TaskKind::Doubt => self.doubt.as_deref(),
            TaskKind::Plan => self.plan.as_deref(),
            TaskKind::Summary => self.summary.as_deref(),
            TaskKind::Notes => self.notes.as_deref(),
        }
    }
}

/// Document export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory PDFs are written to
    #[serde(default = "default_export_dir")]
    pub directory: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_dir(),
        }
    }
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Terminal presentation settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: Theme,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `json` for structured output, anything else for plain text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Resolve the service addresses, applying per-tool overrides
    pub fn endpoints(&self) -> Result<Endpoints, InputError> {
        let mut endpoints = Endpoints::new(&self.service.base_url)?;
        for kind in TaskKind::ALL {
            if let Some(base) = self.service.endpoints.get(kind) {
                endpoints = endpoints.with_override(kind, base)?;
            }
        }
        Ok(endpoints)
    }

    /// Request timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.service
            .timeout_seconds
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    }

    /// Whether logs should be emitted as JSON
    pub fn json_logs(&self) -> bool {
        self.logging
            .format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

/// Load configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

/// Find a configuration file: `./studyos.toml`, then the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    default_config_path().filter(|p| p.is_file())
}

/// `<config_dir>/studyos/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("studyos").join("config.toml"))
}
