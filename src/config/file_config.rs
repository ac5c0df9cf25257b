//! Configuration file support for studyos.
//!
//! # Configuration File Format
//!
//! ```toml
//! [service]
//! base_url = "http://127.0.0.1:8000"
//! timeout_seconds = 30
//!
//! [service.endpoints]
//! notes = "http://127.0.0.1:9000"
//!
//! [export]
//! directory = "./exports"
//!
//! [ui]
//! theme = "dark"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use std::path::{Path, PathBuf};

use super::Config;

/// A configuration file on disk
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub config: Config,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        let config = toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))?;
        Ok(Self {
            path: path.to_path_buf(),
            config,
        })
    }

    /// Default configuration that will be written to `path`
    pub fn create_default(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Config::default(),
        }
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, ConfigFileError> {
        toml::to_string_pretty(&self.config).map_err(|e| ConfigFileError::Serialize(e.to_string()))
    }

    /// Save to the file's path, creating parent directories.
    ///
    /// Refuses to replace an existing file unless `overwrite` is set.
    pub fn save(&self, overwrite: bool) -> Result<(), ConfigFileError> {
        if self.path.exists() && !overwrite {
            return Err(ConfigFileError::AlreadyExists(self.path.clone()));
        }

        let content = self.to_toml()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
        }
        std::fs::write(&self.path, content).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        tracing::info!("Wrote configuration to {}", self.path.display());
        Ok(())
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("{} already exists (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),
}
