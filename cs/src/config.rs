//! Configuration types and loading
//!
//! Configuration is a small YAML file. An explicit `--config` path must
//! exist; otherwise the default location under the user config directory is
//! tried and silently skipped when absent.

use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(default)]
    pub log_level: Option<String>,

    /// Path to a menu YAML file replacing the built-in catalog
    #[serde(default)]
    pub menu: Option<PathBuf>,
}

impl Config {
    /// Default config file location: `<config-dir>/cafesched/config.yml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cafesched").join("config.yml"))
    }

    /// Load configuration.
    ///
    /// With an explicit path the file must exist and parse. Without one the
    /// default location is used when present, else the default config.
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            debug!(path = %path.display(), "Config::load: explicit path");
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "Config::load: default path exists");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&raw)
            .wrap_err_with(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }
}
