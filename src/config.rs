use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("itemdb")
}

fn default_backup_count() -> usize {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Settings read from `config.toml`; every key is optional
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Where the per-kind JSON databases live
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory searched when resolving icon names; `<data_dir>/Icons` if unset
    #[serde(default)]
    pub icon_dir: Option<PathBuf>,

    /// Backups kept per database file
    #[serde(default = "default_backup_count")]
    pub backup_count: usize,

    /// Default filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            icon_dir: None,
            backup_count: default_backup_count(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn icon_dir(&self) -> PathBuf {
        self.icon_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("Icons"))
    }
}

/// Resolve the canonical path for the config file.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("itemdb").join("config.toml"))
}

/// Loads the config at `path` (or the canonical path)
///
/// A missing file yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path.map(Path::to_path_buf).or_else(config_path) {
        Some(path) => path,
        None => return Ok(Config::default()),
    };

    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(&path)?;
    Ok(toml::from_str(&content)?)
}
