//! Station manager configuration
//!
//! Loaded from an optional TOML file, then overridden by environment
//! variables:
//!
//! - `BOOMBOX_CONFIG`: Path to a TOML config file (optional)
//! - `BOOMBOX_DATA_DIR`: Object store directory (default: `data`)
//! - `BOOMBOX_DATA_KEY`: Object key of the station data (default: `BoomBoxStations.json`)
//! - `BOOMBOX_DEFAULT_LIMIT`: Per-player quota for fresh data (default: 3)
//! - `BOOMBOX_GRANTS_FILE`: Player grants file (optional)
//! - `BOOMBOX_URL_LIST_PATH`: File the station list is written to (optional, log only if unset)
//! - `BOOMBOX_LOG_LEVEL`: Default log filter (default: `info`)
//! - `BOOMBOX_LOG_JSON`: JSON log lines (default: false)

use crate::stations::{ManagerOptions, DEFAULT_DATA_KEY, DEFAULT_MAX_STREAMS_PER_PLAYER};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StationsConfig {
    pub storage: StorageSettings,
    /// Per-player quota used when no station data exists yet
    pub default_limit: u32,
    pub grants_file: Option<PathBuf>,
    pub url_list_path: Option<PathBuf>,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
    pub data_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for StationsConfig {
    fn default() -> Self {
        StationsConfig {
            storage: StorageSettings::default(),
            default_limit: DEFAULT_MAX_STREAMS_PER_PLAYER,
            grants_file: None,
            url_list_path: None,
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            data_dir: PathBuf::from("data"),
            data_key: DEFAULT_DATA_KEY.to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl StationsConfig {
    /// Load configuration from `BOOMBOX_CONFIG` (if set) and environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("BOOMBOX_CONFIG") {
            Ok(path) => Self::load(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `BOOMBOX_*` overrides from `lookup`
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(dir) = lookup("BOOMBOX_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(key) = lookup("BOOMBOX_DATA_KEY") {
            self.storage.data_key = key;
        }
        if let Some(value) = lookup("BOOMBOX_DEFAULT_LIMIT") {
            self.default_limit = value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "BOOMBOX_DEFAULT_LIMIT",
                value,
            })?;
        }
        if let Some(path) = lookup("BOOMBOX_GRANTS_FILE") {
            self.grants_file = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("BOOMBOX_URL_LIST_PATH") {
            self.url_list_path = Some(PathBuf::from(path));
        }
        if let Some(level) = lookup("BOOMBOX_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = lookup("BOOMBOX_LOG_JSON") {
            self.logging.json = json == "true" || json == "1";
        }
        Ok(())
    }

    pub fn manager_options(&self) -> ManagerOptions {
        ManagerOptions {
            data_key: self.storage.data_key.clone(),
            default_limit: self.default_limit,
        }
    }
}
