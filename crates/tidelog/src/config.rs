//! Configuration file support for tidelog.
//!
//! Loads configuration from `~/.config/tidelog/config.toml`. Command-line
//! flags take precedence over anything set here.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use tidelog_logging::LogFormat;

/// The config directory name (under the platform config dir)
pub const CONFIG_DIR: &str = "tidelog";

/// The config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Top-level configuration
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the logbook is kept
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    pub backend: Option<Backend>,
    /// Database or JSON file path; each backend has its own default
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    Json,
}

/// Units shown next to numbers; values are stored unitless
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    pub speed_unit: Option<String>,
    pub distance_unit: Option<String>,
}

impl DisplayConfig {
    pub fn speed_unit(&self) -> &str {
        self.speed_unit.as_deref().unwrap_or("knots")
    }

    pub fn distance_unit(&self) -> &str {
        self.distance_unit.as_deref().unwrap_or("miles")
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// tracing filter level, e.g. "warn" or "debug"
    pub level: Option<String>,
    /// pretty, json or compact
    pub format: Option<String>,
    /// Append JSON event lines to this file
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("warn")
    }

    pub fn format(&self) -> Result<Option<LogFormat>> {
        self.format
            .as_deref()
            .map(|f| f.parse::<LogFormat>().map_err(anyhow::Error::msg))
            .transpose()
    }
}

impl Config {
    /// Path of the config file, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE_NAME))
    }

    /// Load the config file from its default location, or defaults if it does not exist.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Ok(Self::load_from(&path)?.unwrap_or_default()),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(Some(config))
    }
}
