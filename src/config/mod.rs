//! Configuration management
//!
//! Settings live in `config.yaml` under the library home directory
//! (`~/.courselib` unless `COURSELIB_HOME` points elsewhere).

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Overrides the library home directory.
pub const HOME_ENV: &str = "COURSELIB_HOME";

/// Overrides the database path, taking precedence over the config file.
pub const DATABASE_ENV: &str = "COURSELIB_DB";

/// Name of the store file inside the home directory.
pub const STORE_FILE: &str = "courseLibrary.db";

/// Keys accepted by [`Config::get`] and [`Config::set`].
pub const KEYS: &[&str] = &["database_path", "color"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Store file location; defaults to `<home>/courseLibrary.db`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    /// Colored terminal output
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            color: true,
        }
    }
}

impl Config {
    /// Load from the default config file, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_saphyr::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Invalid config file {}: {}", path.display(), e))
    }

    /// Save to the default config file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let yaml = serde_saphyr::to_string(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
        std::fs::write(path, yaml).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// The library home directory
    pub fn home_dir() -> Result<PathBuf> {
        if let Some(home) = std::env::var_os(HOME_ENV) {
            return Ok(PathBuf::from(home));
        }

        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?
            .join(".courselib"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("config.yaml"))
    }

    /// Resolved store path: `COURSELIB_DB`, then the config value, then the home default
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(DATABASE_ENV) {
            return Ok(PathBuf::from(path));
        }
        Ok(self.database_path_in(&Self::home_dir()?))
    }

    /// Store path relative to a given home directory, ignoring the environment
    pub fn database_path_in(&self, home: &Path) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| home.join(STORE_FILE))
    }

    /// Get a setting as display text
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match key {
            "database_path" => Ok(self
                .database_path
                .as_ref()
                .map(|p| p.display().to_string())),
            "color" => Ok(Some(self.color.to_string())),
            _ => bail!("Unknown config key '{}'. Valid keys: {}", key, KEYS.join(", ")),
        }
    }

    /// Set a setting from text, validating the value
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "database_path" => {
                let value = value.trim();
                self.database_path = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "color" => {
                self.color = match value.trim().to_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    other => bail!("Invalid value '{}' for color. Expected true or false", other),
                };
            }
            _ => bail!("Unknown config key '{}'. Valid keys: {}", key, KEYS.join(", ")),
        }
        Ok(())
    }
}
