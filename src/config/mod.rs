//! Configuration management for formbuilder
//!
//! Handles the formbuilder data directory and config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Key the form snapshot is stored under
pub const DEFAULT_STORAGE_KEY: &str = "formFields";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            log_level: default_log_level(),
        }
    }
}

/// Returns the formbuilder data directory (e.g. ~/.local/share/formbuilder)
pub fn formbuilder_home() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(dirs::home_dir)
        .context("Could not determine data directory")?;
    Ok(base.join("formbuilder"))
}

/// Paths to everything formbuilder keeps on disk
#[derive(Debug, Clone)]
pub struct FormbuilderPaths {
    pub root: PathBuf,
    pub config: PathBuf,
    pub db_file: PathBuf,
    pub log_file: PathBuf,
}

impl FormbuilderPaths {
    pub fn new() -> Result<Self> {
        Ok(Self::at(formbuilder_home()?))
    }

    /// Lay out paths under an arbitrary root
    pub fn at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            config: root.join("config.toml"),
            db_file: root.join("formbuilder.db"),
            log_file: root.join("formbuilder.log"),
            root,
        }
    }

    /// Create the root directory if it doesn't exist
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.root).context("Failed to create formbuilder directory")?;
        Ok(())
    }

    /// Check if formbuilder has been initialized
    pub fn is_initialized(&self) -> bool {
        self.config.exists() && self.db_file.exists()
    }
}

/// Load configuration from disk, falling back to defaults when absent
pub fn load_config(paths: &FormbuilderPaths) -> Result<Config> {
    if !paths.config.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&paths.config).context("Failed to read config.toml")?;
    toml::from_str(&content).context("Failed to parse config.toml")
}

/// Save configuration to disk
pub fn save_config(paths: &FormbuilderPaths, config: &Config) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(&paths.config, content).context("Failed to write config.toml")?;
    Ok(())
}
