//! Configuration file handling with TOML support.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Application configuration loaded from TOML file.
///
/// Every field has a default; an empty or missing file behaves exactly
/// like no file at all. CLI flags override whatever is loaded here.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Backend origin serving the stock endpoints
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_timeout() -> u64 {
    10
}

impl Config {
    /// Load configuration from file.
    pub fn load(path: &PathBuf) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from the default location, or fall back to defaults.
    pub fn load_or_default() -> Self {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                match Self::load(&path) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to load config: {}", e);
                    }
                }
            }
        }
        Config::default()
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("realticker").join("config.toml"))
    }
}
