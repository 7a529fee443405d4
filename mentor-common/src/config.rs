//! Configuration loading and data folder resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// TOML configuration file contents (~/.config/mentor/config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Data folder holding mentor.db
    pub data_folder: Option<String>,
    /// Generative provider API key
    pub api_key: Option<String>,
    /// Generative provider base URL (OpenAI-compatible)
    pub api_base_url: Option<String>,
    /// HTTP listen port
    pub port: Option<u16>,
}

/// Resolve the data folder, in priority order:
/// 1. Environment variable (MENTOR_DATA)
/// 2. TOML config file
/// 3. OS-dependent compiled default
pub fn resolve_data_folder() -> PathBuf {
    if let Ok(path) = std::env::var("MENTOR_DATA") {
        return PathBuf::from(path);
    }

    if let Ok(config) = load_toml_config() {
        if let Some(folder) = config.data_folder {
            return PathBuf::from(folder);
        }
    }

    default_data_folder()
}

/// Resolve the generative provider API key.
///
/// Priority: environment (MENTOR_API_KEY) → TOML config. Returns None when
/// no valid key is configured; AI-dependent paths then degrade to their
/// fallback behavior instead of crashing.
pub fn resolve_api_key() -> Option<String> {
    let env_key = std::env::var("MENTOR_API_KEY").ok().filter(|k| is_valid_key(k));
    let toml_key = load_toml_config()
        .ok()
        .and_then(|c| c.api_key)
        .filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!("API key found in both environment and TOML config; using environment");
    }

    if let Some(key) = env_key {
        info!("Provider API key loaded from environment variable");
        return Some(key);
    }

    if let Some(key) = toml_key {
        info!("Provider API key loaded from TOML config");
        return Some(key);
    }

    warn!("No provider API key configured; AI features will run in fallback mode");
    None
}

/// Resolve the provider base URL (MENTOR_API_BASE_URL → TOML → provider default)
pub fn resolve_api_base_url() -> Option<String> {
    if let Ok(url) = std::env::var("MENTOR_API_BASE_URL") {
        if !url.trim().is_empty() {
            return Some(url);
        }
    }
    load_toml_config().ok().and_then(|c| c.api_base_url)
}

/// Resolve the HTTP listen port (MENTOR_PORT → TOML → 5780)
pub fn resolve_port() -> u16 {
    if let Ok(port) = std::env::var("MENTOR_PORT") {
        if let Ok(port) = port.parse() {
            return port;
        }
    }
    load_toml_config()
        .ok()
        .and_then(|c| c.port)
        .unwrap_or(5780)
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Load the TOML config file from the platform config directory
pub fn load_toml_config() -> Result<TomlConfig> {
    let path = config_file_path()?;
    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Get configuration file path for the platform
fn config_file_path() -> Result<PathBuf> {
    let path = dirs::config_dir()
        .map(|d| d.join("mentor").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if path.exists() {
        Ok(path)
    } else {
        Err(Error::Config(format!("Config file not found: {:?}", path)))
    }
}

/// Get OS-dependent default data folder path
fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("mentor"))
        .unwrap_or_else(|| PathBuf::from("./mentor_data"))
}

/// Ensure the data folder exists, creating it if missing
pub fn ensure_data_folder(folder: &Path) -> Result<()> {
    if !folder.exists() {
        std::fs::create_dir_all(folder)?;
        info!("Created data folder: {}", folder.display());
    }
    Ok(())
}

/// Path of the SQLite database inside the data folder
pub fn database_path(folder: &Path) -> PathBuf {
    folder.join("mentor.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("sk-abc123"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
    }

    #[test]
    fn test_database_path() {
        let path = database_path(Path::new("/tmp/mentor"));
        assert_eq!(path, PathBuf::from("/tmp/mentor/mentor.db"));
    }
}
