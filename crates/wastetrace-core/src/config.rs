//! Application configuration management.
//!
//! This module handles loading and saving the client configuration, which
//! includes the backend base URL override and the last used login email.
//!
//! Configuration is stored at `<config_dir>/wastetrace/config.json`. The
//! `WASTETRACE_API_URL` environment variable (a `.env` file is honored by
//! the CLI) takes precedence over the stored base URL.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache/session directory paths.
const APP_NAME: &str = "wastetrace";

/// Config file name.
const CONFIG_FILE: &str = "config.json";

/// Default backend for local development; deployments override via
/// `WASTETRACE_API_URL` or the config file.
const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Environment variable overriding the backend base URL.
pub const API_URL_ENV: &str = "WASTETRACE_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Resolve the backend base URL: environment, then config, then default.
    pub fn api_base_url(&self) -> String {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                return url;
            }
        }
        self.api_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }
}

/// Cache directory for offline data.
pub fn cache_dir() -> Result<PathBuf> {
    let cache_dir =
        dirs::cache_dir().ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
    Ok(cache_dir.join(APP_NAME))
}

/// Session directory for the persisted token and user profile.
///
/// Lives under the data directory rather than the cache directory so the
/// session survives cache cleanup.
pub fn session_dir() -> Result<PathBuf> {
    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
    Ok(data_dir.join(APP_NAME).join("session"))
}
