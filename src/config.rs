//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the backend origin and the last used username.
//!
//! Configuration is stored at `~/.config/hallpass/config.json`. The
//! `HALLPASS_BACKEND_URL` environment variable (or a `.env` entry) takes
//! precedence over the stored backend origin.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_BASE_URL;

/// Application name used for the config directory path
const APP_NAME: &str = "hallpass";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the backend origin
const BACKEND_URL_ENV: &str = "HALLPASS_BACKEND_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub backend_url: Option<String>,
    pub last_username: Option<String>,

    /// Where this config persists. `None` means in-memory only (the
    /// default), so constructed configs never touch the user's files.
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Config {
    /// Load the configuration from the user's config directory,
    /// falling back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };
        config.path = Some(path);
        Ok(config)
    }

    /// Create a default configuration persisting at the given path.
    pub fn at_path(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            ..Self::default()
        }
    }

    /// Persist the configuration. A no-op for in-memory configs.
    pub fn save(&self) -> Result<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Resolve the backend origin: environment variable, then config file,
    /// then the built-in default. A trailing slash is stripped so paths can
    /// be appended directly.
    pub fn base_url(&self) -> String {
        let url = std::env::var(BACKEND_URL_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.backend_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        url.trim_end_matches('/').to_string()
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_base_url_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_base_url_from_config_strips_trailing_slash() {
        let config = Config {
            backend_url: Some("http://backend.example:9090/".to_string()),
            ..Config::default()
        };
        assert_eq!(config.base_url(), "http://backend.example:9090");
    }

    #[test]
    fn test_save_without_path_is_a_noop() {
        let mut config = Config::default();
        config.last_username = Some("alice".to_string());
        // In-memory config: nothing to write, nothing to fail
        config.save().unwrap();
    }

    #[test]
    fn test_save_writes_to_configured_path_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = Config::at_path(path.clone());
        config.backend_url = Some("http://localhost:8080".to_string());
        config.last_username = Some("alice".to_string());
        config.save().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: Config = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.backend_url, config.backend_url);
        assert_eq!(parsed.last_username, config.last_username);
        // The persistence location itself is not serialized
        assert!(!contents.contains("path"));
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = Config {
            backend_url: Some("http://localhost:8080".to_string()),
            last_username: Some("alice".to_string()),
            ..Config::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.backend_url, config.backend_url);
        assert_eq!(parsed.last_username, config.last_username);
    }
}
