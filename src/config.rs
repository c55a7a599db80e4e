//! Application configuration management.
//!
//! This module handles loading the application configuration,
//! which includes the reporting API base URL, an optional bearer token,
//! the request timeout and the table page size.
//!
//! Configuration is stored at `~/.config/esgdesk/config.json`. The
//! `ESGDESK_API_URL` and `ESGDESK_API_TOKEN` environment variables (also
//! read from a `.env` file) take precedence over the file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "esgdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Rows per table page when not configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

const API_URL_ENV: &str = "ESGDESK_API_URL";
const API_TOKEN_ENV: &str = "ESGDESK_API_TOKEN";

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub api_token: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub page_size: Option<usize>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Malformed config file {}", path.display()))?
        } else {
            Self::default()
        };
        Ok(config.with_env_overrides(env_var))
    }

    /// Defaults plus environment overrides, for when the file cannot be used.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(env_var)
    }

    /// Apply environment overrides. Empty values are ignored.
    fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = Some(url);
        }
        if let Some(token) = lookup(API_TOKEN_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_token = Some(token);
        }
        self
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for rolling log files.
    pub fn log_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join("logs"))
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn page_size(&self) -> usize {
        self.page_size.filter(|&n| n > 0).unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url(), "http://127.0.0.1:8000/api");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.page_size(), 10);
    }

    #[test]
    fn test_zero_page_size_falls_back() {
        let config = Config {
            page_size: Some(0),
            ..Default::default()
        };
        assert_eq!(config.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let config = Config {
            api_base_url: Some("http://file/api".to_string()),
            ..Default::default()
        };
        let config = config.with_env_overrides(|key| match key {
            "ESGDESK_API_URL" => Some("http://env/api".to_string()),
            "ESGDESK_API_TOKEN" => Some("".to_string()),
            _ => None,
        });
        assert_eq!(config.api_base_url(), "http://env/api");
        assert_eq!(config.api_token, None);
    }

    #[test]
    fn test_env_overrides_apply_to_fallback_defaults() {
        let config = Config::default().with_env_overrides(|key| match key {
            "ESGDESK_API_URL" => Some("http://env/api".to_string()),
            "ESGDESK_API_TOKEN" => Some("secret".to_string()),
            _ => None,
        });
        assert_eq!(config.api_base_url(), "http://env/api");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_parse_partial_file() {
        let config: Config = serde_json::from_str(r#"{"page_size": 25}"#).unwrap();
        assert_eq!(config.page_size(), 25);
        assert_eq!(config.api_base_url(), DEFAULT_BASE_URL);
    }
}
