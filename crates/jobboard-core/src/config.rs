//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API base URL, the revalidation period and the last
//! email used to log in.
//!
//! Configuration is stored at `~/.config/jobboard/config.json`. The
//! `API_URL` environment variable takes precedence over the stored URL.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::controller::DEFAULT_REVALIDATE_INTERVAL;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "jobboard";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable holding the API base URL
pub const API_URL_ENV: &str = "API_URL";

/// Shortest accepted revalidation period
const MIN_REVALIDATE_SECS: u64 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_url: Option<String>,
    pub revalidate_interval_secs: Option<u64>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Ok(serde_json::from_str(&contents).context("Failed to parse config file")?)
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

    /// Directory holding the cookie jar
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// API base URL with a trailing slash; `API_URL` wins over the file.
    pub fn api_base_url(&self) -> Result<String> {
        Self::resolve_api_url(std::env::var(API_URL_ENV).ok(), self.api_url.as_deref())
    }

    fn resolve_api_url(env: Option<String>, stored: Option<&str>) -> Result<String> {
        let url = env
            .filter(|u| !u.trim().is_empty())
            .or_else(|| stored.map(str::to_string))
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No API URL configured. Set {} or api_url in the config file.",
                    API_URL_ENV
                )
            })?;

        if url.ends_with('/') {
            Ok(url)
        } else {
            Ok(format!("{}/", url))
        }
    }

    pub fn revalidate_interval(&self) -> Duration {
        self.revalidate_interval_secs
            .map(|secs| Duration::from_secs(secs.max(MIN_REVALIDATE_SECS)))
            .unwrap_or(DEFAULT_REVALIDATE_INTERVAL)
    }
}
