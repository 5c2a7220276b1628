//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the admin tool's origin, the page URL presentations are derived from,
//! and the target-origin policy for cross-context messages.
//!
//! Configuration is stored at `~/.config/clampcache/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "clampcache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Origin the clamping admin tool serves from by default
const DEFAULT_ORIGIN: &str = "http://localhost:5000";

/// Unrestricted target origin, matching the original postMessage behavior
const DEFAULT_TARGET_ORIGIN: &str = "*";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub origin: Option<String>,
    pub page_url: Option<String>,
    pub target_origin: Option<String>,
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

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn origin(&self) -> &str {
        self.origin.as_deref().unwrap_or(DEFAULT_ORIGIN)
    }

    /// The page presentations are derived from when no URL is given.
    pub fn page_url(&self) -> String {
        match &self.page_url {
            Some(url) => url.clone(),
            None => format!("{}/", self.origin().trim_end_matches('/')),
        }
    }

    pub fn target_origin(&self) -> &str {
        self.target_origin.as_deref().unwrap_or(DEFAULT_TARGET_ORIGIN)
    }
}
