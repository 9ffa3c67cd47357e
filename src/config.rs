//! User-editable settings, loaded from TOML.
//!
//! Lookup order: an explicit path, then `config.toml` in the platform config
//! directory, then built-in defaults. Environment variables override the
//! loaded values.

use crate::browser::{BrowserSettings, DEFAULT_PAGE_SIZE, DEFAULT_SCROLL_THRESHOLD_PX};
use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const ENV_API_BASE_URL: &str = "FILEDECK_API_BASE_URL";
pub const ENV_USER_ID: &str = "FILEDECK_USER_ID";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Origin prefixed to every API path.
    pub api_base_url: String,
    pub page_size: u64,
    pub search_debounce_ms: u64,
    pub scroll_threshold_px: f64,
    pub request_timeout_secs: u64,
    /// Used when no user is given on the command line.
    pub user_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: 350,
            scroll_threshold_px: DEFAULT_SCROLL_THRESHOLD_PX,
            request_timeout_secs: 30,
            user_id: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "filedeck").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from `path` (tilde-expanded) or the default location.
    ///
    /// A missing explicit file is an error; a missing default file is not.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(raw) => {
                let expanded = PathBuf::from(shellexpand::tilde(raw).to_string());
                Self::from_file(&expanded)?
            }
            None => match Self::default_path() {
                Some(default) if default.exists() => Self::from_file(&default)?,
                _ => Self::default(),
            },
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_toml(&raw)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production).
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(user) = lookup(ENV_USER_ID).filter(|v| !v.trim().is_empty()) {
            self.user_id = Some(user.trim().to_string());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            bail!("api_base_url must not be empty");
        }
        if self.page_size == 0 {
            bail!("page_size must be at least 1");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be at least 1");
        }
        if !self.scroll_threshold_px.is_finite() || self.scroll_threshold_px < 0.0 {
            bail!("scroll_threshold_px must be a non-negative number");
        }
        Ok(())
    }

    pub fn browser_settings(&self) -> BrowserSettings {
        BrowserSettings {
            page_size: self.page_size,
            scroll_threshold_px: self.scroll_threshold_px,
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
