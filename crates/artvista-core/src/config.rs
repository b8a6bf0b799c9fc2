//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the Firebase Web API key, the artwork backend URL, the OAuth redirect
//! target used by Google sign-in, where the session token lives, and the
//! last email used to log in.
//!
//! Configuration is stored at `~/.config/artvista/config.json`. The
//! `ARTVISTA_API_KEY`, `ARTVISTA_API_URL`, `ARTVISTA_IDENTITY_URL` and
//! `ARTVISTA_REDIRECT_URI` environment variables override the file.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::session::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "artvista";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Where Google sends the browser after sign-in unless configured otherwise
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    #[default]
    File,
    Keyring,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    /// Identity Toolkit host override, e.g. the Firebase auth emulator
    pub identity_url: Option<String>,
    pub oauth_redirect_uri: Option<String>,
    #[serde(default)]
    pub token_backend: TokenBackend,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply `ARTVISTA_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(key) = get("ARTVISTA_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(url) = get("ARTVISTA_API_URL") {
            self.api_base_url = Some(url);
        }
        if let Some(url) = get("ARTVISTA_IDENTITY_URL") {
            self.identity_url = Some(url);
        }
        if let Some(uri) = get("ARTVISTA_REDIRECT_URI") {
            self.oauth_redirect_uri = Some(uri);
        }
        self
    }

    pub fn redirect_uri(&self) -> &str {
        self.oauth_redirect_uri
            .as_deref()
            .unwrap_or(DEFAULT_REDIRECT_URI)
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

    /// Build the token store selected by `token_backend`.
    pub fn token_store(&self) -> Result<Arc<dyn TokenStore>> {
        Ok(match self.token_backend {
            TokenBackend::File => Arc::new(FileTokenStore::new(self.cache_dir()?)),
            TokenBackend::Keyring => Arc::new(KeyringTokenStore),
            TokenBackend::Memory => Arc::new(MemoryTokenStore::new()),
        })
    }
}
