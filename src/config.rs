//! Configuration Management
//!
//! Handles persistent configuration storage for the `gophish` CLI.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_ADMIN_URL: &str = "https://localhost:3333";
const DEFAULT_PHISH_URL: &str = "http://localhost";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Admin console URL
    #[serde(default)]
    pub admin_url: Option<String>,
    /// Public phishing server URL
    #[serde(default)]
    pub phish_url: Option<String>,
    /// API key saved by `gophish login --save`
    #[serde(default)]
    pub api_key: Option<String>,
    /// Require valid TLS certificates
    #[serde(default)]
    pub verify_certs: bool,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gophish-client").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get effective admin URL (CLI > env > config > default)
    pub fn effective_admin_url(&self, cli: Option<&str>) -> String {
        pick(cli, "GOPHISH_ADMIN_URL", self.admin_url.as_deref())
            .unwrap_or_else(|| DEFAULT_ADMIN_URL.to_string())
    }

    /// Get effective phishing server URL (CLI > env > config > default)
    pub fn effective_phish_url(&self, cli: Option<&str>) -> String {
        pick(cli, "GOPHISH_PHISH_URL", self.phish_url.as_deref())
            .unwrap_or_else(|| DEFAULT_PHISH_URL.to_string())
    }

    /// Get effective API key (CLI > env > config)
    pub fn effective_api_key(&self, cli: Option<&str>) -> Option<String> {
        pick(cli, "GOPHISH_API_KEY", self.api_key.as_deref())
    }

    /// Set API key and save
    pub fn set_api_key(&mut self, api_key: &str) -> Result<()> {
        self.api_key = Some(api_key.to_string());
        self.save()
    }
}

fn pick(cli: Option<&str>, env: &str, config: Option<&str>) -> Option<String> {
    cli.map(str::to_string)
        .or_else(|| std::env::var(env).ok().filter(|v| !v.is_empty()))
        .or_else(|| config.map(str::to_string))
}
