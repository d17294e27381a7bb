//! Application configuration
//!
//! Configuration loaded from `.gh-pr-projects.toml`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Application configuration loaded from `.gh-pr-projects.toml`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Name of the single-select field set on newly added items
    #[serde(default = "default_status_field")]
    pub status_field: String,

    /// Option of `status_field` selected for newly added items
    #[serde(default = "default_status")]
    pub default_status: String,

    /// Extra attempts for failed read-only queries (mutations never retry)
    #[serde(default = "default_read_retries")]
    pub read_retries: u32,

    /// Pause between two query attempts, in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// GitHub Enterprise API base URL (e.g., "https://ghe.example.com/api/v3")
    #[serde(default)]
    pub api_url: Option<String>,
}

fn default_status_field() -> String {
    "Status".to_string()
}

fn default_status() -> String {
    "Todo".to_string() // Created with every new project
}

fn default_read_retries() -> u32 {
    2
}

fn default_retry_delay_ms() -> u64 {
    1000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            status_field: default_status_field(),
            default_status: default_status(),
            read_retries: default_read_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            api_url: None,
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then the config directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Load config from an explicit path, failing on missing or invalid files
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Pause between two query attempts
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}
