use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::prompt::FORMATTING_INSTRUCTIONS;
use crate::webhook::DEFAULT_WEBHOOK_URL;

/// Environment variable that overrides the configured webhook URL.
pub const WEBHOOK_URL_ENV: &str = "WEBCHAT_WEBHOOK_URL";

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub formatting_instructions: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the user's config directory; a missing file means defaults.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| anyhow!("Invalid config at {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Webhook URL: env var first, then the config file, then the default.
    pub fn webhook_url(&self) -> String {
        std::env::var(WEBHOOK_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.webhook_url.clone())
            .unwrap_or_else(|| DEFAULT_WEBHOOK_URL.to_string())
    }

    pub fn formatting_instructions(&self) -> &str {
        self.formatting_instructions
            .as_deref()
            .unwrap_or(FORMATTING_INSTRUCTIONS)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("webchat").join("config.json"))
    }
}
