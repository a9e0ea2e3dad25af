//! Configuration for the CLI

use anyhow::{Context, Result};
use llm::General;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::LazyLock};

/// Environment variable overriding the configured API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

static CONFIG: LazyLock<PathBuf> =
    LazyLock::new(|| dirs::home_dir().unwrap_or_default().join(".config/relay.toml"));

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// The system prompt every chat starts from
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// The model settings
    #[serde(default)]
    pub model: General,

    /// The completions endpoint
    #[serde(default)]
    pub provider: Provider,

    /// The builtin function settings
    #[serde(default)]
    pub functions: functions::Config,
}

/// Where completions are requested from.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Provider {
    /// OpenAI-compatible chat completions URL
    pub endpoint: String,

    /// The API key, not needed for a local Ollama
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Config {
    /// Load the configuration from the file
    pub fn load() -> Result<Self> {
        let text = std::fs::read_to_string(CONFIG.as_path()).with_context(|| {
            format!(
                "failed to read {}, run `relay generate` to create it",
                CONFIG.display()
            )
        })?;
        Self::parse(&text)
    }

    /// Parse the configuration from TOML
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    /// Save the configuration to the file
    pub fn save(&self) -> Result<()> {
        if let Some(dir) = CONFIG.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(CONFIG.as_path(), toml::to_string(self)?)?;
        tracing::info!("Configuration saved to {}", CONFIG.display());
        Ok(())
    }

    /// The API key, preferring the environment over the file
    pub fn key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| self.provider.key.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            model: General::default(),
            provider: Provider::default(),
            functions: functions::Config::default(),
        }
    }
}

impl Default for Provider {
    fn default() -> Self {
        Self {
            endpoint: openai::endpoint::OPENAI.into(),
            key: Some("YOUR_API_KEY".into()),
        }
    }
}

fn default_system_prompt() -> String {
    "You are a helpful AI assistant".into()
}
