//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.insight-factory.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Text-generation model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Outbound email settings.
    #[serde(default)]
    pub email: EmailConfig,

    /// Report worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
}

/// Text-generation model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Chat-completions endpoint URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model identifier sent in the request body.
    #[serde(default = "default_model_id")]
    pub id: String,

    /// Bearer token for the endpoint. The placeholder value
    /// `test-token` counts as unconfigured, so sample configs ship
    /// safely in fallback mode.
    #[serde(default)]
    pub token: Option<String>,

    /// Temperature for generation.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens in the narrative response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds. Always set explicitly; a stalled
    /// model call must end in the fallback, not hang the run.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            id: default_model_id(),
            token: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl ModelConfig {
    /// Whether a usable token is present. Empty strings and the
    /// `test-token` placeholder count as unconfigured.
    pub fn token_configured(&self) -> bool {
        match self.token.as_deref() {
            Some("") | Some("test-token") | None => false,
            Some(_) => true,
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com/models".to_string()
}

fn default_model_id() -> String {
    "openai/gpt-4".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    250
}

fn default_timeout() -> u64 {
    10
}

/// Outbound email settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Directory where outbound messages are spooled.
    #[serde(default = "default_outbox")]
    pub outbox: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            outbox: default_outbox(),
        }
    }
}

fn default_outbox() -> String {
    "outbox".to_string()
}

/// Report worker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Capacity of the bounded submission queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_queue_capacity() -> usize {
    16
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".insight-factory.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings; only
    /// explicitly provided values override.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref api_url) = args.models_url {
            self.model.api_url = api_url.clone();
        }
        if let Some(ref model) = args.model {
            self.model.id = model.clone();
        }
        if args.token.is_some() {
            self.model.token = args.token.clone();
        }
        if let Some(timeout) = args.timeout {
            self.model.timeout_seconds = timeout;
        }
        if let Some(ref outbox) = args.outbox {
            self.email.outbox = outbox.display().to_string();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let mut config = Config::default();
        // Ship the placeholder so the sample file documents the field
        // while staying in fallback mode.
        config.model.token = Some("test-token".to_string());
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
