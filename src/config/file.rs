// src/config/file.rs
// File-based configuration from ~/.copilot/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Top-level config structure
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct CopilotConfig {
    #[serde(default)]
    pub llm: LlmConfig,
}

/// LLM configuration section
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct LlmConfig {
    /// Public model id used when nothing else picks one
    pub default_model: Option<String>,
    pub max_output_tokens: Option<u32>,
    pub analyze_temperature: Option<f32>,
    pub repair_temperature: Option<f32>,
    pub request_timeout_secs: Option<u64>,
    pub openai_base_url: Option<String>,
}

impl CopilotConfig {
    /// Load config from ~/.copilot/config.toml
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`; missing or unparsable files yield defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    debug!(path = %path.display(), "Loaded config from file");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse config file");
                    Self::default()
                }
            },
            Err(_) => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
        }
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".copilot")
            .join("config.toml")
    }
}
