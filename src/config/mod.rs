// src/config/mod.rs
// Configuration and shared constants

pub mod env;
pub mod file;

pub use env::{ApiKeys, EnvConfig};
pub use file::{CopilotConfig, LlmConfig};

use crate::llm::DEFAULT_MODEL_ID;
use std::time::Duration;

pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8000;
pub const DEFAULT_ANALYZE_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_REPAIR_TEMPERATURE: f32 = 0.1;
/// Characters of the failed response quoted back in the repair prompt
pub const REPAIR_EXCERPT_CHARS: usize = 500;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Effective LLM settings after merging env over file over defaults
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub default_model: String,
    pub max_output_tokens: u32,
    pub analyze_temperature: f32,
    pub repair_temperature: f32,
    /// Bound on each upstream call, enforced by the orchestrator
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub openai_base_url: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            default_model: DEFAULT_MODEL_ID.to_string(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            analyze_temperature: DEFAULT_ANALYZE_TEMPERATURE,
            repair_temperature: DEFAULT_REPAIR_TEMPERATURE,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            openai_base_url: None,
        }
    }
}

impl LlmSettings {
    pub fn resolve(file: &CopilotConfig, env: &EnvConfig) -> Self {
        let defaults = Self::default();
        let llm = &file.llm;

        Self {
            default_model: env
                .default_model
                .clone()
                .or_else(|| llm.default_model.clone())
                .unwrap_or(defaults.default_model),
            max_output_tokens: llm.max_output_tokens.unwrap_or(defaults.max_output_tokens),
            analyze_temperature: llm
                .analyze_temperature
                .unwrap_or(defaults.analyze_temperature),
            repair_temperature: llm.repair_temperature.unwrap_or(defaults.repair_temperature),
            request_timeout: env
                .request_timeout_secs
                .or(llm.request_timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            connect_timeout: defaults.connect_timeout,
            openai_base_url: env
                .openai_base_url
                .clone()
                .or_else(|| llm.openai_base_url.clone()),
        }
    }
}
