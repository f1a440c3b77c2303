// src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use tracing::{debug, info, warn};

/// API keys loaded from environment variables
#[derive(Clone, Default)]
pub struct ApiKeys {
    /// OpenAI API key (OPENAI_API_KEY), shared by both OpenAI families
    pub openai: Option<String>,
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("openai", &self.openai.as_ref().map(|_| "<set>"))
            .finish()
    }
}

impl ApiKeys {
    /// Load API keys from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load API keys through `lookup`.
    ///
    /// Set `COPILOT_DISABLE_LLM=1` to suppress all keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        if parse_bool(lookup("COPILOT_DISABLE_LLM")).unwrap_or(false) {
            info!("COPILOT_DISABLE_LLM is set, LLM providers disabled");
            return Self::default();
        }

        let keys = Self {
            openai: lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()),
        };
        keys.log_status();
        keys
    }

    /// Log which API keys are available (without exposing values)
    fn log_status(&self) {
        if self.openai.is_some() {
            debug!(keys = ?["OpenAI"], "API keys loaded");
        } else {
            warn!("No API keys configured - analysis will be unavailable");
        }
    }

    pub fn has_llm_provider(&self) -> bool {
        self.openai.is_some()
    }
}

/// Environment overrides for the LLM layer
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub api_keys: ApiKeys,
    /// COPILOT_DEFAULT_MODEL
    pub default_model: Option<String>,
    /// COPILOT_REQUEST_TIMEOUT_SECS
    pub request_timeout_secs: Option<u64>,
    /// COPILOT_OPENAI_BASE_URL
    pub openai_base_url: Option<String>,
}

impl EnvConfig {
    /// Load all environment configuration (call once at startup)
    pub fn load() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let request_timeout_secs = lookup("COPILOT_REQUEST_TIMEOUT_SECS").and_then(|v| {
            v.trim()
                .parse()
                .map_err(|_| warn!(value = %v, "Invalid COPILOT_REQUEST_TIMEOUT_SECS, ignoring"))
                .ok()
        });

        Self {
            api_keys: ApiKeys::from_lookup(&lookup),
            default_model: lookup("COPILOT_DEFAULT_MODEL").filter(|s| !s.trim().is_empty()),
            request_timeout_secs,
            openai_base_url: lookup("COPILOT_OPENAI_BASE_URL").filter(|s| !s.trim().is_empty()),
        }
    }
}

fn parse_bool(value: Option<String>) -> Option<bool> {
    match value?.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
