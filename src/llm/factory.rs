// src/llm/factory.rs
// Provider factory: one shared adapter per backend family

use crate::config::{ApiKeys, LlmSettings};
use crate::error::{CopilotError, Result};
use crate::llm::http_client::LlmHttpClient;
use crate::llm::openai_chat::{DEFAULT_BASE_URL, OpenAiChatClient};
use crate::llm::openai_responses::OpenAiResponsesClient;
use crate::llm::provider::{LlmProvider, ProviderKind};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Adapters keyed by provider family.
///
/// Built once at startup and never mutated afterwards; lookups hand out
/// `Arc` clones so concurrent analyses share the same adapter.
#[derive(Clone, Default)]
pub struct ProviderFactory {
    clients: HashMap<ProviderKind, Arc<dyn LlmProvider>>,
}

impl ProviderFactory {
    /// Factory with no adapters; use `with_provider` to populate
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create adapters for every family whose API key is present
    pub fn from_api_keys(api_keys: &ApiKeys, settings: &LlmSettings) -> Self {
        let mut factory = Self::empty();

        if let Some(ref key) = api_keys.openai {
            let http = LlmHttpClient::new(settings.connect_timeout);
            let base_url = settings
                .openai_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

            factory = factory
                .with_provider(Arc::new(OpenAiChatClient::with_http_client(
                    key.clone(),
                    base_url.clone(),
                    http.clone(),
                )))
                .with_provider(Arc::new(OpenAiResponsesClient::with_http_client(
                    key.clone(),
                    base_url,
                    http,
                )));
        }

        let available: Vec<_> = factory.clients.keys().map(|p| p.to_string()).collect();
        info!(providers = ?available, "LLM providers available");

        factory
    }

    /// Register an adapter under the family it reports
    pub fn with_provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.clients.insert(provider.provider_kind(), provider);
        self
    }

    /// Shared adapter for `kind`
    pub fn provider(&self, kind: ProviderKind) -> Result<Arc<dyn LlmProvider>> {
        self.clients
            .get(&kind)
            .cloned()
            .ok_or(CopilotError::ProviderUnavailable(kind))
    }

    /// List all available provider families
    pub fn available_providers(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|k| self.clients.contains_key(k))
            .collect()
    }
}
