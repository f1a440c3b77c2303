// src/llm/openai_chat/mod.rs
// OpenAI Chat Completions adapter (gpt-4o family)

mod request;
mod response;

pub use request::{ChatRequest, ContentPart, ImageUrl, MessageContent, RequestMessage};
pub use response::{ChatResponse, ChatText, parse_chat_response};

use crate::error::{CopilotError, Result};
use crate::llm::http_client::LlmHttpClient;
use crate::llm::image::to_data_url;
use crate::llm::logging::{log_completion, log_usage};
use crate::llm::{ChatMessage, LlmProvider, ProviderKind, Sampling};
use async_trait::async_trait;
use std::time::Instant;
use tracing::{Span, debug, info, instrument};
use uuid::Uuid;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat Completions client
pub struct OpenAiChatClient {
    api_key: String,
    base_url: String,
    http: LlmHttpClient,
}

impl OpenAiChatClient {
    pub fn new(api_key: String) -> Self {
        Self::with_http_client(api_key, DEFAULT_BASE_URL.to_string(), LlmHttpClient::default())
    }

    pub fn with_http_client(api_key: String, base_url: String, http: LlmHttpClient) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    #[instrument(skip(self, request), fields(request_id, model = %request.model, message_count = request.messages.len()))]
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();

        Span::current().record("request_id", &request_id);

        info!(
            request_id = %request_id,
            model = %request.model,
            "Starting chat completions request"
        );

        let body = serde_json::to_string(&request)?;
        debug!(request_id = %request_id, body_len = body.len(), "Chat completions request built");

        let response_body = self
            .http
            .post_json(
                ProviderKind::OpenAiChat,
                &request_id,
                &self.endpoint(),
                &self.api_key,
                body,
            )
            .await?;

        let duration_ms = start_time.elapsed().as_millis() as u64;
        let parsed = parse_chat_response(&response_body)?;

        if let Some(ref u) = parsed.usage {
            log_usage(&request_id, ProviderKind::OpenAiChat, u);
        }

        let content = parsed.content.ok_or(CopilotError::EmptyResponse {
            provider: ProviderKind::OpenAiChat,
        })?;

        log_completion(&request_id, ProviderKind::OpenAiChat, duration_ms, content.len());
        Ok(content)
    }
}

#[async_trait]
impl LlmProvider for OpenAiChatClient {
    fn provider_kind(&self) -> ProviderKind {
        ProviderKind::OpenAiChat
    }

    async fn analyze_image(
        &self,
        image: &[u8],
        system_instructions: &str,
        user_instructions: &str,
        model: &str,
        sampling: Sampling,
    ) -> Result<String> {
        let request = ChatRequest::with_image(
            model,
            system_instructions,
            user_instructions,
            to_data_url(image),
        )
        .with_max_completion_tokens(sampling.max_output_tokens)
        .with_temperature(sampling.temperature);

        self.complete(request).await
    }

    async fn continue_chat(
        &self,
        system_instructions: &str,
        history: &[ChatMessage],
        model: &str,
        sampling: Sampling,
    ) -> Result<String> {
        let request = ChatRequest::with_history(model, system_instructions, history)
            .with_max_completion_tokens(sampling.max_output_tokens)
            .with_temperature(sampling.temperature);

        self.complete(request).await
    }
}
