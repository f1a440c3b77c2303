// src/llm/openai_responses/mod.rs
// OpenAI Responses API adapter (gpt-5.x family)

mod request;
mod response;

pub use request::{InputContent, InputItem, InputPart, ResponsesRequest};
pub use response::{OutputContent, OutputItem, ResponsesText, parse_responses_output};

use crate::error::{CopilotError, Result};
use crate::llm::http_client::LlmHttpClient;
use crate::llm::image::to_data_url;
use crate::llm::logging::{log_completion, log_usage};
use crate::llm::openai_chat::DEFAULT_BASE_URL;
use crate::llm::{ChatMessage, LlmProvider, ProviderKind, Sampling};
use async_trait::async_trait;
use std::time::Instant;
use tracing::{Span, debug, info, instrument, warn};
use uuid::Uuid;

/// Responses API client
pub struct OpenAiResponsesClient {
    api_key: String,
    base_url: String,
    http: LlmHttpClient,
}

impl OpenAiResponsesClient {
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
        format!("{}/responses", self.base_url)
    }

    #[instrument(skip(self, request), fields(request_id, model = %request.model, input_count = request.input.len()))]
    async fn create(&self, request: ResponsesRequest) -> Result<String> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();

        Span::current().record("request_id", &request_id);

        info!(
            request_id = %request_id,
            model = %request.model,
            "Starting responses request"
        );

        let body = serde_json::to_string(&request)?;
        debug!(request_id = %request_id, body_len = body.len(), "Responses request built");

        let response_body = self
            .http
            .post_json(
                ProviderKind::OpenAiResponses,
                &request_id,
                &self.endpoint(),
                &self.api_key,
                body,
            )
            .await?;

        let duration_ms = start_time.elapsed().as_millis() as u64;
        let parsed = parse_responses_output(&response_body)?;

        if let Some(ref u) = parsed.usage {
            log_usage(&request_id, ProviderKind::OpenAiResponses, u);
        }
        if parsed.status.as_deref() == Some("incomplete") {
            warn!(request_id = %request_id, "Response incomplete, output budget likely exhausted");
        }

        let content = parsed.content.ok_or(CopilotError::EmptyResponse {
            provider: ProviderKind::OpenAiResponses,
        })?;

        log_completion(&request_id, ProviderKind::OpenAiResponses, duration_ms, content.len());
        Ok(content)
    }
}

#[async_trait]
impl LlmProvider for OpenAiResponsesClient {
    fn provider_kind(&self) -> ProviderKind {
        ProviderKind::OpenAiResponses
    }

    async fn analyze_image(
        &self,
        image: &[u8],
        system_instructions: &str,
        user_instructions: &str,
        model: &str,
        sampling: Sampling,
    ) -> Result<String> {
        let request = ResponsesRequest::with_image(
            model,
            system_instructions,
            user_instructions,
            to_data_url(image),
        )
        .with_max_output_tokens(sampling.max_output_tokens);

        self.create(request).await
    }

    async fn continue_chat(
        &self,
        system_instructions: &str,
        history: &[ChatMessage],
        model: &str,
        sampling: Sampling,
    ) -> Result<String> {
        let request = ResponsesRequest::with_history(model, system_instructions, history)
            .with_max_output_tokens(sampling.max_output_tokens);

        self.create(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let client = OpenAiResponsesClient::new("k".into());
        assert_eq!(client.endpoint(), "https://api.openai.com/v1/responses");
        assert_eq!(client.provider_kind(), ProviderKind::OpenAiResponses);
    }

    #[test]
    fn test_custom_base_url() {
        let client = OpenAiResponsesClient::with_http_client(
            "k".into(),
            "http://proxy.internal/v1/".into(),
            LlmHttpClient::default(),
        );
        assert_eq!(client.endpoint(), "http://proxy.internal/v1/responses");
    }
}
