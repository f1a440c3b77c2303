// src/llm/http_client.rs
// Shared HTTP client configuration for all provider adapters

use crate::error::{CopilotError, Result};
use crate::llm::ProviderKind;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::warn;

/// Default connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
/// How much of an error body is kept in the failure cause
const ERROR_BODY_EXCERPT: usize = 300;

/// Shared HTTP client for provider adapters.
///
/// Issues exactly one attempt per call. Transport retries would multiply the
/// upstream call count, and an analysis is allowed at most two calls.
///
/// Only the connect phase carries a timeout here. The whole-call deadline
/// belongs to the orchestrator, so an expired call always surfaces as
/// `Cancelled`.
#[derive(Debug, Clone)]
pub struct LlmHttpClient {
    client: Client,
    pub connect_timeout: Duration,
}

impl LlmHttpClient {
    pub fn new(connect_timeout: Duration) -> Self {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            connect_timeout,
        }
    }

    /// POST a JSON body with Bearer auth, returning the response body text
    pub async fn post_json(
        &self,
        provider: ProviderKind,
        request_id: &str,
        url: &str,
        api_key: &str,
        body: String,
    ) -> Result<String> {
        self.execute_request(provider, request_id, body, |client, body| {
            client
                .post(url)
                .header("Authorization", format!("Bearer {}", api_key))
                .header("Content-Type", "application/json")
                .body(body)
        })
        .await
    }

    /// Execute one request built by `build_request`.
    ///
    /// Non-success statuses and transport errors become
    /// `ProviderCallFailed` with the status class in the cause. Timeouts
    /// become `Cancelled`.
    pub async fn execute_request<F>(
        &self,
        provider: ProviderKind,
        request_id: &str,
        body: String,
        build_request: F,
    ) -> Result<String>
    where
        F: FnOnce(&Client, String) -> reqwest::RequestBuilder,
    {
        let response = build_request(&self.client, body)
            .send()
            .await
            .map_err(|e| transport_error(provider, request_id, &e))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(
                request_id = %request_id,
                provider = %provider,
                status = %status,
                "Provider returned error status"
            );
            return Err(CopilotError::call_failed(
                provider,
                status_cause(status, &error_body),
            ));
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                transport_error(provider, request_id, &e)
            } else {
                CopilotError::call_failed(provider, format!("failed to read body: {}", e))
            }
        })
    }
}

impl Default for LlmHttpClient {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT)
    }
}

fn transport_error(provider: ProviderKind, request_id: &str, e: &reqwest::Error) -> CopilotError {
    if e.is_timeout() {
        warn!(request_id = %request_id, provider = %provider, error = %e, "Provider request timed out");
        return CopilotError::Cancelled;
    }
    warn!(request_id = %request_id, provider = %provider, error = %e, "Provider request failed");
    let cause = if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        format!("request failed: {}", e)
    };
    CopilotError::call_failed(provider, cause)
}

/// Describe a non-success status for diagnostics
pub(crate) fn status_cause(status: StatusCode, body: &str) -> String {
    let class = match status.as_u16() {
        401 | 403 => "authentication rejected",
        429 => "rate limited or quota exceeded",
        s if (500..600).contains(&s) => "server error",
        _ => "request rejected",
    };
    let excerpt: String = body.chars().take(ERROR_BODY_EXCERPT).collect();
    format!("{} (HTTP {}): {}", class, status.as_u16(), excerpt)
}
