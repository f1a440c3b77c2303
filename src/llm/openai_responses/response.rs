// src/llm/openai_responses/response.rs
// Responses API output extraction

use crate::error::{CopilotError, Result};
use crate::llm::{NormalizedUsage, ProviderKind};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ResponsesResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub output: Vec<OutputItem>,
    pub usage: Option<ResponsesUsage>,
}

/// One item of the `output` array; only messages carry answer text
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    Message {
        #[serde(default)]
        content: Vec<OutputContent>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputContent {
    OutputText { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct ResponsesUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Text, status and usage pulled from a Responses body
#[derive(Debug)]
pub struct ResponsesText {
    pub content: Option<String>,
    pub status: Option<String>,
    pub usage: Option<NormalizedUsage>,
}

/// Concatenate every `output_text` part of every message item
pub fn parse_responses_output(response_body: &str) -> Result<ResponsesText> {
    let data: ResponsesResponse = serde_json::from_str(response_body).map_err(|e| {
        CopilotError::call_failed(
            ProviderKind::OpenAiResponses,
            format!("failed to parse responses body: {}", e),
        )
    })?;

    let text: String = data
        .output
        .iter()
        .filter_map(|item| match item {
            OutputItem::Message { content } => Some(content),
            OutputItem::Other => None,
        })
        .flatten()
        .filter_map(|part| match part {
            OutputContent::OutputText { text } => Some(text.as_str()),
            OutputContent::Other => None,
        })
        .collect();

    Ok(ResponsesText {
        content: Some(text).filter(|t| !t.trim().is_empty()),
        status: data.status,
        usage: data
            .usage
            .map(|u| NormalizedUsage::new(u.input_tokens, u.output_tokens)),
    })
}
