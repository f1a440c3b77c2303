// src/llm/provider.rs
// Provider adapter abstraction layer

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend wire-protocol families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// OpenAI Chat Completions (`/v1/chat/completions`)
    #[serde(rename = "openai_chat")]
    OpenAiChat,
    /// OpenAI Responses (`/v1/responses`)
    #[serde(rename = "openai_responses")]
    OpenAiResponses,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [Self::OpenAiChat, Self::OpenAiResponses];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAiChat => "openai_chat",
            Self::OpenAiResponses => "openai_responses",
        }
    }

    /// Parse provider family from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai_chat" => Some(Self::OpenAiChat),
            "openai_responses" => Some(Self::OpenAiResponses),
            _ => None,
        }
    }

    /// Environment variable holding this family's API key
    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            Self::OpenAiChat | Self::OpenAiResponses => "OPENAI_API_KEY",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversation role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Plain-text turn in a conversation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Output budget and sampling for one upstream call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

/// Normalized usage statistics across provider families
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizedUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl NormalizedUsage {
    pub fn new(prompt: u32, completion: u32) -> Self {
        Self {
            prompt_tokens: prompt,
            completion_tokens: completion,
            total_tokens: prompt + completion,
        }
    }
}

/// Adapter for one backend family.
///
/// Adapters translate a generic request into the backend's call shape and
/// hand back plain text. They never parse or validate the model's JSON; that
/// belongs to the orchestrator, so a new family only has to implement these
/// two calls.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// The family this adapter speaks
    fn provider_kind(&self) -> ProviderKind;

    /// Send an image plus system/user instructions, returning the raw text
    async fn analyze_image(
        &self,
        image: &[u8],
        system_instructions: &str,
        user_instructions: &str,
        model: &str,
        sampling: Sampling,
    ) -> Result<String>;

    /// Text-only continuation of an existing conversation
    async fn continue_chat(
        &self,
        system_instructions: &str,
        history: &[ChatMessage],
        model: &str,
        sampling: Sampling,
    ) -> Result<String>;
}
