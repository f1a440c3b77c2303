// src/error.rs
// Error taxonomy for the copilot core

use crate::llm::ProviderKind;
use thiserror::Error;

/// Main error type for the copilot library
#[derive(Error, Debug)]
pub enum CopilotError {
    #[error("unknown model: {model_id} (available: {})", available.join(", "))]
    UnknownModel {
        model_id: String,
        available: Vec<String>,
    },

    #[error("no adapter configured for provider {0}")]
    ProviderUnavailable(ProviderKind),

    #[error("{provider} call failed: {cause}")]
    ProviderCallFailed { provider: ProviderKind, cause: String },

    #[error("empty response from {provider}")]
    EmptyResponse { provider: ProviderKind },

    #[error("model output could not be parsed after repair: {last_error}")]
    UnrecoverableMalformedOutput { last_error: String, excerpt: String },

    #[error("analysis cancelled")]
    Cancelled,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("topic state store error: {0}")]
    Store(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Result using CopilotError
pub type Result<T> = std::result::Result<T, CopilotError>;

/// How a failure should be surfaced by the transport layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller sent something we cannot serve (bad model id, bad input)
    ClientInput,
    /// Upstream or internal failure
    Service,
    /// Caller-initiated cancellation or timeout
    Cancelled,
}

impl CopilotError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownModel { .. } | Self::InvalidInput(_) => ErrorKind::ClientInput,
            Self::Cancelled => ErrorKind::Cancelled,
            _ => ErrorKind::Service,
        }
    }

    pub(crate) fn call_failed(provider: ProviderKind, cause: impl Into<String>) -> Self {
        Self::ProviderCallFailed {
            provider,
            cause: cause.into(),
        }
    }
}

impl From<tokio::task::JoinError> for CopilotError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            CopilotError::Cancelled
        } else {
            CopilotError::Store(err.to_string())
        }
    }
}
