// src/llm/logging.rs
// Shared LLM logging helpers for adapters and the orchestrator

use super::provider::{NormalizedUsage, ProviderKind};
use tracing::{debug, info};

/// Characters of raw model text echoed at debug level
const RAW_EXCERPT_CHARS: usize = 200;

/// Log usage statistics for an upstream call.
pub fn log_usage(request_id: &str, provider: ProviderKind, usage: &NormalizedUsage) {
    info!(
        request_id = %request_id,
        prompt_tokens = usage.prompt_tokens,
        completion_tokens = usage.completion_tokens,
        total_tokens = usage.total_tokens,
        "{} usage stats", provider
    );
}

/// Log completion summary for an upstream call.
pub fn log_completion(request_id: &str, provider: ProviderKind, duration_ms: u64, content_len: usize) {
    info!(
        request_id = %request_id,
        duration_ms = duration_ms,
        content_len = content_len,
        "{} call complete", provider
    );
}

/// Log the head of a raw model response.
pub fn log_raw_excerpt(stage: &str, model_id: &str, raw: &str) {
    debug!(
        stage = stage,
        model = %model_id,
        excerpt = %excerpt(raw, RAW_EXCERPT_CHARS),
        "Raw model output"
    );
}

/// First `max_chars` characters of `text`, on a char boundary
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_short_text_unchanged() {
        assert_eq!(excerpt("abc", 10), "abc");
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let text = "数学".repeat(10);
        let cut = excerpt(&text, 3);
        assert_eq!(cut.chars().count(), 3);
        assert_eq!(cut, "数学数");
    }

    #[test]
    fn test_excerpt_exact_length() {
        assert_eq!(excerpt("abcde", 5), "abcde");
    }
}
