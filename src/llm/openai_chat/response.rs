// src/llm/openai_chat/response.rs
// Chat Completions response parsing

use crate::error::{CopilotError, Result};
use crate::llm::{NormalizedUsage, ProviderKind};
use serde::Deserialize;

/// Non-streaming chat response
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ResponseChoice>,
    pub usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseChoice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Text and usage pulled from a chat response
#[derive(Debug)]
pub struct ChatText {
    pub content: Option<String>,
    pub usage: Option<NormalizedUsage>,
}

/// Parse a chat completion body, taking the first choice's content
pub fn parse_chat_response(response_body: &str) -> Result<ChatText> {
    let data: ChatResponse = serde_json::from_str(response_body).map_err(|e| {
        CopilotError::call_failed(
            ProviderKind::OpenAiChat,
            format!("failed to parse chat response: {}", e),
        )
    })?;

    let content = data
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty());

    Ok(ChatText {
        content,
        usage: data
            .usage
            .map(|u| NormalizedUsage::new(u.prompt_tokens, u.completion_tokens)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_response() {
        let json = r#"{
            "choices": [{
                "message": {
                    "content": "Hello, world!"
                }
            }],
            "usage": {
                "prompt_tokens": 10,
                "completion_tokens": 5,
                "total_tokens": 15
            }
        }"#;

        let result = parse_chat_response(json).unwrap();
        assert_eq!(result.content, Some("Hello, world!".to_string()));
        assert_eq!(result.usage, Some(NormalizedUsage::new(10, 5)));
    }

    #[test]
    fn test_parse_null_content() {
        let json = r#"{"choices": [{"message": {"content": null}}], "usage": null}"#;
        let result = parse_chat_response(json).unwrap();
        assert!(result.content.is_none());
    }

    #[test]
    fn test_parse_blank_content_is_none() {
        let json = r#"{"choices": [{"message": {"content": "  \n"}}]}"#;
        let result = parse_chat_response(json).unwrap();
        assert!(result.content.is_none());
    }

    #[test]
    fn test_parse_empty_choices() {
        let json = r#"{"choices": [], "usage": null}"#;
        let result = parse_chat_response(json).unwrap();
        assert!(result.content.is_none());
        assert!(result.usage.is_none());
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_chat_response("not json");
        assert!(matches!(
            result,
            Err(CopilotError::ProviderCallFailed {
                provider: ProviderKind::OpenAiChat,
                ..
            })
        ));
    }
}
