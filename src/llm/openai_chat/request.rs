// src/llm/openai_chat/request.rs
// Chat Completions request builder

use crate::llm::{ChatMessage, Role};
use serde::Serialize;

/// Message content: plain text or a list of typed parts
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl RequestMessage {
    fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: MessageContent::Text(content.into()),
        }
    }
}

/// Chat completion request body
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<RequestMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// Create a new chat request with required fields
    pub fn new(model: impl Into<String>, messages: Vec<RequestMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_completion_tokens: None,
            temperature: None,
        }
    }

    /// System turn plus a user turn carrying text and one inline image
    pub fn with_image(model: &str, system: &str, user: &str, image_data_url: String) -> Self {
        let user_turn = RequestMessage {
            role: Role::User,
            content: MessageContent::Parts(vec![
                ContentPart::Text {
                    text: user.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_data_url,
                    },
                },
            ]),
        };
        Self::new(model, vec![RequestMessage::text(Role::System, system), user_turn])
    }

    /// System turn followed by a plain-text history
    pub fn with_history(model: &str, system: &str, history: &[ChatMessage]) -> Self {
        let messages = std::iter::once(RequestMessage::text(Role::System, system))
            .chain(
                history
                    .iter()
                    .map(|m| RequestMessage::text(m.role, m.content.clone())),
            )
            .collect();
        Self::new(model, messages)
    }

    /// Set maximum output tokens
    pub fn with_max_completion_tokens(mut self, max_tokens: u32) -> Self {
        self.max_completion_tokens = Some(max_tokens);
        self
    }

    /// Set temperature (0.0 to 2.0)
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_builder() {
        let req = ChatRequest::new("model", vec![])
            .with_max_completion_tokens(1000)
            .with_temperature(0.5);
        assert_eq!(req.max_completion_tokens, Some(1000));
        assert_eq!(req.temperature, Some(0.5));
    }

    #[test]
    fn test_image_request_shape() {
        let req = ChatRequest::with_image(
            "gpt-4o",
            "be a tutor",
            "analyze this",
            "data:image/jpeg;base64,AAAA".into(),
        )
        .with_max_completion_tokens(8000)
        .with_temperature(0.3);

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["max_completion_tokens"], 8000);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "be a tutor");

        let parts = &json["messages"][1]["content"];
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[0]["text"], "analyze this");
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(parts[1]["image_url"]["url"], "data:image/jpeg;base64,AAAA");
    }

    #[test]
    fn test_history_request_prepends_system() {
        let history = vec![
            ChatMessage::user("question"),
            ChatMessage::assistant("bad json"),
            ChatMessage::user("fix it"),
        ];
        let req = ChatRequest::with_history("gpt-4o", "sys", &history);
        let json = serde_json::to_value(&req).unwrap();
        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[2]["role"], "assistant");
        assert_eq!(messages[2]["content"], "bad json");
        assert!(json.get("temperature").is_none());
    }
}
