// src/llm/openai_responses/request.rs
// Responses API request builder

use crate::llm::{ChatMessage, Role};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum InputContent {
    Text(String),
    Parts(Vec<InputPart>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputPart {
    InputText { text: String },
    InputImage { image_url: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct InputItem {
    pub role: Role,
    pub content: InputContent,
}

impl InputItem {
    fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: InputContent::Text(content.into()),
        }
    }
}

/// Responses API request body.
///
/// Sampling temperature is not sent: reasoning models behind this API
/// reject it, so only the output budget is forwarded.
#[derive(Debug, Serialize)]
pub struct ResponsesRequest {
    pub model: String,
    pub input: Vec<InputItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl ResponsesRequest {
    pub fn new(model: impl Into<String>, input: Vec<InputItem>) -> Self {
        Self {
            model: model.into(),
            input,
            max_output_tokens: None,
        }
    }

    /// System item plus a user item carrying text and one inline image
    pub fn with_image(model: &str, system: &str, user: &str, image_data_url: String) -> Self {
        let user_item = InputItem {
            role: Role::User,
            content: InputContent::Parts(vec![
                InputPart::InputText {
                    text: user.to_string(),
                },
                InputPart::InputImage {
                    image_url: image_data_url,
                },
            ]),
        };
        Self::new(model, vec![InputItem::text(Role::System, system), user_item])
    }

    /// System item followed by a plain-text history
    pub fn with_history(model: &str, system: &str, history: &[ChatMessage]) -> Self {
        let mut input = Vec::with_capacity(history.len() + 1);
        input.push(InputItem::text(Role::System, system));
        input.extend(
            history
                .iter()
                .map(|m| InputItem::text(m.role, m.content.clone())),
        );
        Self::new(model, input)
    }

    pub fn with_max_output_tokens(mut self, max_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_tokens);
        self
    }
}
