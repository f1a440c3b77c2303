// src/llm/mod.rs
// LLM orchestration: model registry, provider adapters, repair loop

pub mod extract;
mod factory;
pub mod http_client;
pub mod image;
pub mod logging;
pub mod openai_chat;
pub mod openai_responses;
mod orchestrator;
mod provider;
mod registry;

pub use extract::extract_json;
pub use factory::ProviderFactory;
pub use openai_chat::OpenAiChatClient;
pub use openai_responses::OpenAiResponsesClient;
pub use orchestrator::{
    AnalysisOutcome, AnalyzeInput, Orchestrator, ParseOutcome, parse_response, repair_prompt,
};
pub use provider::{ChatMessage, LlmProvider, NormalizedUsage, ProviderKind, Role, Sampling};
pub use registry::{DEFAULT_MODEL_ID, ModelDescriptor, ModelInfo, ModelRegistry, Tier};
