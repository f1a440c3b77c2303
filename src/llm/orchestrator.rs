// src/llm/orchestrator.rs
// Analysis orchestration: provider dispatch, JSON extraction, one-shot repair

use crate::analysis::StructuredAnalysis;
use crate::config::{LlmSettings, REPAIR_EXCERPT_CHARS};
use crate::error::{CopilotError, Result};
use crate::llm::extract::extract_json;
use crate::llm::factory::ProviderFactory;
use crate::llm::logging::{excerpt, log_raw_excerpt};
use crate::llm::provider::{ChatMessage, ProviderKind, Sampling};
use crate::llm::registry::ModelRegistry;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{Span, info, instrument, warn};

/// Result of parsing one raw response
#[derive(Debug)]
pub enum ParseOutcome {
    Parsed(StructuredAnalysis),
    Malformed(String),
}

/// Extract and validate the structured document from raw model text
pub fn parse_response(raw: &str) -> ParseOutcome {
    match StructuredAnalysis::parse(extract_json(raw)) {
        Ok(analysis) => ParseOutcome::Parsed(analysis),
        Err(e) => ParseOutcome::Malformed(e.to_string()),
    }
}

/// Corrective user turn sent after a malformed first response
pub fn repair_prompt(error: &str, previous_response: &str) -> String {
    format!(
        "Your previous response was not valid JSON. The error was: {}\n\n\
         Please fix the JSON and respond with ONLY valid JSON, no markdown code blocks or explanation.\n\
         Your previous response was:\n{}...\n\n\
         Respond with the corrected JSON only.",
        error,
        excerpt(previous_response, REPAIR_EXCERPT_CHARS)
    )
}

/// One analysis request
#[derive(Debug, Clone, Copy)]
pub struct AnalyzeInput<'a> {
    pub image: &'a [u8],
    pub system_instructions: &'a str,
    pub user_instructions: &'a str,
    /// Public model id; the configured default when `None`
    pub model_id: Option<&'a str>,
}

/// A successful analysis plus how it was obtained
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub analysis: StructuredAnalysis,
    pub model_id: String,
    pub provider: ProviderKind,
    /// True when the repair round-trip produced the result
    pub repaired: bool,
    /// Upstream calls issued (1 or 2)
    pub upstream_calls: u8,
}

/// Drives one analysis through at most two upstream calls.
///
/// Holds no mutable state; share it behind an `Arc` across requests.
pub struct Orchestrator {
    registry: Arc<ModelRegistry>,
    providers: ProviderFactory,
    settings: LlmSettings,
}

impl Orchestrator {
    pub fn new(registry: Arc<ModelRegistry>, providers: ProviderFactory, settings: LlmSettings) -> Self {
        Self {
            registry,
            providers,
            settings,
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &LlmSettings {
        &self.settings
    }

    /// Analyze one image.
    ///
    /// The first call runs at the analyze temperature. If its output does not
    /// parse, exactly one repair call is made at the repair temperature;
    /// if that fails too the result is `UnrecoverableMalformedOutput`.
    /// Both calls honour `cancel` and the configured per-call timeout.
    #[instrument(skip(self, input, cancel), fields(model, provider))]
    pub async fn analyze(
        &self,
        input: AnalyzeInput<'_>,
        cancel: &CancellationToken,
    ) -> Result<AnalysisOutcome> {
        let model_id = input.model_id.unwrap_or(self.settings.default_model.as_str());
        let (descriptor, backend_model) = self.registry.resolve(model_id)?;
        let provider = self.providers.provider(descriptor.provider_kind)?;

        Span::current().record("model", model_id);
        Span::current().record("provider", descriptor.provider_kind.as_str());

        let start_time = Instant::now();
        let first = self
            .bounded(
                cancel,
                provider.analyze_image(
                    input.image,
                    input.system_instructions,
                    input.user_instructions,
                    backend_model,
                    Sampling {
                        max_output_tokens: self.settings.max_output_tokens,
                        temperature: self.settings.analyze_temperature,
                    },
                ),
            )
            .await?;

        log_raw_excerpt("initial", model_id, &first);

        let error = match parse_response(&first) {
            ParseOutcome::Parsed(analysis) => {
                info!(
                    model = %model_id,
                    topic = %analysis.topic,
                    duration_ms = start_time.elapsed().as_millis() as u64,
                    "Analysis parsed on first attempt"
                );
                return Ok(AnalysisOutcome {
                    analysis,
                    model_id: model_id.to_string(),
                    provider: descriptor.provider_kind,
                    repaired: false,
                    upstream_calls: 1,
                });
            }
            ParseOutcome::Malformed(error) => error,
        };

        warn!(model = %model_id, error = %error, "Malformed analysis, issuing repair call");

        let history = [
            ChatMessage::user(input.user_instructions),
            ChatMessage::assistant(first.as_str()),
            ChatMessage::user(repair_prompt(&error, &first)),
        ];

        let second = self
            .bounded(
                cancel,
                provider.continue_chat(
                    input.system_instructions,
                    &history,
                    backend_model,
                    Sampling {
                        max_output_tokens: self.settings.max_output_tokens,
                        temperature: self.settings.repair_temperature,
                    },
                ),
            )
            .await?;

        log_raw_excerpt("repair", model_id, &second);

        match parse_response(&second) {
            ParseOutcome::Parsed(analysis) => {
                info!(
                    model = %model_id,
                    topic = %analysis.topic,
                    duration_ms = start_time.elapsed().as_millis() as u64,
                    "Analysis parsed after repair"
                );
                Ok(AnalysisOutcome {
                    analysis,
                    model_id: model_id.to_string(),
                    provider: descriptor.provider_kind,
                    repaired: true,
                    upstream_calls: 2,
                })
            }
            ParseOutcome::Malformed(last_error) => {
                warn!(model = %model_id, error = %last_error, "Repair response still malformed");
                Err(CopilotError::UnrecoverableMalformedOutput {
                    last_error,
                    excerpt: excerpt(&second, REPAIR_EXCERPT_CHARS).to_string(),
                })
            }
        }
    }

    /// Run an upstream call under the cancellation token and call timeout
    async fn bounded<T>(
        &self,
        cancel: &CancellationToken,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Analysis cancelled by caller");
                Err(CopilotError::Cancelled)
            }
            result = tokio::time::timeout(self.settings.request_timeout, call) => {
                result.map_err(|_| {
                    warn!(timeout = ?self.settings.request_timeout, "Upstream call timed out");
                    CopilotError::Cancelled
                })?
            }
        }
    }
}
