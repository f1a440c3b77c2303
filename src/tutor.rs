// src/tutor.rs
// Analyze and feedback flows composed from the orchestrator, policy and state

use crate::analysis::StructuredAnalysis;
use crate::curriculum::CurriculumSource;
use crate::error::{CopilotError, Result};
use crate::llm::{AnalyzeInput, ModelInfo, Orchestrator};
use crate::policy::{GlobalPreferences, compile_analysis_prompt, compile_policy};
use crate::state::{FeedbackEvent, FeedbackKind, LearnerId, StateReducer, TopicState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Upload ceiling for one homework image
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// One homework image to analyze
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub learner: LearnerId,
    pub image: Vec<u8>,
    pub preferences: GlobalPreferences,
    /// Explicit model for this request
    pub model_override: Option<String>,
    /// The account's saved model preference
    pub preferred_model: Option<String>,
    /// Known topic key, when the caller has one; selects the stored state
    pub topic_hint: Option<String>,
}

impl AnalyzeRequest {
    pub fn new(learner: LearnerId, image: Vec<u8>, preferences: GlobalPreferences) -> Self {
        Self {
            learner,
            image,
            preferences,
            model_override: None,
            preferred_model: None,
            topic_hint: None,
        }
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_override = Some(model_id.into());
        self
    }

    pub fn with_preferred_model(mut self, model_id: impl Into<String>) -> Self {
        self.preferred_model = Some(model_id.into());
        self
    }

    pub fn with_topic_hint(mut self, topic_key: impl Into<String>) -> Self {
        self.topic_hint = Some(topic_key.into());
        self
    }

    /// Override, then saved preference; `None` means the configured default
    pub fn resolved_model(&self) -> Option<&str> {
        self.model_override
            .as_deref()
            .or(self.preferred_model.as_deref())
    }
}

/// An analyzed question, ready for the persistence collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: Uuid,
    pub learner: LearnerId,
    pub topic_key: String,
    pub subject: String,
    pub model_id: String,
    pub repaired: bool,
    pub analysis: StructuredAnalysis,
    pub created_at: DateTime<Utc>,
}

pub struct Tutor {
    orchestrator: Arc<Orchestrator>,
    reducer: StateReducer,
    curriculum: Arc<dyn CurriculumSource>,
}

impl Tutor {
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        reducer: StateReducer,
        curriculum: Arc<dyn CurriculumSource>,
    ) -> Self {
        Self {
            orchestrator,
            reducer,
            curriculum,
        }
    }

    /// Registry listing in registration order
    pub fn models(&self) -> Vec<ModelInfo> {
        self.orchestrator.registry().model_infos()
    }

    /// Analyze one image and make sure its topic has state.
    ///
    /// On any failure nothing is written to the topic store.
    #[instrument(skip(self, request, cancel), fields(learner = %request.learner))]
    pub async fn analyze(
        &self,
        request: AnalyzeRequest,
        cancel: &CancellationToken,
    ) -> Result<QuestionRecord> {
        if request.image.is_empty() {
            return Err(CopilotError::InvalidInput("image is empty".into()));
        }
        if request.image.len() > MAX_IMAGE_BYTES {
            return Err(CopilotError::InvalidInput(format!(
                "image too large: {} bytes (maximum {} MB)",
                request.image.len(),
                MAX_IMAGE_BYTES / (1024 * 1024)
            )));
        }

        let prefs = &request.preferences;

        let topic_state = match request.topic_hint.as_deref() {
            Some(topic_key) => self.reducer.current(request.learner, topic_key).await?,
            None => None,
        };

        let curriculum_context = match self
            .curriculum
            .context_for(
                &prefs.curriculum_code,
                &prefs.grade_alignment,
                request.topic_hint.as_deref(),
            )
            .await
        {
            Ok(context) => context,
            Err(e) => {
                warn!(error = %e, "Curriculum lookup failed, continuing without it");
                None
            }
        };

        let system_prompt = compile_policy(prefs, topic_state.as_ref(), curriculum_context.as_deref());

        let outcome = self
            .orchestrator
            .analyze(
                AnalyzeInput {
                    image: &request.image,
                    system_instructions: &system_prompt,
                    user_instructions: compile_analysis_prompt(),
                    model_id: request.resolved_model(),
                },
                cancel,
            )
            .await?;

        let analysis = outcome.analysis;
        self.reducer
            .get_or_create(request.learner, &analysis.subject, &analysis.topic)
            .await?;

        info!(
            topic = %analysis.topic,
            model = %outcome.model_id,
            repaired = outcome.repaired,
            upstream_calls = outcome.upstream_calls,
            "Question analyzed"
        );

        Ok(QuestionRecord {
            id: Uuid::new_v4(),
            learner: request.learner,
            topic_key: analysis.topic.clone(),
            subject: analysis.subject.clone(),
            model_id: outcome.model_id,
            repaired: outcome.repaired,
            analysis,
            created_at: Utc::now(),
        })
    }

    /// Apply feedback on an analyzed question; returns the new topic state
    pub async fn submit_feedback(
        &self,
        question: &QuestionRecord,
        kind: FeedbackKind,
    ) -> Result<TopicState> {
        let event = FeedbackEvent::new(question.learner, question.topic_key.as_str(), kind);
        self.reducer.process_feedback(&event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_precedence() {
        let base = AnalyzeRequest::new(LearnerId::new(), vec![1], GlobalPreferences::default());
        assert_eq!(base.resolved_model(), None);

        let preferred = base.clone().with_preferred_model("gpt-5-mini");
        assert_eq!(preferred.resolved_model(), Some("gpt-5-mini"));

        let both = preferred.with_model("gpt-4o-mini");
        assert_eq!(both.resolved_model(), Some("gpt-4o-mini"));
    }
}
