// src/state/reducer.rs
// Feedback-driven TopicState transitions

use super::store::TopicStateStore;
use super::topic::{FeedbackEvent, FeedbackKind, LearnerId, TopicState, subject_of};
use crate::error::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Smoothing factor for mastery blends
pub const EMA_FACTOR: f64 = 0.2;
/// Target offset used by the too_simple / too_advanced blends
pub const MASTERY_STEP: f64 = 0.05;
pub const CONFIDENCE_STEP: f64 = 0.1;
/// Confidence below this after still_confused adds scaffolding
pub const LOW_CONFIDENCE: f64 = 0.3;

fn clamp(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

fn blend(current: f64, target: f64) -> f64 {
    clamp(current * (1.0 - EMA_FACTOR) + target * EMA_FACTOR)
}

/// Apply one feedback kind to a state.
///
/// Pure: every field of the result is computed from `state` and `kind`,
/// with `updated_at` set to `now`.
pub fn apply(state: &TopicState, kind: FeedbackKind, now: DateTime<Utc>) -> TopicState {
    let mut next = state.clone();
    let m = state.mastery;

    match kind {
        FeedbackKind::TooAdvanced => {
            next.mastery = blend(m, m - MASTERY_STEP);
            next.preferred_abstraction = state.preferred_abstraction.toward_concrete();
            next.preferred_hint_depth = state.preferred_hint_depth.more_support();
        }
        FeedbackKind::TooSimple => {
            next.mastery = blend(m, m + MASTERY_STEP);
            next.preferred_abstraction = state.preferred_abstraction.toward_abstract();
            next.preferred_hint_depth = state.preferred_hint_depth.less_support();
        }
        FeedbackKind::JustRight => {
            next.confidence = clamp(state.confidence + CONFIDENCE_STEP);
        }
        FeedbackKind::Understood => {
            next.mastery = blend(m, 1.0);
            next.confidence = clamp(state.confidence + CONFIDENCE_STEP);
        }
        FeedbackKind::StillConfused => {
            next.confidence = clamp(state.confidence - CONFIDENCE_STEP);
            if next.confidence < LOW_CONFIDENCE {
                next.preferred_hint_depth = state.preferred_hint_depth.more_support();
            }
        }
    }

    next.updated_at = now;
    next
}

/// Owns TopicState mutation against a store
#[derive(Clone)]
pub struct StateReducer {
    store: Arc<dyn TopicStateStore>,
}

impl StateReducer {
    pub fn new(store: Arc<dyn TopicStateStore>) -> Self {
        Self { store }
    }

    /// Existing state for the pair, or a new one with defaults
    pub async fn get_or_create(
        &self,
        learner: LearnerId,
        subject: &str,
        topic_key: &str,
    ) -> Result<TopicState> {
        self.store.get_or_create(learner, subject, topic_key).await
    }

    /// Current state without creating one
    pub async fn current(&self, learner: LearnerId, topic_key: &str) -> Result<Option<TopicState>> {
        self.store.get(learner, topic_key).await
    }

    /// Run one transition as an atomic read-modify-write.
    ///
    /// Feedback for a topic with no state yet creates it first, taking the
    /// subject from the topic key.
    #[instrument(skip(self, event), fields(learner = %event.learner, topic = %event.topic_key, kind = %event.kind))]
    pub async fn process_feedback(&self, event: &FeedbackEvent) -> Result<TopicState> {
        let kind = event.kind;
        let now = event.timestamp;

        let updated = self
            .store
            .update(
                event.learner,
                subject_of(&event.topic_key),
                &event.topic_key,
                Box::new(move |state: &TopicState| {
                    debug!(
                        mastery = state.mastery,
                        confidence = state.confidence,
                        "Topic state before feedback"
                    );
                    apply(state, kind, now)
                }),
            )
            .await?;

        info!(
            mastery = updated.mastery,
            confidence = updated.confidence,
            abstraction = updated.preferred_abstraction.as_str(),
            hint_depth = updated.preferred_hint_depth.as_str(),
            "Topic state updated"
        );

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ladder::{AbstractionLevel, HintDepth};
    use crate::state::store::InMemoryTopicStore;
    use strum::IntoEnumIterator;

    const EPS: f64 = 1e-9;

    fn fresh() -> TopicState {
        TopicState::new(LearnerId::new(), "math", "math.fractions.addition")
    }

    // ============================================================================
    // Transition table
    // ============================================================================

    #[test]
    fn test_too_advanced_from_defaults() {
        let next = apply(&fresh(), FeedbackKind::TooAdvanced, Utc::now());
        assert!((next.mastery - 0.49).abs() < EPS);
        assert_eq!(next.confidence, 0.5);
        assert_eq!(next.preferred_abstraction, AbstractionLevel::MoreConcrete);
        assert_eq!(next.preferred_hint_depth, HintDepth::StepByStep);
    }

    #[test]
    fn test_too_simple_from_defaults() {
        let next = apply(&fresh(), FeedbackKind::TooSimple, Utc::now());
        assert!((next.mastery - 0.51).abs() < EPS);
        assert_eq!(next.confidence, 0.5);
        assert_eq!(next.preferred_abstraction, AbstractionLevel::MoreAbstract);
        assert_eq!(next.preferred_hint_depth, HintDepth::LightHints);
    }

    #[test]
    fn test_just_right_only_touches_confidence() {
        let state = fresh();
        let next = apply(&state, FeedbackKind::JustRight, Utc::now());
        assert!((next.confidence - 0.6).abs() < EPS);
        assert_eq!(next.mastery, state.mastery);
        assert_eq!(next.preferred_abstraction, state.preferred_abstraction);
        assert_eq!(next.preferred_hint_depth, state.preferred_hint_depth);
    }

    #[test]
    fn test_understood_blends_toward_one() {
        let next = apply(&fresh(), FeedbackKind::Understood, Utc::now());
        assert!((next.mastery - 0.6).abs() < EPS);
        assert!((next.confidence - 0.6).abs() < EPS);
    }

    #[test]
    fn test_still_confused_escalates_on_third_event() {
        let mut state = fresh();
        let expected = [0.4, 0.3, 0.2];
        let depths = [HintDepth::Moderate, HintDepth::Moderate, HintDepth::StepByStep];

        for (want_conf, want_depth) in expected.iter().zip(depths) {
            state = apply(&state, FeedbackKind::StillConfused, Utc::now());
            assert!((state.confidence - want_conf).abs() < EPS);
            assert_eq!(state.preferred_hint_depth, want_depth);
        }
        assert_eq!(state.mastery, 0.5);
    }

    #[test]
    fn test_updated_at_is_stamped() {
        let now = Utc::now() + chrono::Duration::seconds(5);
        let next = apply(&fresh(), FeedbackKind::JustRight, now);
        assert_eq!(next.updated_at, now);
    }

    // ============================================================================
    // Bounds
    // ============================================================================

    #[test]
    fn test_values_stay_in_unit_interval() {
        let starts = [0.0, 0.01, 0.3, 0.5, 0.97, 1.0];
        for &m in &starts {
            for &c in &starts {
                for kind in FeedbackKind::iter() {
                    let mut state = TopicState {
                        mastery: m,
                        confidence: c,
                        ..fresh()
                    };
                    for _ in 0..50 {
                        state = apply(&state, kind, Utc::now());
                        assert!((0.0..=1.0).contains(&state.mastery), "{kind} mastery {}", state.mastery);
                        assert!((0.0..=1.0).contains(&state.confidence), "{kind} confidence {}", state.confidence);
                    }
                }
            }
        }
    }

    #[test]
    fn test_repeated_shifts_hold_at_boundary() {
        let mut state = fresh();
        for _ in 0..5 {
            state = apply(&state, FeedbackKind::TooAdvanced, Utc::now());
        }
        assert_eq!(state.preferred_abstraction, AbstractionLevel::MoreConcrete);
        assert_eq!(state.preferred_hint_depth, HintDepth::StepByStep);

        for _ in 0..5 {
            state = apply(&state, FeedbackKind::TooSimple, Utc::now());
        }
        assert_eq!(state.preferred_abstraction, AbstractionLevel::MoreAbstract);
        assert_eq!(state.preferred_hint_depth, HintDepth::LightHints);
    }

    // ============================================================================
    // StateReducer
    // ============================================================================

    #[tokio::test]
    async fn test_process_feedback_creates_unseen_topic() {
        let reducer = StateReducer::new(Arc::new(InMemoryTopicStore::new()));
        let learner = LearnerId::new();
        let event = FeedbackEvent::new(learner, "english.grammar.tense", FeedbackKind::JustRight);

        let state = reducer.process_feedback(&event).await.unwrap();
        assert_eq!(state.subject, "english");
        assert!((state.confidence - 0.6).abs() < EPS);

        let stored = reducer.current(learner, "english.grammar.tense").await.unwrap().unwrap();
        assert_eq!(stored, state);
    }

    #[tokio::test]
    async fn test_get_or_create_twice_same_values() {
        let reducer = StateReducer::new(Arc::new(InMemoryTopicStore::new()));
        let learner = LearnerId::new();
        let a = reducer.get_or_create(learner, "math", "math.x.y").await.unwrap();
        let b = reducer.get_or_create(learner, "math", "math.x.y").await.unwrap();
        assert_eq!(a, b);
    }
}
