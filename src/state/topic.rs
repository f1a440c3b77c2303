// src/state/topic.rs
// Per learner-topic adaptive state and feedback events

use super::ladder::{AbstractionLevel, HintDepth};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const DEFAULT_MASTERY: f64 = 0.5;
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Identity of one learner (a child profile)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LearnerId(pub Uuid);

impl LearnerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LearnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LearnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Subject segment of a dotted topic key ("math.geometry.area" -> "math")
pub fn subject_of(topic_key: &str) -> &str {
    topic_key.split('.').next().unwrap_or(topic_key)
}

/// Adaptive state for one (learner, topic) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicState {
    pub learner: LearnerId,
    pub subject: String,
    pub topic_key: String,
    /// Smoothed competence estimate in [0, 1]
    pub mastery: f64,
    /// Recent success estimate in [0, 1]
    pub confidence: f64,
    pub preferred_abstraction: AbstractionLevel,
    pub preferred_hint_depth: HintDepth,
    pub updated_at: DateTime<Utc>,
}

impl TopicState {
    /// Fresh state with the neutral defaults
    pub fn new(learner: LearnerId, subject: impl Into<String>, topic_key: impl Into<String>) -> Self {
        Self {
            learner,
            subject: subject.into(),
            topic_key: topic_key.into(),
            mastery: DEFAULT_MASTERY,
            confidence: DEFAULT_CONFIDENCE,
            preferred_abstraction: AbstractionLevel::default(),
            preferred_hint_depth: HintDepth::default(),
            updated_at: Utc::now(),
        }
    }
}

/// Learner reaction to an explanation
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::IntoStaticStr,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FeedbackKind {
    TooSimple,
    JustRight,
    TooAdvanced,
    Understood,
    StillConfused,
}

impl FeedbackKind {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One feedback signal; triggers exactly one state transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub learner: LearnerId,
    pub topic_key: String,
    pub kind: FeedbackKind,
    pub timestamp: DateTime<Utc>,
}

impl FeedbackEvent {
    pub fn new(learner: LearnerId, topic_key: impl Into<String>, kind: FeedbackKind) -> Self {
        Self {
            learner,
            topic_key: topic_key.into(),
            kind,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_topic_defaults() {
        let state = TopicState::new(LearnerId::new(), "math", "math.fractions.addition");
        assert_eq!(state.mastery, 0.5);
        assert_eq!(state.confidence, 0.5);
        assert_eq!(state.preferred_abstraction, AbstractionLevel::Balanced);
        assert_eq!(state.preferred_hint_depth, HintDepth::Moderate);
    }

    #[test]
    fn test_subject_of() {
        assert_eq!(subject_of("math.geometry.area_perimeter"), "math");
        assert_eq!(subject_of("english"), "english");
    }

    #[test]
    fn test_feedback_kind_parse_any_case() {
        assert_eq!(FeedbackKind::from_str("TOO_SIMPLE").unwrap(), FeedbackKind::TooSimple);
        assert_eq!(FeedbackKind::from_str("still_confused").unwrap(), FeedbackKind::StillConfused);
        assert!(FeedbackKind::from_str("meh").is_err());
    }

    #[test]
    fn test_topic_state_serializes_snake_case() {
        let state = TopicState::new(LearnerId::new(), "math", "math.x.y");
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["preferred_abstraction"], "balanced");
        assert_eq!(json["preferred_hint_depth"], "moderate");
        assert!(json["learner"].is_string());
    }
}
