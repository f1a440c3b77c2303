// src/state/mod.rs
// Adaptive per-topic learner state

pub mod ladder;
pub mod reducer;
pub mod store;
pub mod topic;

pub use ladder::{AbstractionLevel, HintDepth, Ladder};
pub use reducer::{StateReducer, apply};
pub use store::{InMemoryTopicStore, TopicStateStore, Transition};
pub use topic::{FeedbackEvent, FeedbackKind, LearnerId, TopicState, subject_of};
