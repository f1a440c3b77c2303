// src/state/store.rs
// TopicState persistence seam and in-memory implementation

use super::topic::{LearnerId, TopicState};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Transition applied inside an atomic read-modify-write
pub type Transition<'a> = Box<dyn FnOnce(&TopicState) -> TopicState + Send + 'a>;

/// Storage collaborator owning TopicState rows.
///
/// `update` must be atomic per (learner, topic_key): a concurrent reader
/// either sees the old row or the fully transitioned one.
#[async_trait]
pub trait TopicStateStore: Send + Sync {
    async fn get(&self, learner: LearnerId, topic_key: &str) -> Result<Option<TopicState>>;

    /// Existing row unchanged, or a new row with default values
    async fn get_or_create(
        &self,
        learner: LearnerId,
        subject: &str,
        topic_key: &str,
    ) -> Result<TopicState>;

    /// Read (creating with defaults if absent), apply, persist; returns the new row
    async fn update(
        &self,
        learner: LearnerId,
        subject: &str,
        topic_key: &str,
        transition: Transition<'_>,
    ) -> Result<TopicState>;
}

/// Process-local store; rows live as long as the value
#[derive(Default)]
pub struct InMemoryTopicStore {
    rows: Mutex<HashMap<(LearnerId, String), TopicState>>,
}

impl InMemoryTopicStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

#[async_trait]
impl TopicStateStore for InMemoryTopicStore {
    async fn get(&self, learner: LearnerId, topic_key: &str) -> Result<Option<TopicState>> {
        let rows = self.rows.lock().await;
        Ok(rows.get(&(learner, topic_key.to_string())).cloned())
    }

    async fn get_or_create(
        &self,
        learner: LearnerId,
        subject: &str,
        topic_key: &str,
    ) -> Result<TopicState> {
        let mut rows = self.rows.lock().await;
        let row = rows
            .entry((learner, topic_key.to_string()))
            .or_insert_with(|| TopicState::new(learner, subject, topic_key));
        Ok(row.clone())
    }

    async fn update(
        &self,
        learner: LearnerId,
        subject: &str,
        topic_key: &str,
        transition: Transition<'_>,
    ) -> Result<TopicState> {
        let mut rows = self.rows.lock().await;
        let row = rows
            .entry((learner, topic_key.to_string()))
            .or_insert_with(|| TopicState::new(learner, subject, topic_key));
        let next = transition(row);
        *row = next.clone();
        Ok(next)
    }
}
