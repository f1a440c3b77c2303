// src/curriculum.rs
// Curriculum retrieval seam: optional pre-joined context text

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Supplies syllabus text relevant to a question.
///
/// The core treats the returned block as opaque and embeds it verbatim.
#[async_trait]
pub trait CurriculumSource: Send + Sync {
    async fn context_for(
        &self,
        curriculum_code: &str,
        grade: &str,
        topic_hint: Option<&str>,
    ) -> Result<Option<String>>;
}

/// No retrieval configured
pub struct NoCurriculum;

#[async_trait]
impl CurriculumSource for NoCurriculum {
    async fn context_for(&self, _: &str, _: &str, _: Option<&str>) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Fixed text per (curriculum, grade), for the CLI and tests
#[derive(Debug, Clone, Default)]
pub struct StaticCurriculum {
    entries: HashMap<(String, String), String>,
}

impl StaticCurriculum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(
        mut self,
        curriculum_code: impl Into<String>,
        grade: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.entries
            .insert((curriculum_code.into(), grade.into()), text.into());
        self
    }
}

#[async_trait]
impl CurriculumSource for StaticCurriculum {
    async fn context_for(
        &self,
        curriculum_code: &str,
        grade: &str,
        _topic_hint: Option<&str>,
    ) -> Result<Option<String>> {
        Ok(self
            .entries
            .get(&(curriculum_code.to_string(), grade.to_string()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_curriculum() {
        assert!(NoCurriculum.context_for("NSW", "year_3", None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_static_lookup() {
        let source = StaticCurriculum::new().with_entry("NSW", "year_3", "MA1-RWN-01");
        assert_eq!(
            source.context_for("NSW", "year_3", Some("math")).await.unwrap().as_deref(),
            Some("MA1-RWN-01")
        );
        assert!(source.context_for("NSW", "year_4", None).await.unwrap().is_none());
    }
}
