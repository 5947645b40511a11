use std::sync::Arc;

use quiz_core::model::{SectionDef, SectionQuestions};

use crate::error::QuestionLoadError;
use crate::quiz::source::QuestionSource;

/// Result of loading one section's questions.
///
/// A failed load is its own state so callers never wait on an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionLoad {
    Ready(SectionQuestions),
    Failed(String),
}

impl QuestionLoad {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, QuestionLoad::Ready(_))
    }

    #[must_use]
    pub fn questions(&self) -> Option<&SectionQuestions> {
        match self {
            QuestionLoad::Ready(questions) => Some(questions),
            QuestionLoad::Failed(_) => None,
        }
    }
}

/// Fetches and validates questions for a section visit. Fetches are not retried.
#[derive(Clone)]
pub struct QuestionLoader {
    source: Arc<dyn QuestionSource>,
}

impl QuestionLoader {
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSource>) -> Self {
        Self { source }
    }

    pub async fn load(&self, section: &SectionDef) -> QuestionLoad {
        match self.try_load(section).await {
            Ok(questions) if questions.is_empty() => {
                tracing::warn!(section = %section.id(), "question source returned no questions");
                QuestionLoad::Failed(format!("no questions for section {}", section.id()))
            }
            Ok(questions) => {
                tracing::debug!(section = %section.id(), count = questions.len(), "questions loaded");
                QuestionLoad::Ready(questions)
            }
            Err(err) => {
                tracing::warn!(section = %section.id(), error = %err, "question load failed");
                QuestionLoad::Failed(err.to_string())
            }
        }
    }

    async fn try_load(&self, section: &SectionDef) -> Result<SectionQuestions, QuestionLoadError> {
        let raw = self.source.fetch(section).await?;
        if raw.kind() != section.kind() {
            return Err(QuestionLoadError::KindMismatch {
                expected: section.kind(),
                found: raw.kind(),
            });
        }
        Ok(raw.ingest()?)
    }
}
