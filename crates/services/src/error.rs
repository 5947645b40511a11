//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{IngestError, PrizeError, ProgressError, SectionKind};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ProgressStore` and `RewardTracker`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `PrizeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PrizeServiceError {
    #[error(transparent)]
    Prize(#[from] PrizeError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while fetching or validating section questions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionLoadError {
    #[error("question request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("no questions available for category {0:?}")]
    UnknownCategory(String),
    #[error("expected {expected:?} questions, got {found:?}")]
    KindMismatch {
        expected: SectionKind,
        found: SectionKind,
    },
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

/// Errors emitted by `QuizSession`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("question {0} is out of range")]
    IndexOutOfRange(usize),
    #[error("question {0} does not take this kind of answer")]
    WrongQuestionKind(usize),
    #[error("option {option:?} is not offered by question {index}")]
    UnknownOption { index: usize, option: String },
    #[error("statement {statement:?} is not part of question {index}")]
    UnknownStatement { index: usize, statement: String },
}

/// Errors emitted while reading configuration from the environment.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{name} must be a whole number of milliseconds, got {value:?}")]
    InvalidDelay { name: &'static str, value: String },
    #[error(transparent)]
    Core(#[from] quiz_core::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted when opening a quiz for a section.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StartQuizError {
    #[error("section {0} is not in the catalog")]
    UnknownSection(String),
    #[error("questions could not be loaded: {0}")]
    LoadFailed(String),
    #[error(transparent)]
    Session(#[from] SessionError),
}
