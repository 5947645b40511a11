use std::sync::Arc;

use tokio::sync::Mutex;

use quiz_core::model::{
    OverallProgress, ScoreApplication, SectionCatalog, SectionId, SectionProgress,
};
use quiz_core::reward::RewardSnapshot;
use storage::repository::{ProgressRepository, StorageError};

use crate::error::ProgressServiceError;

/// Outcome of persisting a progress change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// Nothing changed, so nothing was written.
    Skipped,
    Persisted,
    /// The write failed; the in-memory state still holds the change.
    Failed,
}

/// Result of `ProgressStore::update_section_progress`.
///
/// `previous` and `before` are read under the same lock as the update, so
/// they always describe the state this update was applied to.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub section: SectionId,
    pub previous: SectionProgress,
    pub progress: SectionProgress,
    pub changed: bool,
    pub before: RewardSnapshot,
    pub reveal_level: u8,
    pub all_completed: bool,
    pub write: WriteStatus,
}

/// Owns overall progress for the known sections and keeps storage in step.
pub struct ProgressStore {
    catalog: Arc<SectionCatalog>,
    repo: Arc<dyn ProgressRepository>,
    state: Mutex<OverallProgress>,
}

impl ProgressStore {
    /// Create a store holding default progress for every catalog section.
    ///
    /// Call `initialize` to pick up persisted progress.
    #[must_use]
    pub fn new(catalog: Arc<SectionCatalog>, repo: Arc<dyn ProgressRepository>) -> Self {
        let mut progress = OverallProgress::new();
        progress.sync_sections(catalog.ids());
        Self {
            catalog,
            repo,
            state: Mutex::new(progress),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &SectionCatalog {
        &self.catalog
    }

    /// Load persisted progress and align it with the catalog.
    ///
    /// Missing or corrupt records start from defaults. Entries for unknown
    /// sections are dropped. The merged record is written back only when the
    /// merge changed something.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record could not be read at all. Nothing is
    /// written in that case and in-memory progress keeps its defaults, so a
    /// later `initialize` can still pick up the stored record.
    pub async fn initialize(&self) -> Result<OverallProgress, StorageError> {
        let mut progress = match self.repo.load_progress().await {
            Ok(Some(stored)) => stored,
            Ok(None) => OverallProgress::new(),
            Err(StorageError::Serialization(reason)) => {
                tracing::warn!(%reason, "stored progress is corrupt; starting fresh");
                OverallProgress::new()
            }
            Err(err) => {
                tracing::warn!(error = %err, "stored progress could not be read");
                return Err(err);
            }
        };

        let report = progress.sync_sections(self.catalog.ids());
        if report.is_noop() {
            tracing::debug!(sections = progress.len(), "progress loaded");
        } else {
            tracing::info!(
                inserted = report.inserted.len(),
                dropped = report.dropped.len(),
                "progress merged with section catalog"
            );
            if let Err(err) = self.repo.save_progress(&progress).await {
                tracing::warn!(error = %err, "failed to persist merged progress");
            }
        }

        let mut state = self.state.lock().await;
        *state = progress.clone();
        Ok(progress)
    }

    /// Record a finished attempt for `section` with score `percent`.
    ///
    /// A section that is already completed only changes when it newly earns a high
    /// score. A failed write is logged and reported through `ProgressUpdate::write`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Progress` if `section` is not known.
    pub async fn update_section_progress(
        &self,
        section: &SectionId,
        percent: f64,
    ) -> Result<ProgressUpdate, ProgressServiceError> {
        let mut state = self.state.lock().await;
        let before = RewardSnapshot::of(&state);
        let application = state.apply_score(section, percent)?;
        let previous = match &application {
            ScoreApplication::Unchanged(current) => *current,
            ScoreApplication::Updated { before: earlier, .. } => *earlier,
        };

        let write = match &application {
            ScoreApplication::Unchanged(_) => {
                tracing::debug!(section = %section, percent, "score does not change progress");
                WriteStatus::Skipped
            }
            ScoreApplication::Updated { after, .. } => {
                tracing::info!(
                    section = %section,
                    percent,
                    high_score = after.high_score_achieved,
                    "section progress updated"
                );
                match self.repo.save_progress(&state).await {
                    Ok(()) => WriteStatus::Persisted,
                    Err(err) => {
                        tracing::warn!(section = %section, error = %err, "failed to persist progress");
                        WriteStatus::Failed
                    }
                }
            }
        };

        Ok(ProgressUpdate {
            section: section.clone(),
            previous,
            progress: application.current(),
            changed: application.is_updated(),
            before,
            reveal_level: state.reveal_level(),
            all_completed: state.all_completed(),
            write,
        })
    }

    pub async fn snapshot(&self) -> OverallProgress {
        self.state.lock().await.clone()
    }

    pub async fn image_reveal_level(&self) -> u8 {
        self.state.lock().await.reveal_level()
    }

    pub async fn all_sections_completed(&self) -> bool {
        self.state.lock().await.all_completed()
    }

    pub async fn section(&self, id: &SectionId) -> Option<SectionProgress> {
        self.state.lock().await.get(id).copied()
    }

    pub async fn was_high_score_achieved(&self, id: &SectionId) -> bool {
        self.section(id)
            .await
            .is_some_and(|p| p.high_score_achieved)
    }

    /// Remove the persisted record and reset every section to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the record cannot be removed;
    /// in-memory progress is left untouched in that case.
    pub async fn clear(&self) -> Result<(), ProgressServiceError> {
        let mut state = self.state.lock().await;
        self.repo.clear_progress().await?;
        state.reset();
        tracing::info!("progress cleared");
        Ok(())
    }
}
