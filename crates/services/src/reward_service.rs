use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::SectionId;
use quiz_core::reward::{RewardEvent, RewardSnapshot, RewardStage, reward_event};
use quiz_core::scoring::is_high_score;

use crate::error::ProgressServiceError;
use crate::navigation::{NavigationCommand, Route};
use crate::progress_service::{ProgressStore, ProgressUpdate};
use crate::quiz::QuizSession;

/// Delay before moving to the reward screen after the last section is passed.
pub const DEFAULT_REWARD_DELAY: Duration = Duration::from_secs(2);

/// Everything a score submission produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub update: ProgressUpdate,
    pub event: Option<RewardEvent>,
    /// Set only together with `RewardEvent::AllUnlocked`.
    pub navigation: Option<NavigationCommand>,
    pub stage: RewardStage,
}

/// Turns score submissions into progress updates and reward notifications.
#[derive(Clone)]
pub struct RewardTracker {
    progress: Arc<ProgressStore>,
    reward_delay: Duration,
}

impl RewardTracker {
    #[must_use]
    pub fn new(progress: Arc<ProgressStore>, reward_delay: Duration) -> Self {
        Self {
            progress,
            reward_delay,
        }
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressStore> {
        Arc::clone(&self.progress)
    }

    /// Record a score and work out which notification it earns.
    ///
    /// Both sides of the comparison come from the update itself, so concurrent
    /// submissions each see the state their own update was applied to.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` if `section` is not known.
    pub async fn submit_score(
        &self,
        section: &SectionId,
        percent: f64,
    ) -> Result<Submission, ProgressServiceError> {
        let update = self
            .progress
            .update_section_progress(section, percent)
            .await?;

        let after = RewardSnapshot {
            reveal_level: update.reveal_level,
            all_completed: update.all_completed,
        };
        let event = reward_event(
            section,
            update.before,
            after,
            update.previous.high_score_achieved,
            update.progress.high_score_achieved,
        );

        let navigation = match &event {
            Some(RewardEvent::AllUnlocked { .. }) => {
                tracing::info!(section = %section, "all sections passed; reward unlocked");
                Some(NavigationCommand::after(Route::Reward, self.reward_delay))
            }
            Some(RewardEvent::FirstUnlock { reveal_level, .. }) => {
                tracing::info!(section = %section, reveal_level, "first reward piece unlocked");
                None
            }
            Some(RewardEvent::PieceUnlocked { from, to, .. }) => {
                tracing::info!(section = %section, from, to, "reward piece unlocked");
                None
            }
            None => {
                if update.changed && !is_high_score(percent) {
                    tracing::debug!(section = %section, percent, "section completed below threshold");
                }
                None
            }
        };

        Ok(Submission {
            stage: after.stage(),
            update,
            event,
            navigation,
        })
    }

    /// Score a finished session and submit the result.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` if the session's section is not known.
    pub async fn submit_session(
        &self,
        session: &QuizSession,
    ) -> Result<Submission, ProgressServiceError> {
        let score = session.score();
        self.submit_score(session.section(), score.percent()).await
    }

    pub async fn stage(&self) -> RewardStage {
        RewardSnapshot::of(&self.progress.snapshot().await).stage()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{SectionCatalog, SectionDef, SectionKind};
    use storage::repository::InMemoryRepository;

    fn tracker(names: &[&str]) -> RewardTracker {
        let defs = names
            .iter()
            .map(|n| SectionDef::new(*n, *n, SectionKind::MultipleChoice, *n))
            .collect();
        let catalog = Arc::new(SectionCatalog::new(defs).unwrap());
        let store = ProgressStore::new(catalog, Arc::new(InMemoryRepository::new()));
        RewardTracker::new(Arc::new(store), DEFAULT_REWARD_DELAY)
    }

    #[tokio::test]
    async fn low_score_earns_nothing() {
        let tracker = tracker(&["a", "b"]);

        let submission = tracker.submit_score(&SectionId::new("a"), 80.0).await.unwrap();

        assert_eq!(submission.event, None);
        assert_eq!(submission.stage, RewardStage::Locked);
        assert!(submission.update.changed);
    }

    #[tokio::test]
    async fn threshold_is_inclusive() {
        let tracker = tracker(&["a", "b"]);

        let submission = tracker.submit_score(&SectionId::new("a"), 90.0).await.unwrap();

        assert_eq!(
            submission.event,
            Some(RewardEvent::FirstUnlock {
                section: SectionId::new("a"),
                reveal_level: 50
            })
        );
        assert_eq!(submission.navigation, None);
    }

    #[tokio::test]
    async fn last_pass_schedules_reward_navigation() {
        let tracker = tracker(&["a"]);

        let submission = tracker.submit_score(&SectionId::new("a"), 100.0).await.unwrap();

        assert_eq!(
            submission.event,
            Some(RewardEvent::AllUnlocked {
                section: SectionId::new("a")
            })
        );
        assert_eq!(
            submission.navigation,
            Some(NavigationCommand::after(Route::Reward, DEFAULT_REWARD_DELAY))
        );
        assert_eq!(tracker.stage().await, RewardStage::FullyUnlocked);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_passes_announce_the_first_piece_once() {
        let tracker = Arc::new(tracker(&["a", "b", "c", "d"]));
        let handles: Vec<_> = ["a", "b", "c"]
            .into_iter()
            .flat_map(|id| [id, id])
            .map(|id| {
                let tracker = Arc::clone(&tracker);
                tokio::spawn(async move { tracker.submit_score(&SectionId::new(id), 95.0).await })
            })
            .collect();

        let mut events = Vec::new();
        for handle in handles {
            events.extend(handle.await.unwrap().unwrap().event);
        }

        let first_unlocks = events
            .iter()
            .filter(|e| matches!(e, RewardEvent::FirstUnlock { .. }))
            .count();
        assert_eq!(first_unlocks, 1);
        assert_eq!(events.len(), 3);
        assert_eq!(tracker.progress().image_reveal_level().await, 75);
    }

    #[tokio::test]
    async fn repeat_pass_of_same_section_is_silent() {
        let tracker = tracker(&["a", "b"]);
        let a = SectionId::new("a");
        tracker.submit_score(&a, 95.0).await.unwrap();

        let again = tracker.submit_score(&a, 99.0).await.unwrap();

        assert!(again.update.previous.high_score_achieved);
        assert_eq!(
            again.update.before,
            RewardSnapshot {
                reveal_level: 50,
                all_completed: false
            }
        );
        assert_eq!(again.event, None);
    }

    #[tokio::test]
    async fn unknown_section_is_rejected() {
        let tracker = tracker(&["a"]);
        assert!(tracker.submit_score(&SectionId::new("b"), 95.0).await.is_err());
    }
}
