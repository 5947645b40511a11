use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use quiz_core::Clock;
use quiz_core::model::{SectionCatalog, SectionId};
use quiz_core::reward::RewardStage;
use storage::repository::Storage;

use crate::config::AppConfig;
use crate::error::{AppServicesError, StartQuizError};
use crate::navigation::Route;
use crate::prize_service::PrizeService;
use crate::progress_service::ProgressStore;
use crate::quiz::{
    HttpQuestionSource, QuestionLoad, QuestionLoader, QuestionSource, QuizSession, builtin_source,
};
use crate::random::ThreadRandom;
use crate::reward_service::RewardTracker;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    catalog: Arc<SectionCatalog>,
    progress: Arc<ProgressStore>,
    rewards: Arc<RewardTracker>,
    prizes: Arc<PrizeService>,
    questions: QuestionLoader,
}

impl AppServices {
    /// Build services backed by `SQLite` storage at `config.db_url`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage cannot be opened or read.
    pub async fn new_sqlite(config: &AppConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(&config.db_url).await?;
        let questions: Arc<dyn QuestionSource> = match &config.questions_url {
            Some(url) => Arc::new(HttpQuestionSource::new(url.clone())),
            None => Arc::new(builtin_source(StdRng::from_os_rng())),
        };
        Self::from_parts(storage, config, clock, questions).await
    }

    /// Wire services over existing storage and a question source, loading
    /// persisted progress.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Storage` if stored progress cannot be read.
    pub async fn from_parts(
        storage: Storage,
        config: &AppConfig,
        clock: Clock,
        questions: Arc<dyn QuestionSource>,
    ) -> Result<Self, AppServicesError> {
        let catalog = Arc::new(config.catalog.clone());
        let progress = Arc::new(ProgressStore::new(
            Arc::clone(&catalog),
            Arc::clone(&storage.progress),
        ));
        progress.initialize().await?;

        let rewards = Arc::new(RewardTracker::new(
            Arc::clone(&progress),
            config.reward_delay,
        ));
        let prizes = Arc::new(PrizeService::new(
            config.wheel.clone(),
            Arc::clone(&storage.prizes),
            Arc::clone(&progress),
            Box::new(ThreadRandom),
        ));

        Ok(Self {
            clock,
            catalog,
            progress,
            rewards,
            prizes,
            questions: QuestionLoader::new(questions),
        })
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<SectionCatalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressStore> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn rewards(&self) -> Arc<RewardTracker> {
        Arc::clone(&self.rewards)
    }

    #[must_use]
    pub fn prizes(&self) -> Arc<PrizeService> {
        Arc::clone(&self.prizes)
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionLoader {
        &self.questions
    }

    /// Load fresh questions for `id` and open a session on them.
    ///
    /// # Errors
    ///
    /// Returns `StartQuizError` if the section is unknown or its questions
    /// cannot be loaded.
    pub async fn start_quiz(&self, id: &SectionId) -> Result<QuizSession, StartQuizError> {
        let section = self
            .catalog
            .get(id)
            .ok_or_else(|| StartQuizError::UnknownSection(id.to_string()))?;

        match self.questions.load(section).await {
            QuestionLoad::Ready(questions) => {
                Ok(QuizSession::new(id.clone(), questions, self.clock)?)
            }
            QuestionLoad::Failed(reason) => Err(StartQuizError::LoadFailed(reason)),
        }
    }

    /// Whether `route` can be entered with the current progress.
    pub async fn can_enter(&self, route: &Route) -> bool {
        let stage: RewardStage = self.rewards.stage().await;
        route.is_allowed(stage)
    }
}
