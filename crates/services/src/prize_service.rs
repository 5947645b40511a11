use std::sync::Arc;

use tokio::sync::Mutex;

use quiz_core::RandomSource;
use quiz_core::model::{Prize, PrizeError, PrizeWheel, SpinOutcome};
use storage::repository::PrizeRepository;

use crate::error::PrizeServiceError;
use crate::progress_service::ProgressStore;

/// Spins the prize wheel and keeps the first prize drawn.
pub struct PrizeService {
    wheel: PrizeWheel,
    repo: Arc<dyn PrizeRepository>,
    progress: Arc<ProgressStore>,
    rng: Mutex<Box<dyn RandomSource>>,
}

impl PrizeService {
    #[must_use]
    pub fn new(
        wheel: PrizeWheel,
        repo: Arc<dyn PrizeRepository>,
        progress: Arc<ProgressStore>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            wheel,
            repo,
            progress,
            rng: Mutex::new(rng),
        }
    }

    #[must_use]
    pub fn wheel(&self) -> &PrizeWheel {
        &self.wheel
    }

    /// Spin the wheel.
    ///
    /// The first spin draws from the first-draw pool and stores the result. Later
    /// spins land anywhere on the wheel but the stored prize stays kept.
    ///
    /// # Errors
    ///
    /// Returns `PrizeError::Locked` until every section is passed, or
    /// `PrizeServiceError::Storage` if the stored prize cannot be read or saved.
    pub async fn spin(&self) -> Result<SpinOutcome, PrizeServiceError> {
        if !self.progress.all_sections_completed().await {
            return Err(PrizeError::Locked.into());
        }

        let stored = self.repo.load_prize().await?;
        let outcome = {
            let mut rng = self.rng.lock().await;
            self.wheel.spin(stored.as_ref(), &mut **rng)
        };

        if outcome.first_draw {
            self.repo.save_prize(&outcome.kept).await?;
            tracing::info!(prize = %outcome.kept, "first prize drawn");
        } else {
            tracing::debug!(landed = %outcome.landed, kept = %outcome.kept, "wheel spun again");
        }

        Ok(outcome)
    }

    /// # Errors
    ///
    /// Returns `PrizeServiceError::Storage` if the stored prize cannot be read.
    pub async fn stored_prize(&self) -> Result<Option<Prize>, PrizeServiceError> {
        Ok(self.repo.load_prize().await?)
    }

    /// Forget the kept prize so the next spin is a first draw again.
    ///
    /// # Errors
    ///
    /// Returns `PrizeServiceError::Storage` if the prize cannot be removed.
    pub async fn clear(&self) -> Result<(), PrizeServiceError> {
        self.repo.clear_prize().await?;
        tracing::info!("stored prize cleared");
        Ok(())
    }
}
