use async_trait::async_trait;
use quiz_core::model::{OverallProgress, Prize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::codec;

/// Key under which overall progress is stored.
pub const PROGRESS_KEY: &str = "quiz_progress";

/// Key under which the first-drawn prize is stored.
pub const PRIZE_KEY: &str = "wheel_prize";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persistence port for overall quiz progress.
///
/// One record holds the whole mapping; there is no per-section row.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load the stored progress record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored value cannot be decoded,
    /// or other storage errors.
    async fn load_progress(&self) -> Result<Option<OverallProgress>, StorageError>;

    /// Replace the stored progress record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be written.
    async fn save_progress(&self, progress: &OverallProgress) -> Result<(), StorageError>;

    /// Remove the stored progress record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be removed.
    async fn clear_progress(&self) -> Result<(), StorageError>;
}

/// Persistence port for the prize kept from the first wheel spin.
#[async_trait]
pub trait PrizeRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failures.
    async fn load_prize(&self) -> Result<Option<Prize>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the prize cannot be written.
    async fn save_prize(&self, prize: &Prize) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the prize cannot be removed.
    async fn clear_prize(&self) -> Result<(), StorageError>;
}

/// Key/value repository held in memory, mirroring browser local storage.
///
/// Values are stored encoded, so corrupt records can be injected in tests.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw value under `key`, bypassing encoding.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_raw(&self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        self.put(key, value.into())
    }

    /// Raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.get(key)
    }

    /// Number of writes (saves and clears) performed so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn put(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_progress(&self) -> Result<Option<OverallProgress>, StorageError> {
        self.get(PROGRESS_KEY)?
            .map(|raw| codec::decode_progress(&raw))
            .transpose()
    }

    async fn save_progress(&self, progress: &OverallProgress) -> Result<(), StorageError> {
        self.put(PROGRESS_KEY, codec::encode_progress(progress)?)
    }

    async fn clear_progress(&self) -> Result<(), StorageError> {
        self.remove(PROGRESS_KEY)
    }
}

#[async_trait]
impl PrizeRepository for InMemoryRepository {
    async fn load_prize(&self) -> Result<Option<Prize>, StorageError> {
        self.get(PRIZE_KEY)?
            .map(|raw| codec::decode_prize(&raw))
            .transpose()
    }

    async fn save_prize(&self, prize: &Prize) -> Result<(), StorageError> {
        self.put(PRIZE_KEY, codec::encode_prize(prize)?)
    }

    async fn clear_prize(&self) -> Result<(), StorageError> {
        self.remove(PRIZE_KEY)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub prizes: Arc<dyn PrizeRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(InMemoryRepository::new())
    }

    #[must_use]
    pub fn from_in_memory(repo: InMemoryRepository) -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let prizes: Arc<dyn PrizeRepository> = Arc::new(repo);
        Self { progress, prizes }
    }
}
