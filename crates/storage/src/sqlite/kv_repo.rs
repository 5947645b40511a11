use async_trait::async_trait;
use chrono::Utc;
use quiz_core::model::{OverallProgress, Prize};
use sqlx::Row;

use super::SqliteRepository;
use crate::codec;
use crate::repository::{
    PRIZE_KEY, PROGRESS_KEY, PrizeRepository, ProgressRepository, StorageError,
};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

impl SqliteRepository {
    async fn get_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM kv_entries WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.map(|r| {
            r.try_get::<String, _>("value")
                .map_err(|e| StorageError::Serialization(e.to_string()))
        })
        .transpose()
    }

    async fn put_value(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO kv_entries (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn delete_value(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv_entries WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }

    /// Store a raw value under `key`, bypassing encoding.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the write fails.
    pub async fn put_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.put_value(key, value).await
    }
}

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load_progress(&self) -> Result<Option<OverallProgress>, StorageError> {
        self.get_value(PROGRESS_KEY)
            .await?
            .map(|raw| codec::decode_progress(&raw))
            .transpose()
    }

    async fn save_progress(&self, progress: &OverallProgress) -> Result<(), StorageError> {
        let encoded = codec::encode_progress(progress)?;
        self.put_value(PROGRESS_KEY, &encoded).await
    }

    async fn clear_progress(&self) -> Result<(), StorageError> {
        self.delete_value(PROGRESS_KEY).await
    }
}

#[async_trait]
impl PrizeRepository for SqliteRepository {
    async fn load_prize(&self) -> Result<Option<Prize>, StorageError> {
        self.get_value(PRIZE_KEY)
            .await?
            .map(|raw| codec::decode_prize(&raw))
            .transpose()
    }

    async fn save_prize(&self, prize: &Prize) -> Result<(), StorageError> {
        let encoded = codec::encode_prize(prize)?;
        self.put_value(PRIZE_KEY, &encoded).await
    }

    async fn clear_prize(&self) -> Result<(), StorageError> {
        self.delete_value(PRIZE_KEY).await
    }
}
