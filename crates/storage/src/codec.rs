//! JSON encoding of stored values, shared by every backend.

use quiz_core::model::{OverallProgress, Prize};

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn encode_progress(progress: &OverallProgress) -> Result<String, StorageError> {
    serde_json::to_string(progress).map_err(ser)
}

pub(crate) fn decode_progress(raw: &str) -> Result<OverallProgress, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}

pub(crate) fn encode_prize(prize: &Prize) -> Result<String, StorageError> {
    serde_json::to_string(prize).map_err(ser)
}

pub(crate) fn decode_prize(raw: &str) -> Result<Prize, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}
