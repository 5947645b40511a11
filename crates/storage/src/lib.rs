#![forbid(unsafe_code)]

mod codec;
pub mod repository;
pub mod sqlite;

pub use repository::{
    InMemoryRepository, PRIZE_KEY, PROGRESS_KEY, PrizeRepository, ProgressRepository, Storage,
    StorageError,
};
