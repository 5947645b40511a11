#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod navigation;
pub mod prize_service;
pub mod progress_service;
pub mod quiz;
pub mod random;
pub mod reward_service;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use config::AppConfig;
pub use error::{
    AppServicesError, ConfigError, PrizeServiceError, ProgressServiceError, QuestionLoadError,
    SessionError, StartQuizError,
};
pub use navigation::{NavigationCommand, Route};
pub use prize_service::PrizeService;
pub use progress_service::{ProgressStore, ProgressUpdate, WriteStatus};
pub use random::{SeededRandom, ThreadRandom};
pub use reward_service::{RewardTracker, Submission};
