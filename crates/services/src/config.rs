use std::env;
use std::time::Duration;

use quiz_core::model::{Prize, PrizeWheel, SectionCatalog};

use crate::error::ConfigError;
use crate::reward_service::DEFAULT_REWARD_DELAY;

pub const DB_URL_VAR: &str = "QUIZ_DB_URL";
pub const QUESTIONS_URL_VAR: &str = "QUIZ_QUESTIONS_URL";
pub const REWARD_DELAY_VAR: &str = "QUIZ_REWARD_DELAY_MS";

pub const DEFAULT_DB_URL: &str = "sqlite://quiz.sqlite3";

/// Runtime configuration for the quiz services.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_url: String,
    /// Base URL of the question server; the built-in bank is used when unset.
    pub questions_url: Option<String>,
    pub reward_delay: Duration,
    pub catalog: SectionCatalog,
    pub wheel: PrizeWheel,
}

impl AppConfig {
    /// Read overrides from `QUIZ_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let db_url = non_empty(DB_URL_VAR).unwrap_or_else(|| DEFAULT_DB_URL.into());
        let questions_url = non_empty(QUESTIONS_URL_VAR);
        let reward_delay = match non_empty(REWARD_DELAY_VAR) {
            None => DEFAULT_REWARD_DELAY,
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidDelay {
                    name: REWARD_DELAY_VAR,
                    value: raw,
                })?,
        };

        Ok(Self {
            db_url,
            questions_url,
            reward_delay,
            catalog: SectionCatalog::history_default(),
            wheel: default_wheel()?,
        })
    }
}

/// Six prizes; the first draw only lands on the two big ones.
///
/// # Errors
///
/// Returns `ConfigError::Core` if the wheel definition is inconsistent.
pub fn default_wheel() -> Result<PrizeWheel, ConfigError> {
    let prizes = [
        "Milk tea",
        "Movie night",
        "Book voucher",
        "Dinner out",
        "Flowers",
        "Handwritten letter",
    ]
    .map(Prize::new)
    .to_vec();
    let first_draw = vec![Prize::new("Movie night"), Prize::new("Dinner out")];
    PrizeWheel::new(prizes, first_draw).map_err(|e| ConfigError::Core(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_without_variables() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.db_url, DEFAULT_DB_URL);
        assert_eq!(config.questions_url, None);
        assert_eq!(config.reward_delay, Duration::from_secs(2));
        assert_eq!(config.catalog.len(), 4);
        assert_eq!(config.wheel.first_draw_pool().len(), 2);
    }

    #[test]
    fn variables_override_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            (DB_URL_VAR, "sqlite://other.sqlite3"),
            (QUESTIONS_URL_VAR, "http://localhost:3000"),
            (REWARD_DELAY_VAR, "250"),
        ]))
        .unwrap();
        assert_eq!(config.db_url, "sqlite://other.sqlite3");
        assert_eq!(config.questions_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(config.reward_delay, Duration::from_millis(250));
    }

    #[test]
    fn bad_delay_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[(REWARD_DELAY_VAR, "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDelay { .. }));
    }
}
