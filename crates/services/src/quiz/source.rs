use std::collections::HashMap;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use reqwest::Client;
use tokio::sync::Mutex;

use quiz_core::model::{RawMultipleChoice, RawQuestions, RawTrueFalse, SectionDef, SectionKind};

use crate::error::QuestionLoadError;

/// Where section questions come from.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch the raw questions for one section visit.
    ///
    /// # Errors
    ///
    /// Returns `QuestionLoadError` if the questions cannot be fetched or decoded.
    async fn fetch(&self, section: &SectionDef) -> Result<RawQuestions, QuestionLoadError>;
}

/// Fetches `GET {base_url}/api/questions/{category}`, which serves a JSON array
/// already sampled for the request.
#[derive(Clone)]
pub struct HttpQuestionSource {
    client: Client,
    base_url: String,
}

impl HttpQuestionSource {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn url_for(&self, section: &SectionDef) -> String {
        format!(
            "{}/api/questions/{}",
            self.base_url.trim_end_matches('/'),
            section.category()
        )
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    async fn fetch(&self, section: &SectionDef) -> Result<RawQuestions, QuestionLoadError> {
        let url = self.url_for(section);
        tracing::debug!(section = %section.id(), %url, "fetching questions");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(QuestionLoadError::HttpStatus(response.status()));
        }

        let raw = match section.kind() {
            SectionKind::MultipleChoice => {
                RawQuestions::MultipleChoice(response.json::<Vec<RawMultipleChoice>>().await?)
            }
            SectionKind::TrueFalse => {
                RawQuestions::TrueFalse(response.json::<Vec<RawTrueFalse>>().await?)
            }
        };
        Ok(raw)
    }
}

/// In-memory question bank keyed by category, sampled per fetch.
pub struct StaticQuestionSource {
    bank: HashMap<String, RawQuestions>,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl StaticQuestionSource {
    /// Empty bank that samples with `rng`.
    #[must_use]
    pub fn new(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            bank: HashMap::new(),
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Empty bank seeded from the operating system.
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Empty bank with a reproducible sampling order.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>, questions: RawQuestions) -> Self {
        self.insert(category, questions);
        self
    }

    pub fn insert(&mut self, category: impl Into<String>, questions: RawQuestions) {
        self.bank.insert(category.into(), questions);
    }
}

#[async_trait]
impl QuestionSource for StaticQuestionSource {
    async fn fetch(&self, section: &SectionDef) -> Result<RawQuestions, QuestionLoadError> {
        let stored = self
            .bank
            .get(section.category())
            .ok_or_else(|| QuestionLoadError::UnknownCategory(section.category().to_owned()))?;

        let count = section.sample_size();
        let mut rng = self.rng.lock().await;
        let sampled = match stored {
            RawQuestions::MultipleChoice(all) => {
                RawQuestions::MultipleChoice(pick(all, count, &mut **rng))
            }
            RawQuestions::TrueFalse(all) => RawQuestions::TrueFalse(pick(all, count, &mut **rng)),
        };
        Ok(sampled)
    }
}

/// Up to `count` items in random order.
fn pick<T: Clone, R: Rng + ?Sized>(all: &[T], count: usize, rng: &mut R) -> Vec<T> {
    let mut picked = all.to_vec();
    picked.shuffle(rng);
    picked.truncate(count);
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn mc(text: &str) -> RawMultipleChoice {
        RawMultipleChoice {
            question_text: text.to_owned(),
            options: BTreeMap::from([("A".to_owned(), "x".to_owned()), ("B".to_owned(), "y".to_owned())]),
            correct_answer: "A".to_owned(),
        }
    }

    #[test]
    fn http_url_joins_base_and_category() {
        let source = HttpQuestionSource::new("http://localhost:3000/");
        let section = SectionDef::new("true-false", "TF", SectionKind::TrueFalse, "truefalse");
        assert_eq!(
            source.url_for(&section),
            "http://localhost:3000/api/questions/truefalse"
        );
    }

    #[tokio::test]
    async fn static_source_samples_up_to_the_section_size() {
        let bank: Vec<_> = (0..6).map(|i| mc(&format!("q{i}"))).collect();
        let source = StaticQuestionSource::from_os_rng()
            .with_category("founding", RawQuestions::MultipleChoice(bank.clone()));
        let section = SectionDef::new("founding", "F", SectionKind::MultipleChoice, "founding")
            .with_sample_size(4);

        let raw = source.fetch(&section).await.unwrap();

        assert_eq!(raw.len(), 4);
        assert_eq!(raw.kind(), SectionKind::MultipleChoice);
        let RawQuestions::MultipleChoice(picked) = raw else {
            panic!("expected multiple choice");
        };
        let mut texts: Vec<_> = picked.iter().map(|q| q.question_text.clone()).collect();
        texts.sort();
        texts.dedup();
        assert_eq!(texts.len(), 4);
        assert!(picked.iter().all(|q| bank.contains(q)));
    }

    #[tokio::test]
    async fn same_seed_samples_the_same_order() {
        let bank: Vec<_> = (0..10).map(|i| mc(&format!("q{i}"))).collect();
        let section = SectionDef::new("founding", "F", SectionKind::MultipleChoice, "founding")
            .with_sample_size(5);
        let fetch = |seed| {
            let source = StaticQuestionSource::seeded(seed)
                .with_category("founding", RawQuestions::MultipleChoice(bank.clone()));
            let section = section.clone();
            async move { source.fetch(&section).await.unwrap() }
        };

        assert_eq!(fetch(11).await, fetch(11).await);
    }

    #[tokio::test]
    async fn small_bank_is_returned_whole() {
        let bank: Vec<_> = (0..3).map(|i| mc(&format!("q{i}"))).collect();
        let source = StaticQuestionSource::seeded(3)
            .with_category("founding", RawQuestions::MultipleChoice(bank));
        let section = SectionDef::new("founding", "F", SectionKind::MultipleChoice, "founding")
            .with_sample_size(10);

        assert_eq!(source.fetch(&section).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn static_source_rejects_unknown_category() {
        let source = StaticQuestionSource::seeded(0);
        let section = SectionDef::new("modern", "M", SectionKind::MultipleChoice, "modern");

        let err = source.fetch(&section).await.unwrap_err();

        assert!(matches!(err, QuestionLoadError::UnknownCategory(c) if c == "modern"));
    }
}
