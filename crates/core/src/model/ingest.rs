//! Typed ingestion of the question payloads served per section.
//!
//! The wire shapes are kept separate from the domain questions so that drift in
//! the served JSON is caught here instead of surfacing as wrong scores.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{OptionId, QuestionId, StatementId};
use crate::model::question::{ChoiceOption, MultipleChoiceQuestion, SectionQuestions, TrueFalseSet};
use crate::model::section::SectionKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IngestError {
    #[error("question {index}: text is empty")]
    EmptyText { index: usize },

    #[error("question {index}: no options")]
    NoOptions { index: usize },

    #[error("question {index}: correct answer {answer:?} is not one of the options")]
    UnknownCorrectAnswer { index: usize, answer: String },

    #[error("question {index}: no statements")]
    NoStatements { index: usize },

    #[error("question {index}: statement {statement:?} has no truth value")]
    MissingTruth { index: usize, statement: String },

    #[error("question {index}: invalid key {key:?}")]
    InvalidKey { index: usize, key: String },
}

/// Multiple-choice question as served: `{question_text, options: {key: text}, correct_answer}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMultipleChoice {
    pub question_text: String,
    pub options: BTreeMap<String, String>,
    pub correct_answer: String,
}

/// True/false set as served:
/// `{question, statements: {key: text}, answer_boolean_map: {key: bool}, explanation_map: {key: text}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTrueFalse {
    pub question: String,
    pub statements: BTreeMap<String, String>,
    pub answer_boolean_map: BTreeMap<String, bool>,
    #[serde(default)]
    pub explanation_map: BTreeMap<String, String>,
}

/// Raw payload for one section, already split by format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawQuestions {
    MultipleChoice(Vec<RawMultipleChoice>),
    TrueFalse(Vec<RawTrueFalse>),
}

impl RawQuestions {
    #[must_use]
    pub fn kind(&self) -> SectionKind {
        match self {
            RawQuestions::MultipleChoice(_) => SectionKind::MultipleChoice,
            RawQuestions::TrueFalse(_) => SectionKind::TrueFalse,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            RawQuestions::MultipleChoice(q) => q.len(),
            RawQuestions::TrueFalse(q) => q.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate every question and convert to the domain representation.
    ///
    /// Question ids are assigned from payload position, starting at 1.
    ///
    /// # Errors
    ///
    /// Returns the first `IngestError` found.
    pub fn ingest(self) -> Result<SectionQuestions, IngestError> {
        match self {
            RawQuestions::MultipleChoice(raw) => raw
                .into_iter()
                .enumerate()
                .map(|(index, q)| q.into_question(index))
                .collect::<Result<Vec<_>, _>>()
                .map(SectionQuestions::MultipleChoice),
            RawQuestions::TrueFalse(raw) => raw
                .into_iter()
                .enumerate()
                .map(|(index, q)| q.into_set(index))
                .collect::<Result<Vec<_>, _>>()
                .map(SectionQuestions::TrueFalse),
        }
    }
}

impl RawMultipleChoice {
    fn into_question(self, index: usize) -> Result<MultipleChoiceQuestion, IngestError> {
        let text = self.question_text.trim().to_owned();
        if text.is_empty() {
            return Err(IngestError::EmptyText { index });
        }
        if self.options.is_empty() {
            return Err(IngestError::NoOptions { index });
        }

        let mut options = Vec::with_capacity(self.options.len());
        for (key, label) in self.options {
            let id = parse_key::<OptionId>(index, &key)?;
            options.push(ChoiceOption {
                id,
                text: label.trim().to_owned(),
            });
        }

        let correct = self.correct_answer.trim();
        let Some(correct_option) = options
            .iter()
            .find(|o| o.id.as_str() == correct)
            .map(|o| o.id.clone())
        else {
            return Err(IngestError::UnknownCorrectAnswer {
                index,
                answer: self.correct_answer,
            });
        };

        Ok(MultipleChoiceQuestion::from_parts(
            question_id(index),
            text,
            options,
            correct_option,
        ))
    }
}

impl RawTrueFalse {
    fn into_set(self, index: usize) -> Result<TrueFalseSet, IngestError> {
        let passage = self.question.trim().to_owned();
        if passage.is_empty() {
            return Err(IngestError::EmptyText { index });
        }
        if self.statements.is_empty() {
            return Err(IngestError::NoStatements { index });
        }

        let mut statements = BTreeMap::new();
        let mut truth = BTreeMap::new();
        let mut explanations = BTreeMap::new();

        for (key, label) in self.statements {
            let Some(value) = self.answer_boolean_map.get(&key).copied() else {
                return Err(IngestError::MissingTruth {
                    index,
                    statement: key,
                });
            };
            let id = parse_key::<StatementId>(index, &key)?;
            if let Some(explanation) = self.explanation_map.get(&key) {
                explanations.insert(id.clone(), explanation.trim().to_owned());
            }
            truth.insert(id.clone(), value);
            statements.insert(id, label.trim().to_owned());
        }

        Ok(TrueFalseSet::from_parts(
            question_id(index),
            passage,
            statements,
            truth,
            explanations,
        ))
    }
}

fn parse_key<T: std::str::FromStr>(index: usize, key: &str) -> Result<T, IngestError> {
    key.parse::<T>().map_err(|_| IngestError::InvalidKey {
        index,
        key: key.to_owned(),
    })
}

fn question_id(index: usize) -> QuestionId {
    QuestionId::new(u32::try_from(index + 1).unwrap_or(u32::MAX))
}
