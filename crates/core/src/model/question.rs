use std::collections::BTreeMap;

use crate::model::ids::{OptionId, QuestionId, StatementId};
use crate::model::section::SectionKind;

//
// ─── MULTIPLE CHOICE ───────────────────────────────────────────────────────────
//

/// A single answer option of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub id: OptionId,
    pub text: String,
}

/// Multiple-choice question with exactly one correct option.
///
/// Built through ingestion, which guarantees that `correct_option` is one of `options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipleChoiceQuestion {
    id: QuestionId,
    text: String,
    options: Vec<ChoiceOption>,
    correct_option: OptionId,
}

impl MultipleChoiceQuestion {
    pub(crate) fn from_parts(
        id: QuestionId,
        text: String,
        options: Vec<ChoiceOption>,
        correct_option: OptionId,
    ) -> Self {
        Self {
            id,
            text,
            options,
            correct_option,
        }
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[ChoiceOption] {
        &self.options
    }

    #[must_use]
    pub fn correct_option(&self) -> &OptionId {
        &self.correct_option
    }

    #[must_use]
    pub fn is_correct(&self, selected: &OptionId) -> bool {
        &self.correct_option == selected
    }
}

//
// ─── TRUE / FALSE ──────────────────────────────────────────────────────────────
//

/// A passage followed by independently graded true/false statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrueFalseSet {
    id: QuestionId,
    passage: String,
    statements: BTreeMap<StatementId, String>,
    truth: BTreeMap<StatementId, bool>,
    explanations: BTreeMap<StatementId, String>,
}

impl TrueFalseSet {
    pub(crate) fn from_parts(
        id: QuestionId,
        passage: String,
        statements: BTreeMap<StatementId, String>,
        truth: BTreeMap<StatementId, bool>,
        explanations: BTreeMap<StatementId, String>,
    ) -> Self {
        Self {
            id,
            passage,
            statements,
            truth,
            explanations,
        }
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn passage(&self) -> &str {
        &self.passage
    }

    /// Statement ids with their labels, in key order.
    pub fn statements(&self) -> impl Iterator<Item = (&StatementId, &str)> {
        self.statements.iter().map(|(id, label)| (id, label.as_str()))
    }

    #[must_use]
    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }

    /// Correct truth value for a statement; `None` for unknown statements.
    #[must_use]
    pub fn truth(&self, statement: &StatementId) -> Option<bool> {
        self.truth.get(statement).copied()
    }

    #[must_use]
    pub fn explanation(&self, statement: &StatementId) -> Option<&str> {
        self.explanations.get(statement).map(String::as_str)
    }
}

//
// ─── SECTION QUESTIONS ─────────────────────────────────────────────────────────
//

/// Question list for one section visit. Sections never mix formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionQuestions {
    MultipleChoice(Vec<MultipleChoiceQuestion>),
    TrueFalse(Vec<TrueFalseSet>),
}

impl SectionQuestions {
    #[must_use]
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionQuestions::MultipleChoice(_) => SectionKind::MultipleChoice,
            SectionQuestions::TrueFalse(_) => SectionKind::TrueFalse,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            SectionQuestions::MultipleChoice(q) => q.len(),
            SectionQuestions::TrueFalse(q) => q.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
