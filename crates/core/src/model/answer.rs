use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::model::ids::{OptionId, StatementId};

/// User verdict on a single true/false statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TruthAnswer {
    True,
    False,
}

impl TruthAnswer {
    #[must_use]
    pub fn as_bool(self) -> bool {
        matches!(self, TruthAnswer::True)
    }
}

impl From<bool> for TruthAnswer {
    fn from(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}

/// Input that is neither a true nor a false label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTruthError(String);

impl fmt::Display for ParseTruthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a true/false answer: {:?}", self.0)
    }
}

impl std::error::Error for ParseTruthError {}

impl FromStr for TruthAnswer {
    type Err = ParseTruthError;

    /// Accepts the stored `"true"`/`"false"` values and the displayed
    /// `"Đúng"`/`"Sai"` labels, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "true" | "đúng" => Ok(Self::True),
            "false" | "sai" => Ok(Self::False),
            _ => Err(ParseTruthError(s.to_owned())),
        }
    }
}

/// Answer recorded for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Choice(OptionId),
    Statements(BTreeMap<StatementId, TruthAnswer>),
}

/// Answers for one section, keyed by question index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionAnswers {
    by_index: BTreeMap<usize, Answer>,
}

impl SectionAnswers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_option(&mut self, index: usize, option: OptionId) {
        self.by_index.insert(index, Answer::Choice(option));
    }

    /// Record a verdict for one statement, keeping the other statements of the set.
    ///
    /// A previous `Choice` answer at the same index is replaced.
    pub fn set_statement(&mut self, index: usize, statement: StatementId, answer: TruthAnswer) {
        let entry = self
            .by_index
            .entry(index)
            .or_insert_with(|| Answer::Statements(BTreeMap::new()));
        if let Answer::Statements(map) = entry {
            map.insert(statement, answer);
            return;
        }
        *entry = Answer::Statements(BTreeMap::from([(statement, answer)]));
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Answer> {
        self.by_index.get(&index)
    }

    #[must_use]
    pub fn choice(&self, index: usize) -> Option<&OptionId> {
        match self.by_index.get(&index) {
            Some(Answer::Choice(option)) => Some(option),
            _ => None,
        }
    }

    #[must_use]
    pub fn statement(&self, index: usize, statement: &StatementId) -> Option<TruthAnswer> {
        match self.by_index.get(&index) {
            Some(Answer::Statements(map)) => map.get(statement).copied(),
            _ => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_index.clear();
    }
}
