use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::SectionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SectionCatalogError {
    #[error("section catalog cannot be empty")]
    Empty,

    #[error("duplicate section id: {0}")]
    DuplicateId(SectionId),

    #[error("section {0} must sample at least one question")]
    ZeroSampleSize(SectionId),

    #[error("section {0} has an empty category key")]
    EmptyCategory(SectionId),
}

//
// ─── SECTION ───────────────────────────────────────────────────────────────────
//

/// Question format shared by every question in a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    MultipleChoice,
    TrueFalse,
}

impl SectionKind {
    /// Number of questions sampled per visit when a section does not override it.
    #[must_use]
    pub fn default_sample_size(self) -> usize {
        match self {
            SectionKind::MultipleChoice => 10,
            SectionKind::TrueFalse => 5,
        }
    }
}

/// Static description of a quiz section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDef {
    id: SectionId,
    title: String,
    kind: SectionKind,
    category: String,
    sample_size: usize,
}

impl SectionDef {
    /// Creates a section using the default sample size for its kind.
    #[must_use]
    pub fn new(
        id: impl Into<SectionId>,
        title: impl Into<String>,
        kind: SectionKind,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            category: category.into(),
            sample_size: kind.default_sample_size(),
        }
    }

    #[must_use]
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    #[must_use]
    pub fn id(&self) -> &SectionId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    /// Key sent to the question source.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Ordered, validated set of known sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionCatalog {
    sections: Vec<SectionDef>,
}

impl SectionCatalog {
    /// Validate and build a catalog.
    ///
    /// # Errors
    ///
    /// Returns `SectionCatalogError` if the list is empty, contains duplicate ids,
    /// a zero sample size or a blank category key.
    pub fn new(sections: Vec<SectionDef>) -> Result<Self, SectionCatalogError> {
        if sections.is_empty() {
            return Err(SectionCatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(sections.len());
        for section in &sections {
            if !seen.insert(section.id.clone()) {
                return Err(SectionCatalogError::DuplicateId(section.id.clone()));
            }
            if section.sample_size == 0 {
                return Err(SectionCatalogError::ZeroSampleSize(section.id.clone()));
            }
            if section.category.trim().is_empty() {
                return Err(SectionCatalogError::EmptyCategory(section.id.clone()));
            }
        }

        Ok(Self { sections })
    }

    /// Three multiple-choice history sections followed by one true/false section.
    #[must_use]
    pub fn history_default() -> Self {
        Self {
            sections: vec![
                SectionDef::new(
                    "founding",
                    "Founding of the nation",
                    SectionKind::MultipleChoice,
                    "founding",
                ),
                SectionDef::new(
                    "dynasties",
                    "Feudal dynasties",
                    SectionKind::MultipleChoice,
                    "dynasties",
                ),
                SectionDef::new(
                    "modern",
                    "Modern history",
                    SectionKind::MultipleChoice,
                    "modern",
                ),
                SectionDef::new(
                    "true-false",
                    "True or false",
                    SectionKind::TrueFalse,
                    "truefalse",
                ),
            ],
        }
    }

    #[must_use]
    pub fn get(&self, id: &SectionId) -> Option<&SectionDef> {
        self.sections.iter().find(|s| &s.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &SectionId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &SectionId> {
        self.sections.iter().map(SectionDef::id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SectionDef> {
        self.sections.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
