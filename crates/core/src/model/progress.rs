use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::SectionId;
use crate::scoring::is_high_score;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("unknown section: {0}")]
    UnknownSection(SectionId),
}

//
// ─── SECTION PROGRESS ──────────────────────────────────────────────────────────
//

/// Durable progress for one section.
///
/// Every field defaults on load so records written before a field existed stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionProgress {
    pub completed: bool,
    pub high_score_achieved: bool,
    /// Best percentage seen, 0..=100.
    pub highest_score: f64,
}

impl SectionProgress {
    /// Completed with a high score; the condition that reveals a reward piece.
    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.completed && self.high_score_achieved
    }

    /// Whether a submission with `percent` would change this entry.
    ///
    /// Only the first completion and the first high score are ever recorded.
    #[must_use]
    pub fn accepts(&self, percent: f64) -> bool {
        !(self.completed && (!is_high_score(percent) || self.high_score_achieved))
    }
}

/// Outcome of applying a score to one section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreApplication {
    /// Already completed and nothing would improve; no write is needed.
    Unchanged(SectionProgress),
    Updated {
        before: SectionProgress,
        after: SectionProgress,
    },
}

impl ScoreApplication {
    #[must_use]
    pub fn current(&self) -> SectionProgress {
        match self {
            ScoreApplication::Unchanged(p) => *p,
            ScoreApplication::Updated { after, .. } => *after,
        }
    }

    #[must_use]
    pub fn is_updated(&self) -> bool {
        matches!(self, ScoreApplication::Updated { .. })
    }

    /// High score flipped from false to true with this application.
    #[must_use]
    pub fn newly_high_score(&self) -> bool {
        match self {
            ScoreApplication::Unchanged(_) => false,
            ScoreApplication::Updated { before, after } => {
                !before.high_score_achieved && after.high_score_achieved
            }
        }
    }
}

/// Keys inserted and removed while aligning progress with the known sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub inserted: Vec<SectionId>,
    pub dropped: Vec<SectionId>,
}

impl SyncReport {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.inserted.is_empty() && self.dropped.is_empty()
    }
}

//
// ─── OVERALL PROGRESS ──────────────────────────────────────────────────────────
//

/// Progress for every known section. This is the only durable entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverallProgress {
    sections: BTreeMap<SectionId, SectionProgress>,
}

impl OverallProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Align keys with `known`: insert defaults for missing sections and drop
    /// sections that are no longer known. Existing entries are never overwritten.
    pub fn sync_sections<'a>(&mut self, known: impl IntoIterator<Item = &'a SectionId>) -> SyncReport {
        let known: Vec<&SectionId> = known.into_iter().collect();
        let mut report = SyncReport::default();

        for id in &known {
            if !self.sections.contains_key(*id) {
                self.sections.insert((*id).clone(), SectionProgress::default());
                report.inserted.push((*id).clone());
            }
        }

        self.sections.retain(|id, _| {
            let keep = known.contains(&id);
            if !keep {
                report.dropped.push(id.clone());
            }
            keep
        });

        report
    }

    #[must_use]
    pub fn get(&self, id: &SectionId) -> Option<&SectionProgress> {
        self.sections.get(id)
    }

    /// Record a finished attempt for `id`.
    ///
    /// The score is clamped to 0..=100 before it is compared with `highest_score`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::UnknownSection` if `id` has no entry.
    pub fn apply_score(
        &mut self,
        id: &SectionId,
        percent: f64,
    ) -> Result<ScoreApplication, ProgressError> {
        let entry = self
            .sections
            .get_mut(id)
            .ok_or_else(|| ProgressError::UnknownSection(id.clone()))?;

        if !entry.accepts(percent) {
            return Ok(ScoreApplication::Unchanged(*entry));
        }

        let before = *entry;
        let percent = clamp_percent(percent);
        entry.completed = true;
        entry.high_score_achieved = entry.high_score_achieved || is_high_score(percent);
        entry.highest_score = entry.highest_score.max(percent);

        Ok(ScoreApplication::Updated {
            before,
            after: *entry,
        })
    }

    /// Number of sections that are completed with a high score.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.sections.values().filter(|p| p.is_passed()).count()
    }

    /// `floor(100 * passed / total)`, clamped to 0..=100; 0 with no sections.
    #[must_use]
    pub fn reveal_level(&self) -> u8 {
        let total = self.sections.len();
        if total == 0 {
            return 0;
        }
        let level = (100 * self.passed_count() / total).min(100);
        u8::try_from(level).unwrap_or(100)
    }

    /// True iff there is at least one section and every section is passed.
    #[must_use]
    pub fn all_completed(&self) -> bool {
        !self.sections.is_empty() && self.sections.values().all(SectionProgress::is_passed)
    }

    /// Reset every entry to defaults while keeping the keys.
    pub fn reset(&mut self) {
        for progress in self.sections.values_mut() {
            *progress = SectionProgress::default();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SectionId, &SectionProgress)> {
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

fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<SectionId> {
        names.iter().map(|n| SectionId::new(*n)).collect()
    }

    fn synced(names: &[&str]) -> OverallProgress {
        let mut progress = OverallProgress::new();
        progress.sync_sections(&ids(names));
        progress
    }

    #[test]
    fn sync_merges_without_overwriting() {
        let mut progress = synced(&["a"]);
        progress.apply_score(&SectionId::new("a"), 95.0).unwrap();

        let report = progress.sync_sections(&ids(&["a", "b"]));

        assert_eq!(report.inserted, ids(&["b"]));
        assert!(progress.get(&SectionId::new("a")).unwrap().is_passed());
        assert_eq!(
            progress.get(&SectionId::new("b")),
            Some(&SectionProgress::default())
        );
    }

    #[test]
    fn sync_drops_unknown_sections() {
        let mut progress = synced(&["a", "old"]);
        let report = progress.sync_sections(&ids(&["a"]));
        assert_eq!(report.dropped, ids(&["old"]));
        assert_eq!(progress.len(), 1);
        assert!(progress.sync_sections(&ids(&["a"])).is_noop());
    }

    #[test]
    fn first_completion_below_threshold_is_recorded() {
        let mut progress = synced(&["a"]);
        let applied = progress.apply_score(&SectionId::new("a"), 70.0).unwrap();
        assert!(applied.is_updated());
        let after = applied.current();
        assert!(after.completed);
        assert!(!after.high_score_achieved);
        assert!((after.highest_score - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn repeat_below_threshold_is_unchanged() {
        let mut progress = synced(&["a"]);
        let a = SectionId::new("a");
        progress.apply_score(&a, 70.0).unwrap();
        let applied = progress.apply_score(&a, 80.0).unwrap();
        assert!(!applied.is_updated());
        assert!((applied.current().highest_score - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut progress = synced(&["a"]);
        let a = SectionId::new("a");
        progress.apply_score(&a, 89.9).unwrap();
        let applied = progress.apply_score(&a, 90.0).unwrap();
        assert!(applied.newly_high_score());
    }

    #[test]
    fn idempotent_after_high_score() {
        let mut progress = synced(&["a"]);
        let a = SectionId::new("a");
        progress.apply_score(&a, 92.0).unwrap();
        for score in [92.0, 85.0, 100.0] {
            let applied = progress.apply_score(&a, score).unwrap();
            assert!(!applied.is_updated());
        }
        let current = progress.get(&a).unwrap();
        assert!((current.highest_score - 92.0).abs() < f64::EPSILON);
        assert!(current.high_score_achieved);
    }

    #[test]
    fn scores_are_clamped() {
        let mut progress = synced(&["a"]);
        let applied = progress.apply_score(&SectionId::new("a"), 120.0).unwrap();
        assert!((applied.current().highest_score - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_section_is_an_error() {
        let mut progress = synced(&["a"]);
        let err = progress.apply_score(&SectionId::new("z"), 95.0).unwrap_err();
        assert_eq!(err, ProgressError::UnknownSection(SectionId::new("z")));
    }

    #[test]
    fn reveal_level_floors_and_is_monotonic() {
        let mut progress = synced(&["a", "b", "c"]);
        let mut levels = vec![progress.reveal_level()];
        for (id, score) in [("a", 95.0), ("a", 50.0), ("b", 60.0), ("b", 91.0), ("c", 99.0)] {
            progress.apply_score(&SectionId::new(id), score).unwrap();
            levels.push(progress.reveal_level());
        }
        assert_eq!(levels, vec![0, 33, 33, 33, 66, 100]);
        assert!(levels.windows(2).all(|w| w[0] <= w[1]));
        assert!(progress.all_completed());
    }

    #[test]
    fn empty_progress_is_not_completed() {
        let progress = OverallProgress::new();
        assert_eq!(progress.reveal_level(), 0);
        assert!(!progress.all_completed());
    }

    #[test]
    fn persisted_layout_is_camel_case_with_defaults() {
        let progress = synced(&["a"]);
        let json = serde_json::to_string(&progress).unwrap();
        assert_eq!(
            json,
            r#"{"a":{"completed":false,"highScoreAchieved":false,"highestScore":0.0}}"#
        );

        let legacy: OverallProgress = serde_json::from_str(r#"{"a":{"completed":true}}"#).unwrap();
        let entry = legacy.get(&SectionId::new("a")).unwrap();
        assert!(entry.completed);
        assert!(!entry.high_score_achieved);
    }
}
