//! Reward unlock stages derived from overall progress.

use crate::model::{OverallProgress, SectionId};

/// Unlock stage of the picture reward.
///
/// Moves only forward: `Locked` → `PartiallyUnlocked` → `FullyUnlocked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RewardStage {
    Locked,
    PartiallyUnlocked,
    FullyUnlocked,
}

impl RewardStage {
    #[must_use]
    pub fn from_reveal_level(level: u8) -> Self {
        match level {
            0 => RewardStage::Locked,
            100..=u8::MAX => RewardStage::FullyUnlocked,
            _ => RewardStage::PartiallyUnlocked,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, RewardStage::FullyUnlocked)
    }
}

/// Reward-relevant view of progress at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardSnapshot {
    pub reveal_level: u8,
    pub all_completed: bool,
}

impl RewardSnapshot {
    #[must_use]
    pub fn of(progress: &OverallProgress) -> Self {
        Self {
            reveal_level: progress.reveal_level(),
            all_completed: progress.all_completed(),
        }
    }

    #[must_use]
    pub fn stage(&self) -> RewardStage {
        if self.all_completed {
            RewardStage::FullyUnlocked
        } else {
            RewardStage::from_reveal_level(self.reveal_level)
        }
    }
}

/// Notification produced by a score submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewardEvent {
    /// The very first piece of the reward was revealed.
    FirstUnlock { section: SectionId, reveal_level: u8 },
    /// Another piece was revealed, short of the full reward.
    PieceUnlocked { section: SectionId, from: u8, to: u8 },
    /// Every section is passed; the terminal reward is available.
    AllUnlocked { section: SectionId },
}

/// Decide which notification, if any, a submission earns.
///
/// `before` must be captured before the update and `after` taken from the
/// update's own result. At most one event is returned: the terminal unlock wins,
/// then the first unlock, then an incremental piece.
#[must_use]
pub fn reward_event(
    section: &SectionId,
    before: RewardSnapshot,
    after: RewardSnapshot,
    was_high_score: bool,
    is_high_score: bool,
) -> Option<RewardEvent> {
    if after.all_completed && !before.all_completed {
        return Some(RewardEvent::AllUnlocked {
            section: section.clone(),
        });
    }

    let newly_high = !was_high_score && is_high_score;
    if newly_high && before.reveal_level == 0 {
        return Some(RewardEvent::FirstUnlock {
            section: section.clone(),
            reveal_level: after.reveal_level,
        });
    }

    if after.reveal_level > before.reveal_level {
        return Some(RewardEvent::PieceUnlocked {
            section: section.clone(),
            from: before.reveal_level,
            to: after.reveal_level,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(reveal_level: u8, all_completed: bool) -> RewardSnapshot {
        RewardSnapshot {
            reveal_level,
            all_completed,
        }
    }

    #[test]
    fn stages_follow_reveal_level() {
        assert_eq!(RewardStage::from_reveal_level(0), RewardStage::Locked);
        assert_eq!(
            RewardStage::from_reveal_level(33),
            RewardStage::PartiallyUnlocked
        );
        assert_eq!(
            RewardStage::from_reveal_level(100),
            RewardStage::FullyUnlocked
        );
        assert!(RewardStage::Locked < RewardStage::FullyUnlocked);
    }

    #[test]
    fn first_pass_is_first_unlock_only() {
        let s = SectionId::new("a");
        let event = reward_event(&s, snap(0, false), snap(33, false), false, true);
        assert_eq!(
            event,
            Some(RewardEvent::FirstUnlock {
                section: s,
                reveal_level: 33
            })
        );
    }

    #[test]
    fn later_pass_is_a_piece() {
        let s = SectionId::new("b");
        let event = reward_event(&s, snap(33, false), snap(66, false), false, true);
        assert_eq!(
            event,
            Some(RewardEvent::PieceUnlocked {
                section: s,
                from: 33,
                to: 66
            })
        );
    }

    #[test]
    fn terminal_pass_is_all_unlocked() {
        let s = SectionId::new("c");
        let event = reward_event(&s, snap(66, false), snap(100, true), false, true);
        assert_eq!(event, Some(RewardEvent::AllUnlocked { section: s }));
    }

    #[test]
    fn single_section_first_pass_is_terminal() {
        let s = SectionId::new("only");
        let event = reward_event(&s, snap(0, false), snap(100, true), false, true);
        assert_eq!(event, Some(RewardEvent::AllUnlocked { section: s }));
    }

    #[test]
    fn retry_after_pass_is_silent() {
        let s = SectionId::new("a");
        assert_eq!(
            reward_event(&s, snap(33, false), snap(33, false), true, true),
            None
        );
        assert_eq!(
            reward_event(&s, snap(100, true), snap(100, true), true, true),
            None
        );
    }
}
