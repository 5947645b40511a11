use chrono::{DateTime, Duration, Utc};

/// Time source for quiz sessions; fixed in tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn system() -> Self {
        Self::System
    }

    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Time since `start`, never negative.
    #[must_use]
    pub fn elapsed_since(&self, start: DateTime<Utc>) -> Duration {
        (self.now() - start).max(Duration::zero())
    }
}

/// Format an elapsed duration as `mm:ss`, or `h:mm:ss` past one hour.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_measures_from_start() {
        let clock = Clock::fixed(fixed_now() + Duration::seconds(75));
        assert_eq!(clock.elapsed_since(fixed_now()), Duration::seconds(75));
    }

    #[test]
    fn elapsed_is_never_negative() {
        let clock = fixed_clock();
        let later = fixed_now() + Duration::minutes(1);
        assert_eq!(clock.elapsed_since(later), Duration::zero());
    }

    #[test]
    fn formats_elapsed() {
        assert_eq!(format_elapsed(Duration::seconds(5)), "00:05");
        assert_eq!(format_elapsed(Duration::seconds(754)), "12:34");
        assert_eq!(format_elapsed(Duration::seconds(3_725)), "1:02:05");
    }
}
