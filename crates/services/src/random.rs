use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use quiz_core::RandomSource;

/// Randomness from the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        rand::rng().random_range(0..len)
    }
}

/// Reproducible randomness for tests and replays.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.random_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_sources_repeat() {
        let mut a = SeededRandom::new(7);
        let mut b = SeededRandom::new(7);
        let left: Vec<usize> = (0..16).map(|_| a.pick_index(10)).collect();
        let right: Vec<usize> = (0..16).map(|_| b.pick_index(10)).collect();
        assert_eq!(left, right);
        assert!(left.iter().all(|i| *i < 10));
    }

    #[test]
    fn thread_random_stays_in_range() {
        let mut rng = ThreadRandom;
        for _ in 0..32 {
            assert!(rng.pick_index(3) < 3);
        }
        assert_eq!(rng.pick_index(0), 0);
    }
}
