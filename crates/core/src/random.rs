/// Source of randomness for prize draws.
///
/// Kept as a port so callers can swap in a deterministic source.
pub trait RandomSource: Send {
    /// Returns an index in `0..len`. `len` is always non-zero.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Replays a fixed script of indices, wrapping around; each value is reduced modulo `len`.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    script: Vec<usize>,
    cursor: usize,
}

impl ScriptedRandom {
    #[must_use]
    pub fn new(script: Vec<usize>) -> Self {
        Self { script, cursor: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        if self.script.is_empty() || len == 0 {
            return 0;
        }
        let value = self.script[self.cursor % self.script.len()];
        self.cursor = self.cursor.wrapping_add(1);
        value % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_wraps_and_reduces() {
        let mut rng = ScriptedRandom::new(vec![1, 7]);
        assert_eq!(rng.pick_index(4), 1);
        assert_eq!(rng.pick_index(4), 3);
        assert_eq!(rng.pick_index(4), 1);
    }
}
