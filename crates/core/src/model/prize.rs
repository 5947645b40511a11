use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::random::RandomSource;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PrizeError {
    #[error("prize wheel needs at least one prize")]
    EmptyWheel,

    #[error("first-draw pool cannot be empty")]
    EmptyFirstDrawPool,

    #[error("first-draw prize {0} is not on the wheel")]
    NotOnWheel(Prize),

    #[error("prize wheel is locked until every section is passed")]
    Locked,
}

/// Label of a prize on the wheel.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prize(String);

impl Prize {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Prize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Prize({})", self.0)
    }
}

impl fmt::Display for Prize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of one spin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinOutcome {
    /// Where the wheel stopped this time.
    pub landed: Prize,
    /// The prize the user keeps; fixed by the first spin.
    pub kept: Prize,
    pub first_draw: bool,
}

/// Prize wheel with a restricted pool for the first draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrizeWheel {
    prizes: Vec<Prize>,
    first_draw_pool: Vec<Prize>,
}

impl PrizeWheel {
    /// # Errors
    ///
    /// Returns `PrizeError` if either list is empty or the first-draw pool
    /// contains a prize that is not on the wheel.
    pub fn new(prizes: Vec<Prize>, first_draw_pool: Vec<Prize>) -> Result<Self, PrizeError> {
        if prizes.is_empty() {
            return Err(PrizeError::EmptyWheel);
        }
        if first_draw_pool.is_empty() {
            return Err(PrizeError::EmptyFirstDrawPool);
        }
        if let Some(missing) = first_draw_pool.iter().find(|p| !prizes.contains(p)) {
            return Err(PrizeError::NotOnWheel(missing.clone()));
        }
        Ok(Self {
            prizes,
            first_draw_pool,
        })
    }

    #[must_use]
    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    #[must_use]
    pub fn first_draw_pool(&self) -> &[Prize] {
        &self.first_draw_pool
    }

    /// Spin the wheel.
    ///
    /// Without a stored prize the draw comes from the first-draw pool and becomes
    /// the kept prize. Otherwise the draw uses the whole wheel and `stored` stays kept.
    pub fn spin(&self, stored: Option<&Prize>, rng: &mut dyn RandomSource) -> SpinOutcome {
        match stored {
            None => {
                let landed = pick(&self.first_draw_pool, rng);
                SpinOutcome {
                    kept: landed.clone(),
                    landed,
                    first_draw: true,
                }
            }
            Some(kept) => SpinOutcome {
                landed: pick(&self.prizes, rng),
                kept: kept.clone(),
                first_draw: false,
            },
        }
    }
}

fn pick(pool: &[Prize], rng: &mut dyn RandomSource) -> Prize {
    // Pools are validated non-empty; the modulo guards a misbehaving source.
    let index = rng.pick_index(pool.len()) % pool.len();
    pool[index].clone()
}
