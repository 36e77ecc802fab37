//! Typing-speed jitter sources.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of per-character delay variation.
pub trait Jitter: Send {
    /// Sample an offset in milliseconds within `[-spread_ms, +spread_ms]`.
    fn sample(&mut self, spread_ms: u64) -> i64;
}

/// Uniform random jitter.
#[derive(Debug)]
pub struct RandomJitter {
    rng: StdRng,
}

impl RandomJitter {
    /// Seeded from the OS.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomJitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Jitter for RandomJitter {
    fn sample(&mut self, spread_ms: u64) -> i64 {
        if spread_ms == 0 {
            return 0;
        }
        let spread = i64::try_from(spread_ms).unwrap_or(i64::MAX);
        self.rng.gen_range(-spread..=spread)
    }
}

/// No variation; every character uses its base delay.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoJitter;

impl Jitter for NoJitter {
    fn sample(&mut self, _spread_ms: u64) -> i64 {
        0
    }
}

/// Constant offset, clamped to the requested spread.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub i64);

impl Jitter for FixedJitter {
    fn sample(&mut self, spread_ms: u64) -> i64 {
        let spread = i64::try_from(spread_ms).unwrap_or(i64::MAX);
        self.0.clamp(-spread, spread)
    }
}
