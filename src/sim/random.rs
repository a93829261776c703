//! Injectable randomness
//!
//! Every sampling decision in the simulation draws from a [`RandomSource`].
//! Any `rand::Rng` works (thread RNG in play, seeded `Pcg32` in tests), and
//! [`Scripted`] replays a fixed sequence when a test needs exact outcomes.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniform integers
pub trait RandomSource {
    /// Uniform integer in `0..bound`; `bound` must be positive
    fn below(&mut self, bound: u32) -> u32;

    /// Uniform integer in `lo..=hi`
    fn between(&mut self, lo: i32, hi: i32) -> i32;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn below(&mut self, bound: u32) -> u32 {
        self.random_range(0..bound)
    }

    fn between(&mut self, lo: i32, hi: i32) -> i32 {
        self.random_range(lo..=hi)
    }
}

/// Seeded generator for reproducible runs
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Replays a fixed list of raw values, cycling when exhausted
#[derive(Debug, Clone)]
pub struct Scripted {
    values: Vec<u32>,
    cursor: usize,
}

impl Scripted {
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    fn next_raw(&mut self) -> u32 {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

impl RandomSource for Scripted {
    fn below(&mut self, bound: u32) -> u32 {
        self.next_raw() % bound.max(1)
    }

    fn between(&mut self, lo: i32, hi: i32) -> i32 {
        let span = (hi - lo).max(0) as u32 + 1;
        lo + (self.next_raw() % span) as i32
    }
}
