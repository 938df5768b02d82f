//! Random number generator abstraction for determinism.
//!
//! In production, this wraps a real RNG. In tests, a seeded or scripted
//! implementation is injected.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;

    /// Replace the generator state with one derived from `seed`.
    fn reseed(&mut self, seed: u64);
}

/// Production RNG backed by [`StdRng`].
#[derive(Debug)]
pub struct StdRandom {
    inner: StdRng,
}

impl StdRandom {
    /// Create an RNG seeded from the operating system.
    #[must_use]
    pub fn from_os() -> Self {
        Self {
            inner: StdRng::from_os_rng(),
        }
    }

    /// Create an RNG with a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }
}

impl DeterministicRng for StdRandom {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.inner.random_range(min..=max)
    }

    fn reseed(&mut self, seed: u64) {
        self.inner = StdRng::seed_from_u64(seed);
    }
}
