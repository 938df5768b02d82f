//! Test RNG: deterministic `DeterministicRng` implementations for tests.

use susnames_core::rng::DeterministicRng;

/// A no-op RNG that always returns `min` for `next_u32_range`. Every sampling
/// draw therefore picks the first eligible item.
#[derive(Debug, Default)]
pub struct MockRng {
    reseeds: usize,
    last_seed: Option<u64>,
}

impl MockRng {
    /// Number of times `reseed` has been called.
    #[must_use]
    pub fn reseed_count(&self) -> usize {
        self.reseeds
    }

    /// The seed passed to the most recent `reseed`.
    #[must_use]
    pub fn last_seed(&self) -> Option<u64> {
        self.last_seed
    }
}

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }

    fn reseed(&mut self, seed: u64) {
        self.reseeds += 1;
        self.last_seed = Some(seed);
    }
}

/// An RNG that returns values from a predetermined sequence, then falls back
/// to `min` once the sequence is exhausted. Used in tests that need specific,
/// repeatable draws (e.g., which card becomes a spy target).
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    index: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` with the given values.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, index: 0 }
    }

    /// Number of scripted values consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.index.min(self.values.len())
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        let value = self.values.get(self.index).copied().unwrap_or(min);
        self.index += 1;
        value
    }

    fn reseed(&mut self, _seed: u64) {}
}
