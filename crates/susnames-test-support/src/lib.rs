//! Shared test doubles for the Susnames room engine.

mod clock;
mod rng;

pub use clock::FixedClock;
pub use rng::{MockRng, SequenceRng};
