//! Susnames: word grid.
//!
//! Owns the 25-card word pool, the hidden role of each card, and the
//! per-card vote tallies of the current voting round. The grid knows nothing
//! about players or networking and holds no lock of its own; the owning room
//! serialises access.

pub mod domain;
pub mod words;

pub use domain::card::{Card, CardRole};
pub use domain::errors::GridError;
pub use domain::grid::{GRID_SIZE, WordGrid};
