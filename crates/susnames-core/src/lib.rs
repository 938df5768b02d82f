//! Susnames Core: shared domain abstractions.
//!
//! This crate defines the error type, the time and randomness seams, and the
//! sampling utility that the grid and room crates build on. It contains no
//! networking code.

pub mod clock;
pub mod error;
pub mod names;
pub mod rng;
pub mod sampling;
