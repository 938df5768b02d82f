//! Grid domain model.

pub mod card;
pub mod errors;
pub mod grid;
