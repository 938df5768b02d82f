//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// Every failure in the room engine is contained to the room or connection
/// involved; none of these variants is fatal to the process.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed input: a bad card index, a missing or unparsable command
    /// field, an invalid grid configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// The action is well-formed but not allowed right now: wrong turn,
    /// wrong role, or a room name that kept colliding.
    #[error("state conflict: {0}")]
    Conflict(String),

    /// An unknown room or player session.
    #[error("not found: {0}")]
    NotFound(String),
}
