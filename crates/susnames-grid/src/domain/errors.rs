//! Grid error types.

use susnames_core::error::DomainError;
use thiserror::Error;

/// Failures raised by grid operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The card index is not in `[0, 25)`.
    #[error("card index {0} out of range")]
    OutOfRange(usize),

    /// The card has already been revealed.
    #[error("card at index {0} already revealed")]
    AlreadyRevealed(usize),

    /// Every card finished the round with zero votes.
    #[error("no card received a vote in the voting round")]
    NoVotesCast,

    /// The requested target counts do not fit on the grid.
    #[error("{spy} spy targets and {counterspy} counterspy targets exceed {size} cards")]
    InvalidTargetCounts {
        /// Requested spy-target count.
        spy: usize,
        /// Requested counterspy-target count.
        counterspy: usize,
        /// Cards on the grid.
        size: usize,
    },

    /// The grid was built from the wrong number of words.
    #[error("expected {expected} words, got {actual}")]
    WrongWordCount {
        /// Words required.
        expected: usize,
        /// Words supplied.
        actual: usize,
    },

    /// The same word was supplied twice.
    #[error("duplicate word on grid: {0}")]
    DuplicateWord(String),
}

impl From<GridError> for DomainError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::NoVotesCast => DomainError::Conflict(err.to_string()),
            _ => DomainError::Validation(err.to_string()),
        }
    }
}
