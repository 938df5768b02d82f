//! Per-room game state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use susnames_grid::WordGrid;

use crate::application::timer::DeferredAction;

/// Whose move it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Turn {
    /// The spymaster is choosing a clue.
    #[default]
    Spymaster,
    /// Guessers are voting on the current clue.
    Spy,
}

/// A clue given by the spymaster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clue {
    /// The clue word.
    pub word: String,
    /// Number of cards the clue is meant to match.
    pub match_count: u32,
}

/// Number of distinct guessers that must vote to end a clue round early.
///
/// `min(counterspies + 2, guessers)`, never below one, so that at least two
/// genuine spies must agree whenever the table is large enough.
#[must_use]
pub fn end_voting_threshold(counterspies: usize, guessers: usize) -> usize {
    (counterspies + 2).min(guessers).max(1)
}

/// Mutable game state, guarded by the room's game-state lock.
///
/// Rebuilt from scratch on every game start; only the per-room policy
/// values (`counterspy_count`, `end_voting_threshold`) and the round counter
/// carry over.
#[derive(Debug, Default)]
pub(crate) struct GameState {
    pub started: bool,
    pub turn: Turn,
    pub clue: Option<Clue>,
    pub grid: Option<WordGrid>,
    pub vote_timer: Option<DeferredAction>,
    pub end_voting_votes: BTreeSet<String>,
    /// Increments with every clue; a timer only acts on the round it was
    /// armed for.
    pub voting_round: u64,
    pub counterspy_count: Option<usize>,
    pub end_voting_threshold: Option<usize>,
    /// Increments with every game start. Roles dealt at a start carry the
    /// same number, so a role read before a restart can be told apart.
    pub deal: u64,
}

impl GameState {
    /// A freshly started game that keeps this room's policy values.
    pub fn restarted(&self, grid: WordGrid) -> Self {
        Self {
            started: true,
            turn: Turn::Spymaster,
            grid: Some(grid),
            voting_round: self.voting_round,
            counterspy_count: self.counterspy_count,
            end_voting_threshold: self.end_voting_threshold,
            deal: self.deal + 1,
            ..Self::default()
        }
    }

    /// Cancels the armed vote timer, if any.
    pub fn disarm_timer(&mut self) {
        if let Some(timer) = self.vote_timer.take() {
            timer.cancel();
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            turn: self.turn,
            clue: self.clue.clone(),
            grid: self.grid.clone(),
            end_voting_votes: self.end_voting_votes.len(),
            end_voting_threshold: self.end_voting_threshold.unwrap_or(1),
            voting_round: self.voting_round,
        }
    }
}

/// Copy of the game state taken under the lock, rendered after release.
#[derive(Debug, Clone)]
pub(crate) struct GameSnapshot {
    pub turn: Turn,
    pub clue: Option<Clue>,
    pub grid: Option<WordGrid>,
    pub end_voting_votes: usize,
    pub end_voting_threshold: usize,
    pub voting_round: u64,
}
