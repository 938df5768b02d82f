//! A single word card.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Hidden role of a card, assigned once at grid creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardRole {
    /// An uninvolved word.
    Civilian,
    /// A word the spies are trying to find.
    SpyTarget,
    /// A word the counterspies are trying to steer the vote towards.
    CounterspyTarget,
}

/// A word card on the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub(crate) word: String,
    pub(crate) role: CardRole,
    pub(crate) revealed: bool,
    pub(crate) votes: BTreeSet<String>,
}

impl Card {
    pub(crate) fn new(word: String) -> Self {
        Self {
            word,
            role: CardRole::Civilian,
            revealed: false,
            votes: BTreeSet::new(),
        }
    }

    /// The word printed on the card.
    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }

    /// The hidden role of the card.
    #[must_use]
    pub fn role(&self) -> CardRole {
        self.role
    }

    /// Whether the card has been revealed by a vote.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Number of distinct voters in the current round.
    #[must_use]
    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }
}
