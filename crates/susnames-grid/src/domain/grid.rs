//! The 25-card word grid.

use std::collections::HashSet;

use susnames_core::rng::DeterministicRng;
use susnames_core::sampling::sample_indices;

use super::card::{Card, CardRole};
use super::errors::GridError;

/// Number of cards on every grid.
pub const GRID_SIZE: usize = 25;

/// A fixed-size, order-preserving board of cards. A card's position is the
/// address clients use to vote for it.
#[derive(Debug, Clone)]
pub struct WordGrid {
    cards: Vec<Card>,
}

impl WordGrid {
    /// Builds a grid from `words` in order and assigns `spy_targets` spy
    /// targets and then `counterspy_targets` counterspy targets among the
    /// civilian cards, uniformly at random.
    ///
    /// The caller is expected to reseed `rng` immediately beforehand.
    ///
    /// # Errors
    ///
    /// Returns `GridError::WrongWordCount` or `GridError::DuplicateWord` if
    /// `words` is not 25 distinct strings, and
    /// `GridError::InvalidTargetCounts` if the targets exceed the grid.
    pub fn create(
        words: Vec<String>,
        spy_targets: usize,
        counterspy_targets: usize,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Self, GridError> {
        if words.len() != GRID_SIZE {
            return Err(GridError::WrongWordCount {
                expected: GRID_SIZE,
                actual: words.len(),
            });
        }
        let mut seen = HashSet::with_capacity(GRID_SIZE);
        for word in &words {
            if !seen.insert(word.as_str()) {
                return Err(GridError::DuplicateWord(word.clone()));
            }
        }
        if spy_targets + counterspy_targets > GRID_SIZE {
            return Err(GridError::InvalidTargetCounts {
                spy: spy_targets,
                counterspy: counterspy_targets,
                size: GRID_SIZE,
            });
        }

        let mut cards: Vec<Card> = words.into_iter().map(Card::new).collect();

        for index in sample_indices(&cards, spy_targets, rng, is_civilian) {
            cards[index].role = CardRole::SpyTarget;
        }
        for index in sample_indices(&cards, counterspy_targets, rng, is_civilian) {
            cards[index].role = CardRole::CounterspyTarget;
        }

        Ok(Self { cards })
    }

    /// All cards in grid order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// The card at `index`, if in range.
    #[must_use]
    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    /// Number of cards holding `role`.
    #[must_use]
    pub fn count_role(&self, role: CardRole) -> usize {
        self.cards.iter().filter(|card| card.role == role).count()
    }

    /// Records a vote by `voter_id` for the card at `index`.
    ///
    /// Returns `Ok(false)` if the voter had already voted for this card.
    ///
    /// # Errors
    ///
    /// Returns `GridError::OutOfRange` for a bad index and
    /// `GridError::AlreadyRevealed` for a revealed card.
    pub fn vote_card(&mut self, index: usize, voter_id: &str) -> Result<bool, GridError> {
        let card = self.open_card(index)?;
        if card.votes.contains(voter_id) {
            return Ok(false);
        }
        card.votes.insert(voter_id.to_owned());
        Ok(true)
    }

    /// Withdraws a vote by `voter_id` from the card at `index`.
    ///
    /// Returns `Ok(false)` if the voter had not voted for this card.
    ///
    /// # Errors
    ///
    /// Same as [`WordGrid::vote_card`].
    pub fn unvote_card(&mut self, index: usize, voter_id: &str) -> Result<bool, GridError> {
        let card = self.open_card(index)?;
        Ok(card.votes.remove(voter_id))
    }

    /// Clears every card's votes. Called at the start of each voting round.
    pub fn reset_votes(&mut self) {
        for card in &mut self.cards {
            card.votes.clear();
        }
    }

    /// Reveals the card with the strictly highest vote count; ties go to the
    /// lowest index. Returns the revealed card's index and role.
    ///
    /// # Errors
    ///
    /// Returns `GridError::NoVotesCast` if no card has any votes.
    pub fn evaluate_vote(&mut self) -> Result<(usize, CardRole), GridError> {
        let mut best: Option<(usize, usize)> = None;
        for (index, card) in self.cards.iter().enumerate() {
            let votes = card.votes.len();
            if votes > best.map_or(0, |(_, most)| most) {
                best = Some((index, votes));
            }
        }

        let (index, _) = best.ok_or(GridError::NoVotesCast)?;
        let card = &mut self.cards[index];
        card.revealed = true;
        Ok((index, card.role))
    }

    fn open_card(&mut self, index: usize) -> Result<&mut Card, GridError> {
        let card = self
            .cards
            .get_mut(index)
            .ok_or(GridError::OutOfRange(index))?;
        if card.revealed {
            return Err(GridError::AlreadyRevealed(index));
        }
        Ok(card)
    }
}

fn is_civilian(card: &Card) -> bool {
    card.role == CardRole::Civilian
}
