//! Per-viewer snapshots handed to a [`RoomRenderer`](crate::RoomRenderer).
//!
//! Hidden information is stripped here, before rendering: card roles are
//! visible only to the spymaster (or once revealed), the clue's match count
//! only to guessers, and a counterspy appears as a plain spy to everyone but
//! themself.

use serde::Serialize;
use susnames_grid::{Card, CardRole, WordGrid};

use super::game::{Clue, GameSnapshot, Turn};
use super::player::{Player, Role};

/// A player as listed to other players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    /// Session identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Role as the viewer is allowed to see it.
    pub role: Role,
}

impl PlayerSummary {
    pub(crate) fn of(player: &Player) -> Self {
        Self {
            id: player.id().to_owned(),
            name: player.name().to_owned(),
            role: player.role(),
        }
    }

    /// This entry as shown to the player `viewer_id`.
    #[must_use]
    pub fn as_seen_by(&self, viewer_id: &str) -> Self {
        let role = if self.role == Role::Counterspy && self.id != viewer_id {
            Role::Spy
        } else {
            self.role
        };
        Self {
            role,
            ..self.clone()
        }
    }
}

/// The player list as shown to `viewer`.
#[must_use]
pub fn player_list_for(viewer: &PlayerSummary, players: &[PlayerSummary]) -> Vec<PlayerSummary> {
    players.iter().map(|p| p.as_seen_by(&viewer.id)).collect()
}

/// One card as a particular viewer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    /// Grid position.
    pub index: usize,
    /// The word.
    pub word: String,
    /// Hidden role, present only when the viewer may see it.
    pub role: Option<CardRole>,
    /// Whether the card has been revealed.
    pub revealed: bool,
    /// Votes cast for the card this round.
    pub votes: usize,
}

impl CardView {
    fn for_role(index: usize, card: &Card, viewer: Role) -> Self {
        let visible = card.is_revealed() || viewer == Role::Spymaster;
        Self {
            index,
            word: card.word().to_owned(),
            role: visible.then(|| card.role()),
            revealed: card.is_revealed(),
            votes: card.vote_count(),
        }
    }
}

/// The current clue as a particular viewer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClueView {
    /// The clue word.
    pub word: String,
    /// How many cards the clue targets; guessers only.
    pub match_count: Option<u32>,
}

impl ClueView {
    pub(crate) fn for_role(clue: &Clue, viewer: Role) -> Self {
        Self {
            word: clue.word.clone(),
            match_count: viewer.is_guesser().then_some(clue.match_count),
        }
    }
}

/// Game state as a particular viewer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameView {
    /// Whose move it is.
    pub turn: Turn,
    /// The clue under consideration; only during the guessers' turn.
    pub clue: Option<ClueView>,
    /// All 25 cards in grid order.
    pub grid: Vec<CardView>,
    /// Distinct guessers who asked to end the round early.
    pub end_voting_votes: usize,
    /// Early-end votes needed to close the round.
    pub end_voting_threshold: usize,
    /// Clue rounds played in this room so far.
    pub voting_round: u64,
    /// Whether the viewer may suggest a clue right now.
    pub can_suggest_clue: bool,
}

impl GameView {
    /// Builds the view of `grid` for a viewer holding `viewer` role.
    pub(crate) fn for_role(snapshot: &GameSnapshot, grid: &WordGrid, viewer: Role) -> Self {
        let clue = match snapshot.turn {
            Turn::Spy => snapshot
                .clue
                .as_ref()
                .map(|clue| ClueView::for_role(clue, viewer)),
            Turn::Spymaster => None,
        };

        Self {
            turn: snapshot.turn,
            clue,
            grid: grid
                .cards()
                .iter()
                .enumerate()
                .map(|(index, card)| CardView::for_role(index, card, viewer))
                .collect(),
            end_voting_votes: snapshot.end_voting_votes,
            end_voting_threshold: snapshot.end_voting_threshold,
            voting_round: snapshot.voting_round,
            can_suggest_clue: viewer == Role::Spymaster && snapshot.turn == Turn::Spymaster,
        }
    }
}
