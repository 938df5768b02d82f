//! Rendering seam between the room and its transport.

use crate::domain::view::{ClueView, GameView, PlayerSummary};

/// Turns per-viewer snapshots into the text payloads queued for a player.
///
/// The room never formats output itself; the HTTP layer supplies an
/// implementation when it builds the registry. Every method receives the
/// viewer so an implementation can personalise the payload further.
pub trait RoomRenderer: Send + Sync {
    /// Renders the room's player list.
    fn render_player_list(&self, viewer: &PlayerSummary, players: &[PlayerSummary]) -> String;

    /// Renders the game state.
    fn render_game_state(&self, viewer: &PlayerSummary, game: &GameView) -> String;

    /// Renders a freshly suggested clue.
    fn render_clue(&self, viewer: &PlayerSummary, clue: &ClueView) -> String;
}
