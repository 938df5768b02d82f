//! JSON rendering of room updates.
//!
//! Every payload is a JSON object tagged by `type`:
//!
//! - `{"type":"player-list","you":{..},"players":[..]}`
//! - `{"type":"game-state","you":{..},"turn":"spy","clue":{..},"grid":[..],..}`
//! - `{"type":"clue","word":"ocean","match_count":3}`

use serde::Serialize;
use susnames_room::{ClueView, GameView, PlayerSummary, RoomRenderer};
use tracing::warn;

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum Frame<'a> {
    PlayerList {
        you: &'a PlayerSummary,
        players: &'a [PlayerSummary],
    },
    GameState {
        you: &'a PlayerSummary,
        #[serde(flatten)]
        game: &'a GameView,
    },
    Clue {
        #[serde(flatten)]
        clue: &'a ClueView,
    },
}

/// Renders room updates as JSON text frames.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

impl JsonRenderer {
    fn encode(frame: &Frame<'_>) -> String {
        serde_json::to_string(frame).unwrap_or_else(|err| {
            warn!(error = %err, "failed to encode frame");
            r#"{"type":"error"}"#.to_string()
        })
    }
}

impl RoomRenderer for JsonRenderer {
    fn render_player_list(&self, viewer: &PlayerSummary, players: &[PlayerSummary]) -> String {
        Self::encode(&Frame::PlayerList {
            you: viewer,
            players,
        })
    }

    fn render_game_state(&self, viewer: &PlayerSummary, game: &GameView) -> String {
        Self::encode(&Frame::GameState { you: viewer, game })
    }

    fn render_clue(&self, _viewer: &PlayerSummary, clue: &ClueView) -> String {
        Self::encode(&Frame::Clue { clue })
    }
}
