//! Fixtures shared by this crate's unit tests.

use std::sync::Arc;

use parking_lot::Mutex;
use susnames_core::rng::DeterministicRng;
use susnames_test_support::{FixedClock, MockRng};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::application::render::RoomRenderer;
use crate::application::room::{Room, RoomServices, RoomSettings};
use crate::domain::game::Turn;
use crate::domain::player::{Message, Player};
use crate::domain::view::{ClueView, GameView, PlayerSummary};

/// Renders compact one-line tags that tests can compare directly:
///
/// - `players a=spymaster,b=spy`
/// - `game spy round=1 votes=0/3`
/// - `clue ocean 3` (or `clue ocean ?` when the count is redacted)
pub(crate) struct TagRenderer;

impl RoomRenderer for TagRenderer {
    fn render_player_list(&self, _viewer: &PlayerSummary, players: &[PlayerSummary]) -> String {
        let entries: Vec<String> = players
            .iter()
            .map(|p| format!("{}={}", p.id, p.role))
            .collect();
        format!("players {}", entries.join(","))
    }

    fn render_game_state(&self, _viewer: &PlayerSummary, game: &GameView) -> String {
        let turn = match game.turn {
            Turn::Spymaster => "spymaster",
            Turn::Spy => "spy",
        };
        format!(
            "game {turn} round={} votes={}/{}",
            game.voting_round, game.end_voting_votes, game.end_voting_threshold
        )
    }

    fn render_clue(&self, _viewer: &PlayerSummary, clue: &ClueView) -> String {
        let count = clue
            .match_count
            .map_or_else(|| "?".to_owned(), |n| n.to_string());
        format!("clue {} {count}", clue.word)
    }
}

pub(crate) fn services() -> RoomServices {
    RoomServices::new(
        Arc::new(TagRenderer),
        MockRng::default(),
        Arc::new(FixedClock::standard()),
    )
}

pub(crate) fn room() -> Arc<Room> {
    room_with(RoomSettings::default())
}

pub(crate) fn room_with(settings: RoomSettings) -> Arc<Room> {
    Room::new("test-room".to_owned(), settings, services())
}

/// A default room whose `MockRng` stays visible to the test.
pub(crate) fn room_with_rng() -> (Arc<Room>, Arc<Mutex<MockRng>>) {
    let rng = Arc::new(Mutex::new(MockRng::default()));
    let shared: Arc<Mutex<dyn DeterministicRng>> = rng.clone();
    let services = RoomServices {
        renderer: Arc::new(TagRenderer),
        rng: shared,
        clock: Arc::new(FixedClock::standard()),
    };
    let room = Room::new("test-room".to_owned(), RoomSettings::default(), services);
    (room, rng)
}

/// A standalone player with its own queue of `capacity`.
pub(crate) fn player(id: &str, capacity: usize) -> (Player, mpsc::Receiver<Message>) {
    let (tx, rx) = mpsc::channel(capacity);
    let player = Player::new(id.to_owned(), format!("{id}-name"), tx, CancellationToken::new());
    (player, rx)
}

/// Everything currently queued, with the close sentinel shown as `<close>`.
pub(crate) fn drain(outbound: &mut mpsc::Receiver<Message>) -> Vec<String> {
    let mut received = Vec::new();
    while let Ok(message) = outbound.try_recv() {
        received.push(match message {
            Message::Text(text) => text.to_string(),
            Message::Close => "<close>".to_owned(),
        });
    }
    received
}
