//! Susnames: room session engine.
//!
//! A room owns its connected players, the current word grid, the
//! clue-giver/guesser turn cycle and the timed group vote. Every state
//! transition is fanned out to connected players through bounded per-player
//! queues; a player whose queue is full is disconnected rather than allowed
//! to stall the room.

pub mod application;
pub mod domain;

#[cfg(test)]
pub(crate) mod testing;

pub use application::registry::RoomRegistry;
pub use application::render::RoomRenderer;
pub use application::room::{PlayerConnection, Room, RoomServices, RoomSettings};
pub use domain::command::{Command, CommandError, RawCommand};
pub use domain::game::Turn;
pub use domain::player::{Message, Player, Role};
pub use domain::view::{CardView, ClueView, GameView, PlayerSummary};
