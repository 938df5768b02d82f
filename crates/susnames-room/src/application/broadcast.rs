//! Fan-out of rendered messages to a room's players.
//!
//! Delivery never waits: each message is pushed onto the recipient's bounded
//! queue with `try_send`. A full queue means the recipient cannot keep up,
//! so its connection is force-closed and the caller is told to drop it.

use std::collections::BTreeMap;

use tracing::warn;

use crate::domain::player::{Delivery, Message, Player};

/// Sends `render(player)` to every player. Returns the ids of players
/// evicted for a full queue, in id order.
pub(crate) fn broadcast(
    players: &BTreeMap<String, Player>,
    mut render: impl FnMut(&Player) -> Message,
) -> Vec<String> {
    players
        .values()
        .filter(|player| send_to(player, render(player)) == Delivery::Evicted)
        .map(|player| player.id().to_owned())
        .collect()
}

/// Sends one message to one player under the same enqueue-or-evict policy.
pub(crate) fn send_to(player: &Player, message: Message) -> Delivery {
    let delivery = player.deliver(message);
    if delivery == Delivery::Evicted {
        warn!(
            player_id = %player.id(),
            "outbound queue full, disconnecting slow player"
        );
    }
    delivery
}
