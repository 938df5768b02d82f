//! A connected participant and its outbound queue.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Game role of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Watches without taking part.
    Spectator,
    /// Sees the hidden card roles and gives clues.
    Spymaster,
    /// Guesses; the default role of every participant.
    Spy,
    /// Guesses, but secretly works against the spies.
    Counterspy,
}

impl Role {
    /// Whether this role may vote during a clue round.
    #[must_use]
    pub fn is_guesser(self) -> bool {
        matches!(self, Role::Spy | Role::Counterspy)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Spectator => "spectator",
            Role::Spymaster => "spymaster",
            Role::Spy => "spy",
            Role::Counterspy => "counterspy",
        };
        f.write_str(label)
    }
}

/// An item on a player's outbound queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Rendered content to write to the transport.
    Text(Arc<str>),
    /// Close sentinel: the write loop sends a close frame and stops.
    Close,
}

impl Message {
    /// Wraps rendered content.
    pub fn text(content: impl Into<Arc<str>>) -> Self {
        Message::Text(content.into())
    }
}

/// Result of a non-blocking enqueue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The message is on the queue.
    Queued,
    /// The queue was full; the player's connection has been force-closed.
    Evicted,
    /// The consumer is already gone.
    Closed,
}

/// One connected participant. Owned by exactly one room and only touched
/// under that room's player-registry lock.
#[derive(Debug)]
pub struct Player {
    id: String,
    connection_id: Uuid,
    pub(crate) name: String,
    pub(crate) role: Role,
    pub(crate) claimed_role: Option<Role>,
    outbound: mpsc::Sender<Message>,
    closer: CancellationToken,
}

impl Player {
    /// Creates a player for a fresh connection.
    #[must_use]
    pub fn new(
        id: String,
        name: String,
        outbound: mpsc::Sender<Message>,
        closer: CancellationToken,
    ) -> Self {
        Self {
            id,
            connection_id: Uuid::new_v4(),
            name,
            role: Role::Spy,
            claimed_role: None,
            outbound,
            closer,
        }
    }

    /// Opaque session identifier, stable for the life of the connection.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Identifies this particular connection of the session.
    #[must_use]
    pub fn connection_id(&self) -> Uuid {
        self.connection_id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current game role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Role the player asked for at the next game start, if any.
    #[must_use]
    pub fn claimed_role(&self) -> Option<Role> {
        self.claimed_role
    }

    /// Enqueues `message` without waiting. A full queue means the consumer
    /// cannot keep up, so the connection is force-closed instead.
    pub fn deliver(&self, message: Message) -> Delivery {
        match self.outbound.try_send(message) {
            Ok(()) => Delivery::Queued,
            Err(TrySendError::Full(_)) => {
                self.force_close();
                Delivery::Evicted
            }
            Err(TrySendError::Closed(_)) => Delivery::Closed,
        }
    }

    /// Asks the write loop to flush what is queued and then close.
    pub fn request_close(&self) {
        if self.deliver(Message::Close) == Delivery::Closed {
            self.force_close();
        }
    }

    /// Signals both pump loops to stop immediately. Safe to call repeatedly.
    pub fn force_close(&self) {
        self.closer.cancel();
    }

    /// Whether the connection has been force-closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closer.is_cancelled()
    }
}
