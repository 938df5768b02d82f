//! Per-connection WebSocket pump.
//!
//! A write task drains the player's outbound queue onto the socket and pings
//! on idle; the read loop decodes commands and hands them to the room. When
//! either side stops, the other is stopped too and the connection is removed
//! from the room.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{CloseFrame, Message as WsMessage, WebSocket, close_code};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use susnames_room::{Message, PlayerConnection, RawCommand, Room};
use tokio::sync::mpsc;
use tokio::time::{Instant, interval_at, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Largest inbound frame accepted, in bytes.
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024;
/// Interval between keepalive pings.
pub const PING_PERIOD: Duration = Duration::from_secs(50);
/// How long after a ping the peer has to show signs of life.
pub const PONG_WAIT: Duration = Duration::from_secs(10);
/// Deadline for writing a single frame.
pub const WRITE_WAIT: Duration = Duration::from_secs(10);

const SLOW_CONSUMER_REASON: &str = "connection too slow to keep up with messages";

/// Runs both loops for one accepted connection until it ends, then removes
/// the player from the room.
#[instrument(skip_all, fields(room = %room.name(), player_id = %connection.player_id))]
pub async fn run(socket: WebSocket, room: Arc<Room>, connection: PlayerConnection) {
    let PlayerConnection {
        player_id,
        connection_id,
        outbound,
        closed,
    } = connection;
    let (sink, stream) = socket.split();

    let writer = tokio::spawn(write_loop(sink, outbound, closed.clone()));
    read_loop(stream, &room, &player_id, &closed).await;
    if closed.is_cancelled() {
        // The writer is already on its way out; let it send the close frame.
        let _ = writer.await;
    } else {
        writer.abort();
    }

    room.remove_player(&player_id, connection_id);
    info!(%connection_id, "connection closed");
}

async fn read_loop(
    mut stream: SplitStream<WebSocket>,
    room: &Room,
    player_id: &str,
    closed: &CancellationToken,
) {
    loop {
        let next = tokio::select! {
            () = closed.cancelled() => break,
            next = timeout(PING_PERIOD + PONG_WAIT, stream.next()) => next,
        };

        let frame = match next {
            Ok(Some(Ok(frame))) => frame,
            Ok(Some(Err(err))) => {
                debug!(error = %err, "read failed");
                break;
            }
            Ok(None) => break,
            Err(_) => {
                info!("peer went silent");
                break;
            }
        };

        let raw = match frame {
            WsMessage::Text(text) => RawCommand::from_json(text.as_str()),
            WsMessage::Binary(bytes) => serde_json::from_slice(&bytes),
            WsMessage::Close(_) => break,
            WsMessage::Ping(_) | WsMessage::Pong(_) => continue,
        };

        match raw {
            Ok(raw) => room.process_command(player_id, &raw),
            Err(err) => {
                warn!(error = %err, "undecodable frame, closing connection");
                break;
            }
        }
    }
}

async fn write_loop(
    mut sink: SplitSink<WebSocket, WsMessage>,
    mut outbound: mpsc::Receiver<Message>,
    closed: CancellationToken,
) {
    let mut ping = interval_at(Instant::now() + PING_PERIOD, PING_PERIOD);

    loop {
        let (frame, last) = tokio::select! {
            biased;
            () = closed.cancelled() => {
                warn!("disconnecting slow consumer");
                (close(close_code::POLICY, SLOW_CONSUMER_REASON), true)
            }
            message = outbound.recv() => match message {
                Some(Message::Text(text)) => (WsMessage::Text(text.to_string().into()), false),
                Some(Message::Close) | None => (close(close_code::NORMAL, "closing"), true),
            },
            _ = ping.tick() => (WsMessage::Ping(Bytes::new()), false),
        };

        match timeout(WRITE_WAIT, sink.send(frame)).await {
            Ok(Ok(())) if !last => {}
            Ok(Ok(())) => break,
            Ok(Err(err)) => {
                debug!(error = %err, "write failed");
                break;
            }
            Err(_) => {
                debug!("write timed out");
                break;
            }
        }
    }

    closed.cancel();
}

fn close(code: u16, reason: &str) -> WsMessage {
    WsMessage::Close(Some(CloseFrame {
        code,
        reason: reason.to_string().into(),
    }))
}
