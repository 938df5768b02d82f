//! WebSocket attachment of a browser session to a room.

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::{Router, routing::get};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument};

use super::rooms::find_room;
use crate::error::ApiError;
use crate::pump::{self, MAX_MESSAGE_SIZE};
use crate::session;
use crate::state::AppState;

/// GET /rooms/{name}/conn
///
/// Issues the session and name cookies when missing, then upgrades and hands
/// the socket to the connection pump.
#[instrument(skip(state, jar, ws))]
async fn connect(
    State(state): State<AppState>,
    Path(name): Path<String>,
    jar: CookieJar,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, ApiError> {
    let room = find_room(&state, &name)?;
    let policy = state.config.cookies;

    let (jar, player_id) = session::ensure_session_id(jar, policy);
    let (jar, player_name) = match session::player_name(&jar) {
        Some(stored) => (jar, stored),
        None => {
            let generated = room.generate_name();
            (session::remember_player_name(jar, &generated, policy), generated)
        }
    };
    info!(%player_id, %player_name, "upgrading connection");

    let upgrade = ws
        .max_message_size(MAX_MESSAGE_SIZE)
        .on_upgrade(move |socket| async move {
            let connection = room.connect_player(&player_id, Some(&player_name));
            pump::run(socket, room, connection).await;
        });

    Ok((jar, upgrade))
}

/// Returns the router for WebSocket connections.
pub fn router() -> Router<AppState> {
    Router::new().route("/rooms/{name}/conn", get(connect))
}
