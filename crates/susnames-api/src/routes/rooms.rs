//! Room lifecycle routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::post};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use susnames_core::error::DomainError;
use susnames_room::{GameView, PlayerSummary, Role, Room, Turn};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::session;
use crate::state::AppState;

/// Response body for POST /rooms.
#[derive(Debug, Serialize)]
pub struct CreateRoomResponse {
    /// Generated room name.
    pub name: String,
}

/// Public view of a room, as a spectator would see it.
#[derive(Debug, Serialize)]
pub struct RoomSnapshot {
    /// Room name.
    pub name: String,
    /// Connected players; counterspies are listed as spies.
    pub players: Vec<PlayerSummary>,
    /// Whose move it is, once a game has started.
    pub turn: Option<Turn>,
    /// The board without hidden roles, once a game has started.
    pub game: Option<GameView>,
}

/// Request body for POST /rooms/{name}/name.
#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    /// New display name; empty picks a random one.
    #[serde(default)]
    pub name: String,
}

/// Response body for POST /rooms/{name}/name.
#[derive(Debug, Serialize)]
pub struct RenameResponse {
    /// The name now in effect.
    pub name: String,
}

pub(crate) fn find_room(state: &AppState, name: &str) -> Result<Arc<Room>, ApiError> {
    state
        .registry
        .get_room(name)
        .ok_or_else(|| ApiError(DomainError::NotFound(format!("room {name}"))))
}

/// POST /rooms
#[instrument(skip(state))]
async fn create_room(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CreateRoomResponse>), ApiError> {
    let room = state.registry.create_room(state.config.room)?;
    info!(room = %room.name(), "handling create_room");

    Ok((
        StatusCode::CREATED,
        Json(CreateRoomResponse {
            name: room.name().to_string(),
        }),
    ))
}

/// GET /rooms/{name}
#[instrument(skip(state))]
async fn get_room(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<RoomSnapshot>, ApiError> {
    let room = find_room(&state, &name)?;
    let players = room
        .player_list()
        .iter()
        .map(|p| p.as_seen_by(""))
        .collect();

    Ok(Json(RoomSnapshot {
        name: room.name().to_string(),
        players,
        turn: room.current_turn(),
        game: room.game_view(Role::Spectator),
    }))
}

/// POST /rooms/{name}/name
#[instrument(skip(state, jar, request))]
async fn rename_player(
    State(state): State<AppState>,
    Path(name): Path<String>,
    jar: CookieJar,
    Json(request): Json<RenameRequest>,
) -> Result<(CookieJar, Json<RenameResponse>), ApiError> {
    let room = find_room(&state, &name)?;
    let player_id = session::session_id(&jar)
        .ok_or_else(|| ApiError(DomainError::NotFound("no session".to_string())))?;

    let new_name = room.set_player_name(&player_id, &request.name)?;
    info!(%player_id, name = %new_name, "handling rename_player");

    let jar = session::remember_player_name(jar, &new_name, state.config.cookies);
    Ok((jar, Json(RenameResponse { name: new_name })))
}

/// POST /rooms/{name}/start-game
#[instrument(skip(state))]
async fn start_game(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    let room = find_room(&state, &name)?;
    room.start_game()?;
    info!("handling start_game");

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for room lifecycle routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rooms", post(create_room))
        .route("/rooms/{name}", get(get_room))
        .route("/rooms/{name}/name", post(rename_player))
        .route("/rooms/{name}/start-game", post(start_game))
}
