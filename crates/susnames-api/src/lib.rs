//! Susnames: HTTP and WebSocket server.
//!
//! Thin glue around the room engine: environment configuration, cookie
//! session identity, JSON rendering of room updates and the per-connection
//! WebSocket pump.

pub mod config;
pub mod error;
pub mod pump;
pub mod render;
pub mod routes;
pub mod session;
pub mod state;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the full application router.
pub fn app(state: AppState) -> Router {
    // TODO: Replace CorsLayer::permissive() with the deployed front-end origin.
    Router::new()
        .merge(routes::health::router())
        .merge(routes::rooms::router())
        .merge(routes::connection::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
