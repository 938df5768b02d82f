//! Susnames API server entry point.

use std::error::Error;

use susnames_api::config::ServerConfig;
use susnames_api::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Susnames API server");

    // Read configuration from environment.
    let config = ServerConfig::from_env()?;
    let addr = config.bind_addr()?;
    tracing::info!(
        spy_targets = config.room.spy_target_count,
        counterspy_targets = config.room.counterspy_target_count,
        vote_secs = config.room.vote_duration.as_secs(),
        "room settings loaded"
    );

    // Build router.
    let app = susnames_api::app(AppState::from_config(config));

    // Start server.
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
