//! Shared application state.

use std::sync::Arc;

use susnames_core::clock::SystemClock;
use susnames_core::rng::StdRandom;
use susnames_room::{RoomRegistry, RoomServices};

use crate::config::ServerConfig;
use crate::render::JsonRenderer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Every room of this process.
    pub registry: Arc<RoomRegistry>,
    /// Startup configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(registry: Arc<RoomRegistry>, config: ServerConfig) -> Self {
        Self {
            registry,
            config: Arc::new(config),
        }
    }

    /// Production state: JSON rendering, OS-seeded randomness and the
    /// system clock.
    #[must_use]
    pub fn from_config(config: ServerConfig) -> Self {
        let services = RoomServices::new(
            Arc::new(JsonRenderer),
            StdRandom::from_os(),
            Arc::new(SystemClock),
        );
        Self::new(Arc::new(RoomRegistry::new(services)), config)
    }
}
