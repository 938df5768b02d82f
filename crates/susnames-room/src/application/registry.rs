//! Process-wide directory of rooms.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use parking_lot::RwLock;
use susnames_core::error::DomainError;
use susnames_core::names::three_part_name;
use tracing::{info, warn};

use super::room::{Room, RoomServices, RoomSettings};

/// How many generated names `create_room` tries before giving up.
const CREATE_ATTEMPTS: usize = 5;

/// All rooms of this process. Built once at startup and shared by reference;
/// rooms are never removed.
pub struct RoomRegistry {
    rooms: RwLock<HashMap<String, Arc<Room>>>,
    services: RoomServices,
}

impl RoomRegistry {
    #[must_use]
    pub fn new(services: RoomServices) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            services,
        }
    }

    /// Creates a room under a fresh random name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for unplayable settings and
    /// `DomainError::Conflict` if every generated name was already taken.
    pub fn create_room(&self, settings: RoomSettings) -> Result<Arc<Room>, DomainError> {
        settings.validate()?;

        for attempt in 1..=CREATE_ATTEMPTS {
            let name = three_part_name(&mut *self.services.rng.lock());
            let mut rooms = self.rooms.write();
            match rooms.entry(name) {
                Entry::Vacant(slot) => {
                    let room = Room::new(slot.key().clone(), settings, self.services.clone());
                    slot.insert(Arc::clone(&room));
                    info!(room = %room.name(), "room created");
                    return Ok(room);
                }
                Entry::Occupied(taken) => {
                    warn!(room = %taken.key(), attempt, "room name collision");
                }
            }
        }

        Err(DomainError::Conflict(format!(
            "no free room name after {CREATE_ATTEMPTS} attempts"
        )))
    }

    #[must_use]
    pub fn get_room(&self, name: &str) -> Option<Arc<Room>> {
        self.rooms.read().get(name).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.read().is_empty()
    }
}
