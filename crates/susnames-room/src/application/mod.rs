//! Room orchestration: state machine, fan-out, timers and the room directory.

pub(crate) mod broadcast;
pub mod registry;
pub mod render;
pub mod room;
pub(crate) mod timer;
