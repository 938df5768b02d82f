//! Room domain model.

pub mod command;
pub mod game;
pub mod player;
pub mod view;
