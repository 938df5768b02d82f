//! Route modules.

pub mod connection;
pub mod health;
pub mod rooms;
