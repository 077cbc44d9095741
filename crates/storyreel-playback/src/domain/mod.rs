//! Domain layer for Story Playback.

pub mod commands;
pub mod events;
pub mod gestures;
pub mod session;
pub mod timer;
pub mod viewed;
