//! Application layer for Story Playback.

pub mod config;
pub mod player;
pub mod view;
