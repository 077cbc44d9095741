//! Storyreel — headless terminal host.
//!
//! Loads the profile document from disk, drives display frames from a timer
//! and feeds stdin commands to a [`storyreel_playback::application::player::StoryPlayer`].

pub mod config;
pub mod error;
pub mod host;
pub mod source;
