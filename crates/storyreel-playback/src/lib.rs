//! Storyreel — Story Playback.
//!
//! Drives full-screen, auto-advancing story slideshows: the progress timer,
//! the playback session state machine, gesture routing and viewed-state
//! tracking, plus the application-level player that presentation code talks to.

pub mod application;
pub mod domain;
