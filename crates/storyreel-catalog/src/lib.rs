//! Storyreel — Story Catalog.
//!
//! Decodes the external profile list and flattens it into the globally
//! ordered, owner-grouped sequence of stories that playback navigates.

pub mod application;
pub mod domain;
