//! Commands for the Story Playback context.

use serde::{Deserialize, Serialize};
use storyreel_core::command::Command;
use storyreel_core::ids::OwnerId;

/// Where a story overlay was opened from.
///
/// The entry point decides which stories are reachable and the per-story
/// duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPoint {
    /// The feed's story bar: the whole catalog is reachable, starting at
    /// `global_index`.
    FeedBar {
        /// Catalog position of the story that was clicked.
        global_index: usize,
    },
    /// A profile page: only that owner's stories, starting at the first.
    Profile {
        /// The profile whose stories play.
        owner_id: OwnerId,
    },
}

/// Commands presentation and gesture routing may issue against an open
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackCommand {
    /// Freeze progress.
    Pause,
    /// Continue from the frozen progress.
    Resume,
    /// Advance forward.
    Next,
    /// Retreat backward.
    Prev,
    /// Close the overlay.
    Close,
}

impl Command for PlaybackCommand {
    fn command_type(&self) -> &'static str {
        match self {
            Self::Pause => "playback.pause",
            Self::Resume => "playback.resume",
            Self::Next => "playback.next",
            Self::Prev => "playback.prev",
            Self::Close => "playback.close",
        }
    }
}
