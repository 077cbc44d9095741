//! Playback tuning knobs.

use serde::{Deserialize, Serialize};

use crate::domain::commands::EntryPoint;
use crate::domain::gestures::GestureConfig;

/// Per-entry-point story durations and gesture thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Per-story duration when opened from a profile page.
    pub profile_story_duration_ms: u64,
    /// Per-story duration when opened from the feed's story bar.
    pub feed_story_duration_ms: u64,
    /// Tap, hold and swipe thresholds.
    pub gestures: GestureConfig,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            profile_story_duration_ms: 5_000,
            feed_story_duration_ms: 10_000,
            gestures: GestureConfig::default(),
        }
    }
}

impl PlaybackConfig {
    /// The per-story duration for an opening from `entry`.
    #[must_use]
    pub fn duration_for(&self, entry: &EntryPoint) -> u64 {
        match entry {
            EntryPoint::FeedBar { .. } => self.feed_story_duration_ms,
            EntryPoint::Profile { .. } => self.profile_story_duration_ms,
        }
    }
}
