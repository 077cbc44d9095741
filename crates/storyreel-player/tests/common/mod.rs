//! Shared test helpers for host integration tests.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use storyreel_catalog::domain::catalog::StoryCatalog;
use storyreel_catalog::domain::profile::decode_profiles;
use storyreel_core::scheduler::FrameQueue;
use storyreel_playback::application::config::PlaybackConfig;
use storyreel_playback::application::player::StoryPlayer;
use storyreel_player::host::DEFAULT_SURFACE;
use storyreel_test_support::{ManualClock, profile_document};
use uuid::Uuid;

/// A JSON file in the system temp directory, removed on drop.
pub struct TempProfileFile {
    pub path: PathBuf,
}

impl TempProfileFile {
    /// Writes `contents` to a fresh uniquely named file.
    pub fn with_contents(contents: &str) -> Self {
        let path = std::env::temp_dir().join(format!("storyreel-{}.json", Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        Self { path }
    }
}

impl Drop for TempProfileFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// A player over `owners` driven by a frame queue and a manual clock.
pub fn build_player(owners: &[(&str, &[&str])]) -> (StoryPlayer, FrameQueue, ManualClock) {
    let clock = ManualClock::default();
    let frames = FrameQueue::new();
    let catalog = StoryCatalog::build(&decode_profiles(&profile_document(owners)));
    let player = StoryPlayer::new(
        catalog,
        Arc::new(clock.clone()),
        Box::new(frames.clone()),
        DEFAULT_SURFACE,
        PlaybackConfig::default(),
    );
    (player, frames, clock)
}
