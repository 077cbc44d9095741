//! Viewed-state tracking.

use std::collections::HashSet;

use storyreel_catalog::domain::profile::Story;
use storyreel_core::ids::StoryKey;

use super::events::{PlaybackEvent, PlaybackEventKind};

/// Stories the viewer has seen during this process lifetime.
///
/// The set only grows. It feeds display affordances (e.g. ring styling) and
/// never influences playback decisions.
#[derive(Debug, Clone, Default)]
pub struct ViewedTracker {
    viewed: HashSet<StoryKey>,
}

impl ViewedTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a story as viewed. Returns `true` the first time only.
    pub fn mark_viewed(&mut self, story: StoryKey) -> bool {
        self.viewed.insert(story)
    }

    /// Whether a story has been viewed.
    #[must_use]
    pub fn is_viewed(&self, story: &StoryKey) -> bool {
        self.viewed.contains(story)
    }

    /// Whether any story in an owner's list is still unviewed.
    #[must_use]
    pub fn has_unviewed(&self, owner_stories: &[Story]) -> bool {
        owner_stories
            .iter()
            .any(|story| !self.viewed.contains(&story.key()))
    }

    /// Marks the story of every activation event as viewed.
    pub fn observe(&mut self, event: &PlaybackEvent) {
        if let PlaybackEventKind::StoryActivated(payload) = &event.kind {
            self.mark_viewed(payload.story.clone());
        }
    }

    /// Number of distinct stories viewed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.viewed.len()
    }

    /// Whether nothing has been viewed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.viewed.is_empty()
    }
}
