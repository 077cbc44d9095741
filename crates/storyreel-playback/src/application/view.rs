//! Read models handed to presentation code.

use std::collections::HashMap;

use serde::Serialize;
use storyreel_catalog::domain::profile::{OwnerProfile, Story};
use storyreel_core::ids::StoryKey;
use uuid::Uuid;

/// Label shown under the viewer's own story ring.
pub const SELF_STORY_LABEL: &str = "Your story";

/// Everything needed to paint one frame of the open overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackFrame {
    /// Identifier of the current opening.
    pub session_id: Uuid,
    /// The story on screen.
    pub active_story: Story,
    /// Its owner.
    pub owner: OwnerProfile,
    /// One progress fraction per story in the owner queue.
    pub progress: Vec<f64>,
    /// Whether progress is frozen.
    pub is_paused: bool,
    /// Index of the active story within the owner queue.
    pub position_in_owner_queue: usize,
    /// Index of the active story within the reachable catalog.
    pub global_position: usize,
    /// Progress of the active story.
    pub elapsed_ms: u64,
    /// Whether the viewer has liked the active story in this opening.
    pub is_liked: bool,
}

/// One ring in the feed's story bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoryBarItem {
    /// The owner the ring belongs to.
    pub owner: OwnerProfile,
    /// Catalog index to open when the ring is clicked.
    pub first_entry_index: usize,
    /// Caption under the ring.
    pub label: String,
    /// Whether any of the owner's stories is still unviewed.
    pub has_unviewed: bool,
}

impl StoryBarItem {
    /// Caption for an owner's ring.
    #[must_use]
    pub fn label_for(owner: &OwnerProfile) -> String {
        if owner.is_self {
            SELF_STORY_LABEL.to_owned()
        } else {
            owner.username.clone()
        }
    }
}

/// Ephemeral per-opening UI state: likes and the reply draft.
///
/// Nothing here outlives an opening.
#[derive(Debug, Clone, Default)]
pub(crate) struct StoryInteractions {
    likes: HashMap<StoryKey, bool>,
    draft: String,
}

impl StoryInteractions {
    /// Seeds a story's like state from the source data the first time it is
    /// shown.
    pub(crate) fn seed_like(&mut self, story: &Story) {
        self.likes.entry(story.key()).or_insert(story.is_liked);
    }

    pub(crate) fn is_liked(&self, story: &StoryKey) -> bool {
        self.likes.get(story).copied().unwrap_or(false)
    }

    /// Flips a story's like state and returns the new value.
    pub(crate) fn toggle_like(&mut self, story: StoryKey) -> bool {
        let liked = self.likes.entry(story).or_insert(false);
        *liked = !*liked;
        *liked
    }

    pub(crate) fn set_draft(&mut self, text: &str) {
        text.clone_into(&mut self.draft);
    }

    pub(crate) fn draft(&self) -> &str {
        &self.draft
    }

    /// Takes the trimmed draft, leaving it empty. Blank drafts yield `None`.
    pub(crate) fn take_draft(&mut self) -> Option<String> {
        let message = self.draft.trim().to_owned();
        self.draft.clear();
        (!message.is_empty()).then_some(message)
    }

    pub(crate) fn clear(&mut self) {
        self.likes.clear();
        self.draft.clear();
    }
}
