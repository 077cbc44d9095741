//! The flattened, owner-grouped story catalog.

use std::collections::HashSet;
use std::sync::Arc;

use storyreel_core::ids::OwnerId;
use tracing::warn;

use super::profile::{Owner, OwnerProfile, Story};

/// A story annotated with its position in the flattened catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryEntry {
    /// The story itself.
    pub story: Story,
    /// The owning profile.
    pub owner_id: OwnerId,
    /// The owner's full story list, shared by every entry of that owner.
    pub owner_stories: Arc<[Story]>,
    /// Position in the flattened sequence across all owners.
    pub global_index: usize,
    /// Position within `owner_stories`, fixed when the catalog is built.
    pub owner_position: usize,
}

impl StoryEntry {
    /// Index of this entry's story within its owner's story list, or `None`
    /// if `owner_position` does not point at this entry's story.
    #[must_use]
    pub fn position_in_owner_queue(&self) -> Option<usize> {
        self.owner_stories
            .get(self.owner_position)
            .filter(|story| story.id == self.story.id)
            .map(|_| self.owner_position)
    }
}

/// Globally ordered sequence of story entries, grouped by owner.
///
/// Invariants: `global_index` runs `0..len()` in order, and entries of the same
/// owner are contiguous. Owners without stories do not appear. Cloning is
/// cheap; the entries are shared.
#[derive(Debug, Clone, Default)]
pub struct StoryCatalog {
    entries: Arc<[StoryEntry]>,
    owners: Arc<[OwnerProfile]>,
}

impl StoryCatalog {
    /// Flattens the owner list into a catalog.
    ///
    /// Owners are visited in list order and their stories in owner order.
    /// A repeated owner id is skipped so each owner's entries stay contiguous,
    /// and a repeated story id within one owner is dropped from that owner's
    /// queue.
    #[must_use]
    pub fn build(owners: &[Owner]) -> Self {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        let mut profiles = Vec::new();

        for owner in owners.iter().filter(|owner| !owner.stories.is_empty()) {
            if !seen.insert(owner.profile.id.clone()) {
                warn!(owner_id = %owner.profile.id, "skipping duplicate owner in profile list");
                continue;
            }
            let owner_stories: Arc<[Story]> = unique_stories(owner).into();
            for (owner_position, story) in owner_stories.iter().enumerate() {
                entries.push(StoryEntry {
                    story: story.clone(),
                    owner_id: owner.profile.id.clone(),
                    owner_stories: Arc::clone(&owner_stories),
                    global_index: entries.len(),
                    owner_position,
                });
            }
            profiles.push(owner.profile.clone());
        }

        Self {
            entries: entries.into(),
            owners: profiles.into(),
        }
    }

    /// Returns an empty catalog.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Total number of stories across all owners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no stories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in catalog order.
    #[must_use]
    pub fn entries(&self) -> &[StoryEntry] {
        &self.entries
    }

    /// The entry at a global index.
    #[must_use]
    pub fn get(&self, global_index: usize) -> Option<&StoryEntry> {
        self.entries.get(global_index)
    }

    /// Profiles that own at least one story, in catalog order.
    #[must_use]
    pub fn owners(&self) -> &[OwnerProfile] {
        &self.owners
    }

    /// Display fields of an owner present in the catalog.
    #[must_use]
    pub fn owner(&self, owner_id: &OwnerId) -> Option<&OwnerProfile> {
        self.owners.iter().find(|profile| &profile.id == owner_id)
    }

    /// The first entry of an owner, if the owner has stories.
    #[must_use]
    pub fn first_entry_of(&self, owner_id: &OwnerId) -> Option<&StoryEntry> {
        self.entries.iter().find(|entry| &entry.owner_id == owner_id)
    }

    /// A catalog holding only one owner's stories, re-indexed from zero.
    ///
    /// Returns `None` when the owner has no stories here.
    #[must_use]
    pub fn scoped_to_owner(&self, owner_id: &OwnerId) -> Option<Self> {
        let profile = self.owner(owner_id)?.clone();
        let entries: Vec<StoryEntry> = self
            .entries
            .iter()
            .filter(|entry| &entry.owner_id == owner_id)
            .enumerate()
            .map(|(global_index, entry)| StoryEntry {
                global_index,
                ..entry.clone()
            })
            .collect();

        Some(Self {
            entries: entries.into(),
            owners: vec![profile].into(),
        })
    }
}

fn unique_stories(owner: &Owner) -> Vec<Story> {
    let mut seen = HashSet::new();
    owner
        .stories
        .iter()
        .filter(|story| {
            let first = seen.insert(story.id.clone());
            if !first {
                warn!(owner_id = %owner.profile.id, story_id = %story.id, "skipping duplicate story");
            }
            first
        })
        .cloned()
        .collect()
}
