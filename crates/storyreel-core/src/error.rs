//! Domain error types.

use thiserror::Error;

use crate::ids::{OwnerId, StoryId};

/// Top-level domain error type.
///
/// Navigation commands issued while no session is open are not errors; they
/// are silently ignored by the session.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An open request named a global index outside the catalog.
    #[error("story entry not found at global index {0}")]
    EntryNotFound(usize),

    /// A profile-initiated open named an owner with no stories in the catalog.
    #[error("owner not found or has no stories: {0}")]
    OwnerNotFound(OwnerId),

    /// An entry's story is missing from its own owner queue.
    #[error("story {story_id} is not in the story queue of owner {owner_id}")]
    StoryNotInOwnerQueue {
        /// The owner whose queue was searched.
        owner_id: OwnerId,
        /// The story that was not found.
        story_id: StoryId,
    },

    /// Profile data failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// The profile source could not be read or decoded.
    #[error("profile source error: {0}")]
    Source(String),
}
