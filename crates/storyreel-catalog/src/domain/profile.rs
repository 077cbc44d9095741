//! Owner and story records, and tolerant decoding of the profile document.
//!
//! The document is an array of profiles in the shape the feed dataset uses:
//! `{ id, username, avatar, isVerified, isYourStory, stories: [{ id, image,
//! timestamp, isLiked }] }`. Malformed records are skipped with a warning
//! rather than failing the whole load.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use storyreel_core::error::DomainError;
use storyreel_core::ids::{OwnerId, StoryId, StoryKey};
use tracing::warn;

/// A single timed slide owned by one profile. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Story {
    /// Identifier, unique within the owner.
    pub id: StoryId,
    /// The owning profile.
    pub owner_id: OwnerId,
    /// Address of the already-resolved story image.
    pub image_url: String,
    /// Display timestamp label (e.g. "2h").
    pub timestamp: Option<String>,
    /// Whether the viewer had liked the story when it was loaded.
    pub is_liked: bool,
}

impl Story {
    /// Returns the globally unique key for this story.
    #[must_use]
    pub fn key(&self) -> StoryKey {
        StoryKey {
            owner_id: self.owner_id.clone(),
            story_id: self.id.clone(),
        }
    }
}

/// Display fields of a profile. Read-only passthrough for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerProfile {
    /// Profile identifier.
    pub id: OwnerId,
    /// Handle shown next to the story.
    pub username: String,
    /// Avatar image address.
    pub avatar_url: String,
    /// Whether the profile carries a verified badge.
    pub is_verified: bool,
    /// Whether this is the viewer's own profile.
    pub is_self: bool,
}

/// A profile together with its ordered stories.
#[derive(Debug, Clone, PartialEq)]
pub struct Owner {
    /// Display fields.
    pub profile: OwnerProfile,
    /// Stories in the owner's order. May be empty.
    pub stories: Vec<Story>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OwnerRecord {
    id: OwnerId,
    username: String,
    #[serde(default, alias = "avatarUrl")]
    avatar: Option<String>,
    #[serde(default)]
    is_verified: Option<bool>,
    #[serde(default, alias = "isSelf")]
    is_your_story: Option<bool>,
    #[serde(default)]
    stories: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoryRecord {
    id: StoryId,
    #[serde(alias = "imageUrl")]
    image: String,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    is_liked: Option<bool>,
}

/// Decodes one profile record. Stories inside it that fail to decode, or
/// repeat an earlier story id of the same owner, are skipped individually.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the record lacks an `id` or
/// `username`, or has a blank username.
pub fn decode_owner(value: serde_json::Value) -> Result<Owner, DomainError> {
    let record: OwnerRecord = serde_json::from_value(value)
        .map_err(|e| DomainError::Validation(format!("malformed profile record: {e}")))?;

    if record.username.trim().is_empty() {
        return Err(DomainError::Validation(format!(
            "profile {} has a blank username",
            record.id
        )));
    }

    let owner_id = record.id;
    let mut seen = HashSet::new();
    let stories = record
        .stories
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(position, raw)| match decode_story(raw, &owner_id) {
            Ok(story) if !seen.insert(story.id.clone()) => {
                warn!(owner_id = %owner_id, position, story_id = %story.id, "skipping duplicate story");
                None
            }
            Ok(story) => Some(story),
            Err(e) => {
                warn!(owner_id = %owner_id, position, error = %e, "skipping malformed story");
                None
            }
        })
        .collect();

    Ok(Owner {
        profile: OwnerProfile {
            id: owner_id,
            username: record.username,
            avatar_url: record.avatar.unwrap_or_default(),
            is_verified: record.is_verified.unwrap_or(false),
            is_self: record.is_your_story.unwrap_or(false),
        },
        stories,
    })
}

fn decode_story(value: serde_json::Value, owner_id: &OwnerId) -> Result<Story, DomainError> {
    let record: StoryRecord = serde_json::from_value(value)
        .map_err(|e| DomainError::Validation(format!("malformed story record: {e}")))?;
    Ok(Story {
        id: record.id,
        owner_id: owner_id.clone(),
        image_url: record.image,
        timestamp: record.timestamp,
        is_liked: record.is_liked.unwrap_or(false),
    })
}

/// Decodes the whole profile document, skipping malformed profiles.
///
/// A document that is not a JSON array is treated as an empty profile list.
#[must_use]
pub fn decode_profiles(document: &serde_json::Value) -> Vec<Owner> {
    let Some(records) = document.as_array() else {
        warn!("profile document is not an array; treating it as empty");
        return Vec::new();
    };

    records
        .iter()
        .enumerate()
        .filter_map(|(position, raw)| match decode_owner(raw.clone()) {
            Ok(owner) => Some(owner),
            Err(e) => {
                warn!(position, error = %e, "skipping malformed profile");
                None
            }
        })
        .collect()
}
