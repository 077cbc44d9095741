//! Domain events for the Story Playback context.

use serde::{Deserialize, Serialize};
use storyreel_core::event::{DomainEvent, EventMetadata};
use storyreel_core::ids::StoryKey;

/// How a story became the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// Selected directly when the session opened.
    Opened,
    /// Reached by advancing forward (timer completion or `next`).
    Advanced,
    /// Reached by retreating backward (`prev`).
    Retreated,
}

/// Why a session closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// The viewer closed the overlay.
    Requested,
    /// Forward navigation ran past the last story.
    Exhausted,
    /// A new open replaced the running session.
    Superseded,
}

/// Emitted when a session opens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOpened {
    /// The story the session opened on.
    pub story: StoryKey,
    /// Global index of that story in the session's catalog.
    pub global_index: usize,
    /// Number of stories reachable in this session.
    pub catalog_len: usize,
    /// Per-story duration for this session.
    pub duration_ms: u64,
}

/// Emitted every time a story becomes active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryActivated {
    /// The activated story.
    pub story: StoryKey,
    /// Its global index.
    pub global_index: usize,
    /// Its position in the owner queue.
    pub position_in_owner_queue: usize,
    /// How it was reached.
    pub activation: Activation,
}

/// Emitted when playback is paused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackPaused {
    /// The paused story.
    pub story: StoryKey,
    /// Progress at the moment of pausing.
    pub elapsed_ms: u64,
}

/// Emitted when playback resumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackResumed {
    /// The resumed story.
    pub story: StoryKey,
    /// Progress playback resumes from.
    pub elapsed_ms: u64,
}

/// Emitted when a session closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClosed {
    /// The story that was active when the session closed.
    pub last_story: StoryKey,
    /// Why it closed.
    pub reason: CloseReason,
}

/// Event type identifier for [`SessionOpened`].
pub const SESSION_OPENED_EVENT_TYPE: &str = "playback.session_opened";

/// Event type identifier for [`StoryActivated`].
pub const STORY_ACTIVATED_EVENT_TYPE: &str = "playback.story_activated";

/// Event type identifier for [`PlaybackPaused`].
pub const PLAYBACK_PAUSED_EVENT_TYPE: &str = "playback.paused";

/// Event type identifier for [`PlaybackResumed`].
pub const PLAYBACK_RESUMED_EVENT_TYPE: &str = "playback.resumed";

/// Event type identifier for [`SessionClosed`].
pub const SESSION_CLOSED_EVENT_TYPE: &str = "playback.session_closed";

/// Event payload variants for the Story Playback context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEventKind {
    /// A session has opened.
    SessionOpened(SessionOpened),
    /// A story has become active.
    StoryActivated(StoryActivated),
    /// Playback has paused.
    PlaybackPaused(PlaybackPaused),
    /// Playback has resumed.
    PlaybackResumed(PlaybackResumed),
    /// The session has closed.
    SessionClosed(SessionClosed),
}

impl PlaybackEventKind {
    /// Returns the event type identifier for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SessionOpened(_) => SESSION_OPENED_EVENT_TYPE,
            Self::StoryActivated(_) => STORY_ACTIVATED_EVENT_TYPE,
            Self::PlaybackPaused(_) => PLAYBACK_PAUSED_EVENT_TYPE,
            Self::PlaybackResumed(_) => PLAYBACK_RESUMED_EVENT_TYPE,
            Self::SessionClosed(_) => SESSION_CLOSED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the Story Playback context.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: PlaybackEventKind,
}

impl DomainEvent for PlaybackEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("PlaybackEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
