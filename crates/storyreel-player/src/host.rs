//! The terminal frame loop.
//!
//! Display frames come from a tokio interval: each tick drains the
//! [`FrameQueue`] and hands every due registration to the player. Viewer
//! input arrives as lines on an async reader, one command per line:
//!
//! | line              | effect                                  |
//! |-------------------|-----------------------------------------|
//! | `n`, `next`       | `ArrowRight`                            |
//! | `p`, `prev`       | `ArrowLeft`                             |
//! | `q`, `esc`        | `Escape`                                |
//! | `hold`, `release` | press and release at the surface centre |
//! | `like`            | toggle the like on the active story     |
//! | `send <text>`     | reply to the active story's owner       |
//! | `profile`         | close and go to the owner's profile     |
//!
//! The loop ends when the session closes or the reader hits end of input.

use std::time::Duration;

use serde_json::json;
use storyreel_catalog::domain::catalog::StoryCatalog;
use storyreel_core::error::DomainError;
use storyreel_core::event::DomainEvent;
use storyreel_core::ids::OwnerId;
use storyreel_core::scheduler::FrameQueue;
use storyreel_playback::application::player::StoryPlayer;
use storyreel_playback::domain::commands::EntryPoint;
use storyreel_playback::domain::events::{CloseReason, PlaybackEvent, PlaybackEventKind};
use storyreel_playback::domain::gestures::{InputEvent, Key, SurfaceBounds};
use storyreel_playback::domain::session::PlaybackState;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::error::AppError;

/// Surface of a portrait phone screen, used by the headless host.
pub const DEFAULT_SURFACE: SurfaceBounds = SurfaceBounds {
    left: 0.0,
    top: 0.0,
    width: 1080.0,
    height: 1920.0,
};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum HostAction {
    /// Raw input for the gesture router.
    Input(InputEvent),
    /// Toggle the like on the active story.
    Like,
    /// Send a reply with this text.
    Send(String),
    /// Leave for the active owner's profile.
    OpenProfile,
}

/// What happened during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Stories that became active, counting revisits.
    pub stories_shown: usize,
    /// Why the session closed, if it did.
    pub close_reason: Option<CloseReason>,
    /// Every event of the run as an [`event_record`], oldest first.
    pub events: Vec<serde_json::Value>,
}

impl RunSummary {
    fn record(&mut self, events: Vec<PlaybackEvent>) {
        for event in events {
            let record = event_record(&event);
            debug!(event = %record, "playback event");
            self.events.push(record);

            match event.kind {
                PlaybackEventKind::StoryActivated(payload) => {
                    self.stories_shown += 1;
                    info!(
                        story = %payload.story,
                        global_index = payload.global_index,
                        activation = ?payload.activation,
                        "now showing"
                    );
                }
                PlaybackEventKind::SessionClosed(payload) => {
                    self.close_reason = Some(payload.reason);
                }
                _ => {}
            }
        }
    }
}

/// Flattens an event into the JSON record the host logs: the event's
/// metadata alongside its serialized payload.
#[must_use]
pub fn event_record(event: &PlaybackEvent) -> serde_json::Value {
    let meta = event.metadata();
    json!({
        "event_id": meta.event_id,
        "event_type": event.event_type(),
        "session_id": meta.session_id,
        "sequence_number": meta.sequence_number,
        "occurred_at": meta.occurred_at,
        "payload": event.to_payload(),
    })
}

/// Parses one input line. Blank and unrecognized lines yield `None`.
#[must_use]
pub fn parse_line(line: &str, surface: SurfaceBounds) -> Option<HostAction> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));
    let (x, y) = surface.center();

    let action = match word.to_ascii_lowercase().as_str() {
        "n" | "next" => HostAction::Input(InputEvent::KeyDown(Key::ArrowRight)),
        "p" | "prev" => HostAction::Input(InputEvent::KeyDown(Key::ArrowLeft)),
        "q" | "esc" => HostAction::Input(InputEvent::KeyDown(Key::Escape)),
        "hold" => HostAction::Input(InputEvent::PointerDown { x, y }),
        "release" => HostAction::Input(InputEvent::PointerUp { x, y }),
        "like" => HostAction::Like,
        "send" => HostAction::Send(rest.to_owned()),
        "profile" => HostAction::OpenProfile,
        _ => return None,
    };
    Some(action)
}

/// Picks the entry point for the first opening: the feed bar, or the
/// profile of `start_owner` (matched by id, then by username).
///
/// # Errors
///
/// Returns `AppError::Domain` if `start_owner` names no owner with stories.
pub fn resolve_entry(catalog: &StoryCatalog, start_owner: Option<&str>) -> Result<EntryPoint, AppError> {
    let Some(wanted) = start_owner else {
        return Ok(EntryPoint::FeedBar { global_index: 0 });
    };
    let owner = catalog
        .owners()
        .iter()
        .find(|owner| owner.id.as_str() == wanted)
        .or_else(|| catalog.owners().iter().find(|owner| owner.username == wanted))
        .ok_or_else(|| DomainError::OwnerNotFound(OwnerId::new(wanted)))?;
    Ok(EntryPoint::Profile {
        owner_id: owner.id.clone(),
    })
}

/// Applies one parsed action to the player.
pub fn apply(player: &mut StoryPlayer, action: HostAction) {
    match action {
        HostAction::Input(input) => {
            player.handle_input(input);
        }
        HostAction::Like => {
            if let Some(liked) = player.toggle_like() {
                info!(liked, "like toggled");
            }
        }
        HostAction::Send(text) => {
            player.set_message_draft(&text);
            if player.send_message().is_none() {
                debug!("nothing to send");
            }
        }
        HostAction::OpenProfile => {
            if let Some(username) = player.open_owner_profile() {
                info!(username = %username, "leaving for profile");
            }
        }
    }
}

/// Drives `player` until its session closes or `input` ends.
///
/// The player must already be open; a closed player returns immediately.
///
/// # Errors
///
/// Returns `AppError::Io` if reading `input` fails.
pub async fn run<R>(
    player: &mut StoryPlayer,
    frames: &FrameQueue,
    frame_interval: Duration,
    input: R,
) -> Result<RunSummary, AppError>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = RunSummary::default();
    summary.record(player.take_events());

    let surface = player.surface();
    let mut ticker = tokio::time::interval(frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = input.lines();

    while player.state() != PlaybackState::Closed {
        tokio::select! {
            _ = ticker.tick() => {
                for handle in frames.drain() {
                    player.on_frame(handle);
                }
            }
            line = lines.next_line() => {
                match line? {
                    Some(line) => match parse_line(&line, surface) {
                        Some(action) => apply(player, action),
                        None if line.trim().is_empty() => {}
                        None => warn!(line = %line.trim(), "unrecognized command"),
                    },
                    None => {
                        debug!("input closed");
                        player.close();
                    }
                }
            }
        }
        summary.record(player.take_events());
    }

    Ok(summary)
}
