//! Translation of raw pointer, touch and key input into playback commands.
//!
//! A press on the story surface pauses immediately. Its release resumes and,
//! depending on the gesture, also navigates:
//!
//! - a horizontal drag beyond the swipe threshold, judged only at release:
//!   leftward goes to the next story, rightward to the previous one;
//! - a short tap in the left third goes back, in the right third forward;
//! - a long hold, or a tap in the middle third, only resumes.
//!
//! A press outside the surface, or `Escape`, closes the overlay. Arrow keys
//! navigate. The router holds no queue; each input is routed on arrival and
//! the returned commands are applied before the next input is read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storyreel_core::clock::millis_between;

use super::commands::PlaybackCommand;

/// Keys the router understands. Anything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// Previous story.
    ArrowLeft,
    /// Next story.
    ArrowRight,
    /// Close the overlay.
    Escape,
    /// Any other key.
    Other,
}

/// Raw input from the host, in surface-independent pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    /// Mouse button pressed.
    PointerDown { x: f32, y: f32 },
    /// Mouse moved.
    PointerMove { x: f32, y: f32 },
    /// Mouse button released.
    PointerUp { x: f32, y: f32 },
    /// Mouse left the overlay.
    PointerLeave,
    /// Finger placed.
    TouchStart { x: f32, y: f32 },
    /// Finger moved.
    TouchMove { x: f32, y: f32 },
    /// Finger lifted.
    TouchEnd,
    /// Key pressed.
    KeyDown(Key),
}

/// Rectangle occupied by the story surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceBounds {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl SurfaceBounds {
    /// Whether a point falls on the surface.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x < self.left + self.width && y >= self.top && y < self.top + self.height
    }

    fn zone(&self, x: f32) -> TapZone {
        let third = self.width / 3.0;
        if x < self.left + third {
            TapZone::Back
        } else if x >= self.left + 2.0 * third {
            TapZone::Forward
        } else {
            TapZone::Middle
        }
    }

    /// Centre point of the surface.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TapZone {
    Back,
    Middle,
    Forward,
}

/// Thresholds that separate taps, holds and swipes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Horizontal travel a drag must exceed to count as a swipe.
    pub swipe_threshold_px: f32,
    /// Presses at least this long are holds, not taps.
    pub hold_threshold_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_threshold_px: 50.0,
            hold_threshold_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Press {
    start_x: f32,
    last_x: f32,
    started_at: DateTime<Utc>,
}

/// Routes raw input to playback commands.
#[derive(Debug, Clone)]
pub struct GestureRouter {
    config: GestureConfig,
    surface: SurfaceBounds,
    press: Option<Press>,
}

impl GestureRouter {
    /// Creates a router for a story surface.
    #[must_use]
    pub fn new(surface: SurfaceBounds, config: GestureConfig) -> Self {
        Self {
            config,
            surface,
            press: None,
        }
    }

    /// The current story surface.
    #[must_use]
    pub fn surface(&self) -> SurfaceBounds {
        self.surface
    }

    /// Whether a press is in progress.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Forgets any press in progress, e.g. when the overlay closes.
    pub fn clear(&mut self) {
        self.press = None;
    }

    /// Routes one input received at `at`. Returns the commands to apply, in
    /// order; usually zero or one, two when a release both resumes and
    /// navigates.
    pub fn route(&mut self, input: InputEvent, at: DateTime<Utc>) -> Vec<PlaybackCommand> {
        match input {
            InputEvent::PointerDown { x, y } | InputEvent::TouchStart { x, y } => {
                self.press_at(x, y, at)
            }
            InputEvent::PointerMove { x, .. } | InputEvent::TouchMove { x, .. } => {
                if let Some(press) = self.press.as_mut() {
                    press.last_x = x;
                }
                Vec::new()
            }
            InputEvent::PointerUp { x, .. } => {
                if let Some(press) = self.press.as_mut() {
                    press.last_x = x;
                }
                self.release(at)
            }
            InputEvent::TouchEnd => self.release(at),
            InputEvent::PointerLeave => match self.press.take() {
                Some(_) => vec![PlaybackCommand::Resume],
                None => Vec::new(),
            },
            InputEvent::KeyDown(key) => match key {
                Key::ArrowLeft => vec![PlaybackCommand::Prev],
                Key::ArrowRight => vec![PlaybackCommand::Next],
                Key::Escape => vec![PlaybackCommand::Close],
                Key::Other => Vec::new(),
            },
        }
    }

    fn press_at(&mut self, x: f32, y: f32, at: DateTime<Utc>) -> Vec<PlaybackCommand> {
        if !self.surface.contains(x, y) {
            self.press = None;
            return vec![PlaybackCommand::Close];
        }
        self.press = Some(Press {
            start_x: x,
            last_x: x,
            started_at: at,
        });
        vec![PlaybackCommand::Pause]
    }

    fn release(&mut self, at: DateTime<Utc>) -> Vec<PlaybackCommand> {
        let Some(press) = self.press.take() else {
            return Vec::new();
        };
        let mut commands = vec![PlaybackCommand::Resume];

        let travel = press.last_x - press.start_x;
        if travel < -self.config.swipe_threshold_px {
            commands.push(PlaybackCommand::Next);
        } else if travel > self.config.swipe_threshold_px {
            commands.push(PlaybackCommand::Prev);
        } else if millis_between(press.started_at, at) < self.config.hold_threshold_ms {
            match self.surface.zone(press.start_x) {
                TapZone::Back => commands.push(PlaybackCommand::Prev),
                TapZone::Forward => commands.push(PlaybackCommand::Next),
                TapZone::Middle => {}
            }
        }
        commands
    }
}
