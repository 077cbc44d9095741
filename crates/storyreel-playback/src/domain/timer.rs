//! Progress timer for the active story.
//!
//! The timer is a plain value owned by the session. It holds at most one frame
//! registration at a time; every call that re-arms it revokes the previous
//! registration first, and a frame is only honoured if it carries the handle
//! of the live registration.

use chrono::{DateTime, TimeDelta, Utc};
use storyreel_core::clock::millis_between;
use storyreel_core::scheduler::{FrameHandle, FrameScheduler};

/// The result of delivering a frame to the timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerTick {
    /// Still running; completion fraction in `0.0..1.0`.
    Progress(f64),
    /// The duration elapsed. Delivered exactly once per start.
    Completed,
}

/// Elapsed/paused/resumed clock for a single story.
#[derive(Debug, Default)]
pub struct ProgressTimer {
    duration_ms: u64,
    epoch: Option<DateTime<Utc>>,
    paused_at: Option<DateTime<Utc>>,
    completed: bool,
    registration: Option<FrameHandle>,
}

impl ProgressTimer {
    /// Creates an idle timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts counting `duration_ms` from `now`, superseding any previous run.
    pub fn start(&mut self, duration_ms: u64, now: DateTime<Utc>, scheduler: &mut dyn FrameScheduler) {
        self.revoke(scheduler);
        self.duration_ms = duration_ms;
        self.epoch = Some(now);
        self.paused_at = None;
        self.completed = false;
        self.registration = Some(scheduler.request_frame());
    }

    /// Freezes progress at `now`. Returns `false` if the timer was not running.
    pub fn pause(&mut self, now: DateTime<Utc>, scheduler: &mut dyn FrameScheduler) -> bool {
        if self.epoch.is_none() || self.paused_at.is_some() || self.completed {
            return false;
        }
        self.paused_at = Some(now);
        self.revoke(scheduler);
        true
    }

    /// Continues from the frozen progress, shifting the epoch forward by the
    /// time spent paused. Returns `false` if the timer was not paused.
    pub fn resume(&mut self, now: DateTime<Utc>, scheduler: &mut dyn FrameScheduler) -> bool {
        let Some(paused_at) = self.paused_at.take() else {
            return false;
        };
        if let Some(epoch) = self.epoch.as_mut() {
            *epoch += (now - paused_at).max(TimeDelta::zero());
        }
        self.registration = Some(scheduler.request_frame());
        true
    }

    /// Stops the timer and revokes its registration.
    pub fn reset(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.revoke(scheduler);
        *self = Self::default();
    }

    fn revoke(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(handle) = self.registration.take() {
            scheduler.cancel_frame(handle);
        }
    }

    /// Delivers a frame. Frames that do not carry the live registration are
    /// ignored and yield `None`.
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        now: DateTime<Utc>,
        scheduler: &mut dyn FrameScheduler,
    ) -> Option<TimerTick> {
        if self.registration != Some(handle) {
            return None;
        }
        self.registration = None;

        let fraction = self.fraction(now);
        if fraction >= 1.0 {
            self.completed = true;
            return Some(TimerTick::Completed);
        }
        self.registration = Some(scheduler.request_frame());
        Some(TimerTick::Progress(fraction))
    }

    /// Milliseconds of progress at `now`, never more than the duration.
    #[must_use]
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        let Some(epoch) = self.epoch else {
            return 0;
        };
        let reference = self.paused_at.unwrap_or(now);
        millis_between(epoch, reference).min(self.duration_ms)
    }

    /// Completion fraction in `0.0..=1.0` at `now`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self, now: DateTime<Utc>) -> f64 {
        if self.epoch.is_none() {
            return 0.0;
        }
        if self.duration_ms == 0 {
            return 1.0;
        }
        self.elapsed_ms(now) as f64 / self.duration_ms as f64
    }

    /// Configured duration of the current run.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Whether progress is frozen.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Whether the completion signal has fired for the current run.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// The live frame registration, if any.
    #[must_use]
    pub fn registration(&self) -> Option<FrameHandle> {
        self.registration
    }
}
