//! Shared test mocks and utilities for the Storyreel playback engine.

mod clock;
mod fixtures;
mod scheduler;
mod source;

pub use clock::{ManualClock, fixed_start};
pub use fixtures::{owner_json, profile_document};
pub use scheduler::RecordingScheduler;
pub use source::{CountingProfileSource, FailingProfileSource, StaticProfileSource};
