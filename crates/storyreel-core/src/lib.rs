//! Storyreel Core — shared domain abstractions.
//!
//! This crate defines the identifiers, traits and error types that the
//! catalog and playback crates depend on. It contains no rendering or I/O code.

pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod ids;
pub mod scheduler;
pub mod source;
