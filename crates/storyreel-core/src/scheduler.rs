//! Frame scheduling abstraction.
//!
//! Models the host's display-refresh primitive: a caller registers interest in
//! the next frame and receives a one-shot [`FrameHandle`]. When the host
//! refreshes it hands every due handle back to the owner of the registration.
//! Cancelling a handle revokes the registration so it is never delivered.

use std::sync::{Arc, Mutex, PoisonError};

/// A one-shot registration for the next display frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Wraps a raw registration number.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw registration number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Abstraction over the host's per-frame callback scheduling.
pub trait FrameScheduler: Send {
    /// Registers for the next frame.
    fn request_frame(&mut self) -> FrameHandle;

    /// Revokes a registration. Unknown or already delivered handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Default)]
struct FrameQueueState {
    next_id: u64,
    pending: Vec<FrameHandle>,
}

/// Production scheduler: a shared queue of pending registrations that the
/// host drains once per refresh.
///
/// Clones share the same queue, so the host keeps one clone for draining and
/// hands another to the playback session.
#[derive(Debug, Clone, Default)]
pub struct FrameQueue {
    state: Arc<Mutex<FrameQueueState>>,
}

impl FrameQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every pending registration, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<FrameHandle> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut state.pending)
    }

    /// Number of registrations waiting for the next refresh.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .len()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.next_id += 1;
        let handle = FrameHandle(state.next_id);
        state.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .retain(|pending| *pending != handle);
    }
}
