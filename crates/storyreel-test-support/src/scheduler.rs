//! Test scheduler — a `FrameScheduler` that records every registration.

use std::sync::{Arc, Mutex};

use storyreel_core::scheduler::{FrameHandle, FrameScheduler};

#[derive(Debug, Default)]
struct Recorded {
    next_id: u64,
    pending: Vec<FrameHandle>,
    requested: Vec<FrameHandle>,
    cancelled: Vec<FrameHandle>,
}

/// A frame scheduler that records requests and cancellations and lets the
/// test decide when frames are delivered.
///
/// Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingScheduler(Arc<Mutex<Recorded>>);

impl RecordingScheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the registrations due on the next frame.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn take_pending(&self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.0.lock().unwrap().pending)
    }

    /// Registrations that are live right now.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn pending(&self) -> Vec<FrameHandle> {
        self.0.lock().unwrap().pending.clone()
    }

    /// Every handle ever requested, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn requested(&self) -> Vec<FrameHandle> {
        self.0.lock().unwrap().requested.clone()
    }

    /// Every handle ever cancelled, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn cancelled(&self) -> Vec<FrameHandle> {
        self.0.lock().unwrap().cancelled.clone()
    }
}

impl FrameScheduler for RecordingScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let mut recorded = self.0.lock().unwrap();
        recorded.next_id += 1;
        let handle = FrameHandle::new(recorded.next_id);
        recorded.pending.push(handle);
        recorded.requested.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut recorded = self.0.lock().unwrap();
        recorded.pending.retain(|pending| *pending != handle);
        recorded.cancelled.push(handle);
    }
}
