//! Platform abstraction layer
//!
//! The simulation never schedules itself. Something outside (a display refresh
//! callback, a test, the headless binary) hands out frame requests and calls
//! back into the scheduler when one comes due.

use std::collections::VecDeque;

/// Ticket for one outstanding frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Source of "next frame" callbacks
pub trait FrameDriver {
    /// Register interest in the next frame
    fn request_frame(&mut self) -> FrameHandle;

    /// Drop a previously requested frame. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// In-process driver: requests queue up until the owner pops them
#[derive(Debug, Default)]
pub struct ManualDriver {
    next_id: u64,
    pending: VecDeque<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

impl ManualDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the oldest due frame, if any
    pub fn pop_due(&mut self) -> Option<FrameHandle> {
        self.pending.pop_front()
    }

    /// Requests not yet delivered or cancelled
    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }

    /// Total requests ever made
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Total cancellations that matched a pending request
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameDriver for ManualDriver {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push_back(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|&h| h != handle);
        if self.pending.len() < before {
            self.cancelled += 1;
        }
    }
}
