// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame scheduling seam between the engine and the host's display loop.

/// Host-provided source of display frames.
///
/// The engine never reads a clock or registers callbacks itself. It asks the
/// scheduler to start delivering frames when it starts and to stop at
/// teardown; the host calls [`GridEngine::tick`](crate::GridEngine::tick) with
/// the frame time whenever a frame arrives while the scheduler is running.
pub trait FrameScheduler {
    /// Begins requesting frames.
    fn start(&mut self);

    /// Stops requesting frames. Must be idempotent.
    fn stop(&mut self);

    /// Returns `true` between [`start`](Self::start) and [`stop`](Self::stop).
    fn is_running(&self) -> bool;
}

/// A deterministic scheduler that produces frames on demand at a fixed
/// interval.
///
/// Used by headless hosts and tests: the caller pulls frame times with
/// [`next_frame`](Self::next_frame) instead of waiting for a display.
///
/// ```rust
/// use understory_infinite_grid::{FrameScheduler, ManualScheduler};
///
/// let mut frames = ManualScheduler::new(16);
/// assert_eq!(frames.next_frame(), None);
///
/// frames.start();
/// assert_eq!(frames.next_frame(), Some(0));
/// assert_eq!(frames.next_frame(), Some(16));
///
/// frames.stop();
/// assert_eq!(frames.next_frame(), None);
/// ```
#[derive(Clone, Debug)]
pub struct ManualScheduler {
    frame_ms: u64,
    now_ms: u64,
    running: bool,
    frames: u64,
}

impl Default for ManualScheduler {
    /// Roughly 60 frames per second.
    fn default() -> Self {
        Self::new(16)
    }
}

impl ManualScheduler {
    /// Creates a stopped scheduler whose frames are `frame_ms` apart,
    /// starting at time zero.
    #[must_use]
    pub fn new(frame_ms: u64) -> Self {
        Self {
            frame_ms,
            now_ms: 0,
            running: false,
            frames: 0,
        }
    }

    /// Time of the next frame.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of frames handed out so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Skips ahead without producing frames, like a host that was suspended.
    pub fn advance(&mut self, ms: u64) {
        self.now_ms = self.now_ms.saturating_add(ms);
    }

    /// Returns the time of the next frame, or `None` while stopped.
    pub fn next_frame(&mut self) -> Option<u64> {
        if !self.running {
            return None;
        }
        let now = self.now_ms;
        self.now_ms = self.now_ms.saturating_add(self.frame_ms);
        self.frames += 1;
        Some(now)
    }
}

impl FrameScheduler for ManualScheduler {
    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
