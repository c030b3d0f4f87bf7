// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boolean flags that switch themselves off after a quiet period.

/// A flag that stays on for a fixed duration after its last trigger.
///
/// Time is supplied by the host in milliseconds, so the flag works the same
/// under a real clock and a test's synthetic one. Re-triggering an active flag
/// pushes its deadline back.
///
/// ```rust
/// use understory_scroll_motion::TimedFlag;
///
/// let mut fast = TimedFlag::new(2_000);
/// fast.trigger(500);
/// assert!(fast.is_active(2_499));
/// assert!(!fast.is_active(2_500));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimedFlag {
    duration_ms: u64,
    deadline_ms: Option<u64>,
}

impl TimedFlag {
    /// Creates an inactive flag with the given hold duration.
    #[must_use]
    pub const fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            deadline_ms: None,
        }
    }

    /// How long the flag holds after a trigger.
    #[must_use]
    pub const fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// When the flag will switch off, if it is armed.
    #[must_use]
    pub const fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// Turns the flag on until `now_ms + duration`.
    pub fn trigger(&mut self, now_ms: u64) {
        self.deadline_ms = Some(now_ms.saturating_add(self.duration_ms));
    }

    /// Returns `true` if the flag is on at `now_ms`.
    #[must_use]
    pub fn is_active(&self, now_ms: u64) -> bool {
        self.deadline_ms.is_some_and(|deadline| now_ms < deadline)
    }

    /// Disarms an expired flag. Returns `true` exactly once per expiry.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }

    /// Switches the flag off immediately.
    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }
}
