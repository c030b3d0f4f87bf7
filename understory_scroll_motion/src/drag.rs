// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag tracking with timestamps: per-move deltas, elapsed time, and distance travelled.
//!
//! ## Usage
//!
//! 1) Call [`DragTracker::start`] on pointer down with the position and host time.
//! 2) On each move, [`DragTracker::update`] returns a [`DragSample`]: the delta
//!    since the previous move and the time it took.
//! 3) [`DragTracker::end`] stops tracking and reports how far the pointer
//!    travelled, which lets callers tell a click from a short drag.
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_scroll_motion::DragTracker;
//!
//! let mut drag = DragTracker::default();
//! drag.start(Point::new(10.0, 20.0), 1_000);
//!
//! let sample = drag.update(Point::new(13.0, 24.0), 1_016).unwrap();
//! assert_eq!(sample.delta, Vec2::new(3.0, 4.0));
//! assert_eq!(sample.elapsed_ms, 16);
//!
//! assert_eq!(drag.end(), Some(5.0));
//! assert!(!drag.is_dragging());
//! ```

use kurbo::{Point, Vec2};

/// One pointer move during a drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSample {
    /// Movement since the previous sample, in pointer units.
    pub delta: Vec2,
    /// Time since the previous sample, at least one millisecond.
    pub elapsed_ms: u64,
}

impl DragSample {
    /// Pointer speed in units per millisecond.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.delta.hypot() / self.elapsed_ms as f64
    }
}

/// Tracks one drag gesture at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragTracker {
    /// Where the current drag started.
    pub start_pos: Option<Point>,
    /// Last recorded pointer position.
    pub last_pos: Option<Point>,
    /// Host time of the last recorded position, in milliseconds.
    pub last_time_ms: u64,
    /// Path length covered since the drag started.
    pub travelled: f64,
}

impl DragTracker {
    /// Starts tracking a new drag at `pos`, replacing any drag in progress.
    pub fn start(&mut self, pos: Point, now_ms: u64) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
        self.last_time_ms = now_ms;
        self.travelled = 0.0;
    }

    /// Records a move and returns the sample since the previous one.
    ///
    /// Returns `None` when no drag is active.
    pub fn update(&mut self, pos: Point, now_ms: u64) -> Option<DragSample> {
        self.start_pos?;
        let Some(last_pos) = self.last_pos else {
            self.last_pos = Some(pos);
            self.last_time_ms = now_ms;
            return None;
        };
        let delta = pos - last_pos;
        let elapsed_ms = now_ms.saturating_sub(self.last_time_ms).max(1);
        self.last_pos = Some(pos);
        self.last_time_ms = now_ms;
        self.travelled += delta.hypot();
        Some(DragSample { delta, elapsed_ms })
    }

    /// Offset of `current_pos` from the drag start.
    #[must_use]
    pub fn total_offset(&self, current_pos: Point) -> Option<Vec2> {
        self.start_pos.map(|start| current_pos - start)
    }

    /// Stops tracking and returns the distance travelled, or `None` if no
    /// drag was active.
    pub fn end(&mut self) -> Option<f64> {
        self.start_pos?;
        let travelled = self.travelled;
        *self = Self::default();
        Some(travelled)
    }

    /// Returns `true` while a drag is being tracked.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.start_pos.is_some()
    }
}
