// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_scroll_motion --heading-base-level=0

//! Understory Scroll Motion: smoothed, momentum-carrying scroll offsets driven by typed input.
//!
//! This crate turns discrete wheel, pointer and keyboard events into a scroll
//! offset that glides: input moves a target, the rendered offset eases toward
//! it every frame, and a fling keeps going for a moment after release.
//!
//! - [`ScrollMotion`] / [`MotionState`]: the target/current/velocity model.
//!   [`MotionState::step`] is a pure function, so motion can be tested by
//!   feeding synthetic ticks with no clock involved.
//! - [`InputQueue`] / [`InputDispatcher`]: a FIFO of [`InputEvent`]s drained at
//!   the start of each frame, and the mapping from each event to motion.
//! - [`DragTracker`]: per-move pointer deltas with timestamps.
//! - [`TimedFlag`]: booleans that switch off after a quiet period (fast mode,
//!   "is scrolling").
//! - [`ScrollFeedback`]: a normalized scroll speed and a tile scale that dips
//!   slightly while the surface moves quickly.
//!
//! Time is always supplied by the host as milliseconds in a `u64`; nothing
//! here reads a clock.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use understory_scroll_motion::{InputDispatcher, InputEvent, PointerKind, ScrollMotion};
//!
//! let mut motion = ScrollMotion::default();
//! let mut input = InputDispatcher::default();
//!
//! // Drag up by 40 px over two frames, then let go.
//! let mouse = PointerKind::Mouse;
//! input.dispatch(&InputEvent::PointerDown { position: Point::new(0.0, 100.0), kind: mouse }, 0, &mut motion);
//! input.dispatch(&InputEvent::PointerMove { position: Point::new(0.0, 80.0), kind: mouse }, 16, &mut motion);
//! input.dispatch(&InputEvent::PointerMove { position: Point::new(0.0, 60.0), kind: mouse }, 32, &mut motion);
//! input.dispatch(&InputEvent::PointerUp { position: Point::new(0.0, 60.0), kind: mouse }, 40, &mut motion);
//!
//! // Dragging up scrolls down: 40 px * 0.25.
//! assert!((motion.target().y - 10.0).abs() < 1e-9);
//!
//! // The fling carries the target further while the offset catches up.
//! let mut now = 40;
//! while !motion.tick().settled {
//!     now += 16;
//!     input.tick(now);
//! }
//! assert!(motion.offset().y > 10.0);
//! ```
//!
//! ## Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` for [`MotionParams`],
//!   [`InputParams`] and [`FeedbackParams`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod drag;
mod feedback;
mod input;
mod motion;
mod timer;

pub use drag::{DragSample, DragTracker};
pub use feedback::{FeedbackParams, ScrollFeedback};
pub use input::{
    ArrowKey, DispatchEffect, InputDispatcher, InputEvent, InputParams, InputQueue, PointerKind,
    TimedInput,
};
pub use motion::{MotionMode, MotionParams, MotionState, MotionTick, ScrollMotion};
pub use timer::TimedFlag;
