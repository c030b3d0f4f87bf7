// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed input events and their translation into motion.
//!
//! Hosts push [`InputEvent`]s into an [`InputQueue`] as they arrive. At the
//! start of each frame the queue is drained in arrival order and every event
//! is handed to [`InputDispatcher::dispatch`], which mutates the
//! [`ScrollMotion`] and reports what else the frame needs to react to.
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use understory_scroll_motion::{
//!     DispatchEffect, InputDispatcher, InputEvent, InputParams, InputQueue, ScrollMotion,
//! };
//!
//! let mut queue = InputQueue::new();
//! queue.push(InputEvent::Wheel { delta: Vec2::new(0.0, 100.0) }, 0);
//! queue.push(InputEvent::Click { position: Point::new(40.0, 40.0) }, 5);
//!
//! let mut motion = ScrollMotion::default();
//! let mut input = InputDispatcher::new(InputParams::default());
//! let effects: Vec<_> = queue
//!     .drain()
//!     .map(|e| input.dispatch(&e.event, e.time_ms, &mut motion))
//!     .collect();
//!
//! // 100 * 0.4 on the vertical axis.
//! assert_eq!(motion.target(), Vec2::new(0.0, 40.0));
//! assert_eq!(effects[1], DispatchEffect::Activate(Point::new(40.0, 40.0)));
//! assert!(input.is_fast(10));
//! ```

use alloc::collections::VecDeque;
use alloc::collections::vec_deque::Drain;

use kurbo::{Point, Size, Vec2};

use crate::drag::DragTracker;
use crate::feedback::{FeedbackParams, ScrollFeedback};
use crate::motion::ScrollMotion;
use crate::timer::TimedFlag;

/// Kind of device behind a pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Mouse or pen; keeps hovering after release.
    Mouse,
    /// Finger; nothing hovers once it lifts.
    Touch,
}

/// Arrow keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArrowKey {
    /// Up.
    Up,
    /// Down.
    Down,
    /// Left.
    Left,
    /// Right.
    Right,
}

/// One input event. Positions are in device pixels relative to the view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// Wheel or trackpad scroll by a raw delta.
    Wheel {
        /// Raw scroll delta.
        delta: Vec2,
    },
    /// A pointer pressed.
    PointerDown {
        /// Pointer position.
        position: Point,
        /// Device kind.
        kind: PointerKind,
    },
    /// A pointer moved, pressed or not.
    PointerMove {
        /// Pointer position.
        position: Point,
        /// Device kind.
        kind: PointerKind,
    },
    /// A pointer released.
    PointerUp {
        /// Pointer position.
        position: Point,
        /// Device kind.
        kind: PointerKind,
    },
    /// The pointer left the view.
    PointerLeave,
    /// The platform cancelled the gesture.
    PointerCancel,
    /// A click or tap completed.
    Click {
        /// Click position.
        position: Point,
    },
    /// An arrow key was pressed.
    Key(ArrowKey),
    /// The view changed size.
    Resize(Size),
}

/// An event stamped with host time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedInput {
    /// Host time in milliseconds.
    pub time_ms: u64,
    /// The event.
    pub event: InputEvent,
}

/// First-in, first-out buffer of input awaiting the next frame.
#[derive(Clone, Debug, Default)]
pub struct InputQueue {
    events: VecDeque<TimedInput>,
}

impl InputQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event received at `time_ms`.
    pub fn push(&mut self, event: InputEvent, time_ms: u64) {
        self.events.push_back(TimedInput { time_ms, event });
    }

    /// Removes and yields all queued events in arrival order.
    pub fn drain(&mut self) -> Drain<'_, TimedInput> {
        self.events.drain(..)
    }

    /// Number of queued events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drops all queued events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// Input sensitivities and timings.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InputParams {
    /// Per-axis scale from raw wheel delta to viewport units.
    pub wheel_sensitivity: Vec2,
    /// Fraction of each wheel step also added to velocity.
    pub wheel_momentum: f64,
    /// Per-axis scale from pointer pixels to viewport units. Negative so the
    /// content follows the pointer.
    pub drag_sensitivity: Vec2,
    /// Fraction of the last drag step kept as velocity.
    pub drag_momentum: f64,
    /// Sensitivity multiplier while fast mode is on.
    pub fast_multiplier: f64,
    /// Arrow key step in viewport units.
    pub key_step: f64,
    /// Arrow key step while fast mode is on.
    pub fast_key_step: f64,
    /// How long a click keeps fast mode on.
    pub fast_mode_ms: u64,
    /// Quiet period after which the surface stops counting as scrolling.
    pub scrolling_quiet_ms: u64,
    /// A drag longer than this, in pixels, does not end in an activation.
    pub click_slop: f64,
    /// Scroll-speed feedback tuning.
    pub feedback: FeedbackParams,
}

impl Default for InputParams {
    fn default() -> Self {
        Self {
            wheel_sensitivity: Vec2::new(0.05, 0.4),
            wheel_momentum: 0.3,
            drag_sensitivity: Vec2::new(-0.05, -0.25),
            drag_momentum: 0.8,
            fast_multiplier: 2.5,
            key_step: 5.0,
            fast_key_step: 15.0,
            fast_mode_ms: 2_000,
            scrolling_quiet_ms: 150,
            click_slop: 4.0,
            feedback: FeedbackParams::default(),
        }
    }
}

/// What a dispatched event asks of the rest of the frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DispatchEffect {
    /// Nothing beyond the motion change.
    None,
    /// The view was resized.
    Resized(Size),
    /// The pointer is at this position; re-evaluate hover.
    Hover(Point),
    /// Activate whatever is under this position.
    Activate(Point),
    /// The pointer is gone; clear hover.
    PointerLeft,
}

/// Turns input events into motion.
///
/// Owns the drag tracker, the fast-mode and scrolling timers, and the
/// scroll-speed feedback, so the only state shared with the rest of the frame
/// is the [`ScrollMotion`] passed to [`dispatch`](Self::dispatch).
#[derive(Clone, Debug)]
pub struct InputDispatcher {
    params: InputParams,
    drag: DragTracker,
    fast: TimedFlag,
    scrolling: TimedFlag,
    feedback: ScrollFeedback,
    last_drag_travel: f64,
}

impl Default for InputDispatcher {
    fn default() -> Self {
        Self::new(InputParams::default())
    }
}

impl InputDispatcher {
    /// Creates a dispatcher with the given tuning.
    #[must_use]
    pub fn new(params: InputParams) -> Self {
        Self {
            params,
            drag: DragTracker::default(),
            fast: TimedFlag::new(params.fast_mode_ms),
            scrolling: TimedFlag::new(params.scrolling_quiet_ms),
            feedback: ScrollFeedback::new(params.feedback),
            last_drag_travel: 0.0,
        }
    }

    /// Tuning in use.
    #[must_use]
    pub fn params(&self) -> &InputParams {
        &self.params
    }

    /// Returns `true` while fast mode is on.
    #[must_use]
    pub fn is_fast(&self, now_ms: u64) -> bool {
        self.fast.is_active(now_ms)
    }

    /// Returns `true` within the quiet period after the last scroll input.
    #[must_use]
    pub fn is_scrolling(&self, now_ms: u64) -> bool {
        self.scrolling.is_active(now_ms)
    }

    /// Returns `true` while a drag gesture is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Scroll-speed feedback state.
    #[must_use]
    pub fn feedback(&self) -> &ScrollFeedback {
        &self.feedback
    }

    /// Expires timers and eases the feedback scale by one frame. Returns the
    /// tile scale for this frame.
    pub fn tick(&mut self, now_ms: u64) -> f64 {
        if self.fast.poll(now_ms) {
            tracing::debug!(now_ms, "fast mode off");
        }
        self.scrolling.poll(now_ms);
        self.feedback.tick(now_ms)
    }

    /// Applies one event to `motion`.
    pub fn dispatch(
        &mut self,
        event: &InputEvent,
        now_ms: u64,
        motion: &mut ScrollMotion,
    ) -> DispatchEffect {
        match *event {
            InputEvent::Wheel { delta } => {
                let step = scale(delta * self.multiplier(now_ms), self.params.wheel_sensitivity);
                motion.nudge_target(step);
                motion.add_velocity(step * self.params.wheel_momentum);
                self.scrolling.trigger(now_ms);
                self.feedback.on_wheel(delta, now_ms);
                DispatchEffect::None
            }
            InputEvent::PointerDown { position, .. } => {
                self.drag.start(position, now_ms);
                self.last_drag_travel = 0.0;
                motion.begin_drag();
                DispatchEffect::Hover(position)
            }
            InputEvent::PointerMove { position, .. } => {
                if let Some(sample) = self.drag.update(position, now_ms) {
                    let step = scale(
                        sample.delta * self.multiplier(now_ms),
                        self.params.drag_sensitivity,
                    );
                    motion.nudge_target(step);
                    motion.set_velocity(step * self.params.drag_momentum);
                    self.scrolling.trigger(now_ms);
                    self.feedback.on_drag(&sample, now_ms);
                }
                DispatchEffect::Hover(position)
            }
            InputEvent::PointerUp { position, kind } => {
                self.end_drag(now_ms, motion);
                match kind {
                    PointerKind::Mouse => DispatchEffect::Hover(position),
                    PointerKind::Touch => DispatchEffect::PointerLeft,
                }
            }
            InputEvent::PointerLeave | InputEvent::PointerCancel => {
                self.end_drag(now_ms, motion);
                DispatchEffect::PointerLeft
            }
            InputEvent::Click { position } => {
                let travelled = core::mem::take(&mut self.last_drag_travel);
                if self.drag.is_dragging() || travelled > self.params.click_slop {
                    return DispatchEffect::None;
                }
                if !self.fast.is_active(now_ms) {
                    tracing::debug!(now_ms, "fast mode on");
                }
                self.fast.trigger(now_ms);
                DispatchEffect::Activate(position)
            }
            InputEvent::Key(key) => {
                let step = if self.fast.is_active(now_ms) {
                    self.params.fast_key_step
                } else {
                    self.params.key_step
                };
                let delta = match key {
                    ArrowKey::Up => Vec2::new(0.0, -step),
                    ArrowKey::Down => Vec2::new(0.0, step),
                    ArrowKey::Left => Vec2::new(-step, 0.0),
                    ArrowKey::Right => Vec2::new(step, 0.0),
                };
                motion.nudge_target(delta);
                self.scrolling.trigger(now_ms);
                DispatchEffect::None
            }
            InputEvent::Resize(size) => DispatchEffect::Resized(size),
        }
    }

    fn multiplier(&self, now_ms: u64) -> f64 {
        if self.fast.is_active(now_ms) {
            self.params.fast_multiplier
        } else {
            1.0
        }
    }

    fn end_drag(&mut self, now_ms: u64, motion: &mut ScrollMotion) {
        if let Some(travelled) = self.drag.end() {
            self.last_drag_travel = travelled;
            motion.end_drag();
            self.feedback.on_release(now_ms);
        }
    }
}

fn scale(v: Vec2, by: Vec2) -> Vec2 {
    Vec2::new(v.x * by.x, v.y * by.y)
}
