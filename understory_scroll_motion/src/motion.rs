// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Target/current smoothing with velocity decay.
//!
//! Input never moves the rendered offset directly. It moves a *target*, and
//! every tick the *current* offset closes a fixed fraction of the gap. While
//! idle, residual velocity keeps pushing the target and decays
//! geometrically, which gives flings a soft landing.
//!
//! ```rust
//! use kurbo::Vec2;
//! use understory_scroll_motion::{MotionParams, ScrollMotion};
//!
//! let mut motion = ScrollMotion::new(MotionParams::default());
//! motion.nudge_target(Vec2::new(0.0, 40.0));
//!
//! let first = motion.tick();
//! assert!((first.offset.y - 6.0).abs() < 1e-9); // 40 * 0.15
//! assert!(!first.settled);
//!
//! let mut ticks = 1;
//! while !motion.tick().settled {
//!     ticks += 1;
//! }
//! assert!(ticks < 60);
//! assert!((motion.offset().y - 40.0).abs() < 0.1);
//! ```

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Vec2;

/// Tuning constants for [`MotionState::step`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionParams {
    /// Fraction of the target gap closed per tick while dragging.
    pub lerp_dragging: f64,
    /// Fraction of the target gap closed per tick while idle.
    pub lerp_idle: f64,
    /// Per-tick velocity multiplier while idle.
    pub velocity_decay: f64,
    /// Gap and velocity below which motion counts as settled, per axis.
    pub settle_threshold: f64,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            lerp_dragging: 0.25,
            lerp_idle: 0.15,
            velocity_decay: 0.95,
            settle_threshold: 0.1,
        }
    }
}

impl MotionParams {
    /// Smoothing factor for `mode`.
    #[must_use]
    pub fn lerp_for(&self, mode: MotionMode) -> f64 {
        match mode {
            MotionMode::Idle => self.lerp_idle,
            MotionMode::Dragging => self.lerp_dragging,
        }
    }
}

/// Whether a pointer is holding the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MotionMode {
    /// No pointer held; velocity carries the target.
    #[default]
    Idle,
    /// A pointer is held; the target follows it and velocity is frozen.
    Dragging,
}

/// Complete motion state. [`step`](Self::step) is a pure function of it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionState {
    /// Where input wants the offset to be.
    pub target: Vec2,
    /// The rendered offset.
    pub current: Vec2,
    /// Residual momentum added to `target` each idle tick.
    pub velocity: Vec2,
    /// Idle or dragging.
    pub mode: MotionMode,
}

impl MotionState {
    /// A state resting at `offset`.
    #[must_use]
    pub fn at_rest(offset: Vec2) -> Self {
        Self {
            target: offset,
            current: offset,
            ..Self::default()
        }
    }

    /// Advances one tick.
    ///
    /// While idle the target first drifts by the velocity, which then decays.
    /// In both modes the current offset then moves toward the target by the
    /// mode's smoothing factor.
    #[must_use]
    pub fn step(&self, params: &MotionParams) -> Self {
        let mut next = *self;
        if next.mode == MotionMode::Idle {
            next.target += next.velocity;
            next.velocity *= params.velocity_decay;
        }
        next.current += (next.target - next.current) * params.lerp_for(next.mode);
        next
    }

    /// Returns `true` once both the remaining gap and the velocity are under
    /// the threshold on each axis.
    #[must_use]
    pub fn is_settled(&self, params: &MotionParams) -> bool {
        let gap = self.target - self.current;
        let t = params.settle_threshold;
        gap.x.abs() < t && gap.y.abs() < t && self.velocity.x.abs() < t && self.velocity.y.abs() < t
    }
}

/// Outcome of one [`ScrollMotion::tick`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionTick {
    /// The offset after the tick.
    pub offset: Vec2,
    /// How far the offset moved during the tick.
    pub delta: Vec2,
    /// Whether motion has come to rest.
    pub settled: bool,
}

/// Owner of the scroll offset.
///
/// Input handlers mutate the target and velocity through this type; only
/// [`tick`](Self::tick) moves the rendered offset.
#[derive(Clone, Debug, Default)]
pub struct ScrollMotion {
    state: MotionState,
    params: MotionParams,
}

impl ScrollMotion {
    /// Creates a motion model resting at the origin.
    #[must_use]
    pub fn new(params: MotionParams) -> Self {
        Self {
            state: MotionState::default(),
            params,
        }
    }

    /// The full state.
    #[must_use]
    pub fn state(&self) -> &MotionState {
        &self.state
    }

    /// Tuning constants in use.
    #[must_use]
    pub fn params(&self) -> &MotionParams {
        &self.params
    }

    /// Replaces the tuning constants; takes effect on the next tick.
    pub fn set_params(&mut self, params: MotionParams) {
        self.params = params;
    }

    /// The rendered offset.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.state.current
    }

    /// The offset input is steering toward.
    #[must_use]
    pub fn target(&self) -> Vec2 {
        self.state.target
    }

    /// Residual momentum.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.state.velocity
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> MotionMode {
        self.state.mode
    }

    /// Returns `true` while a pointer holds the surface.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.state.mode == MotionMode::Dragging
    }

    /// Returns `true` if the last known state is at rest.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.state.is_settled(&self.params)
    }

    /// Enters dragging mode and discards any momentum.
    pub fn begin_drag(&mut self) {
        self.state.mode = MotionMode::Dragging;
        self.state.velocity = Vec2::ZERO;
    }

    /// Returns to idle; the last drag velocity carries on and decays.
    pub fn end_drag(&mut self) {
        self.state.mode = MotionMode::Idle;
    }

    /// Moves the target by `delta`.
    pub fn nudge_target(&mut self, delta: Vec2) {
        self.state.target += delta;
    }

    /// Adds to the residual momentum.
    pub fn add_velocity(&mut self, delta: Vec2) {
        self.state.velocity += delta;
    }

    /// Replaces the residual momentum.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.state.velocity = velocity;
    }

    /// Moves both target and offset to `offset` and stops all motion.
    pub fn jump_to(&mut self, offset: Vec2) {
        self.state = MotionState {
            mode: self.state.mode,
            ..MotionState::at_rest(offset)
        };
    }

    /// Advances the model by one display frame.
    ///
    /// On the frame motion settles, the offset snaps onto the target and the
    /// residual velocity is dropped, so later ticks report a zero delta until
    /// input arrives.
    pub fn tick(&mut self) -> MotionTick {
        let before = self.state.current;
        self.state = self.state.step(&self.params);
        let settled = self.state.is_settled(&self.params);
        if settled {
            self.state.current = self.state.target;
            self.state.velocity = Vec2::ZERO;
        }
        MotionTick {
            offset: self.state.current,
            delta: self.state.current - before,
            settled,
        }
    }
}
