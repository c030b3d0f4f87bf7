// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-speed feedback: tiles shrink slightly while the surface moves fast.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Vec2;

use crate::drag::DragSample;

/// Tuning constants for [`ScrollFeedback`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FeedbackParams {
    /// Speed per unit of wheel delta magnitude.
    pub wheel_gain: f64,
    /// Speed per unit of drag speed, measured in units per reference frame.
    pub drag_gain: f64,
    /// Reference frame length used to express drag speed, in milliseconds.
    pub frame_ms: f64,
    /// Speed drops to zero this long after the last wheel or move event.
    pub input_reset_ms: u64,
    /// Speed drops to zero this long after the pointer is released.
    pub release_reset_ms: u64,
    /// Scale reduction at full speed.
    pub scale_depth: f64,
    /// Scale smoothing while the speed is non-zero.
    pub scale_lerp_moving: f64,
    /// Scale smoothing at rest.
    pub scale_lerp_rest: f64,
    /// The scale lands on its target once closer than this.
    pub scale_snap: f64,
}

impl Default for FeedbackParams {
    fn default() -> Self {
        Self {
            wheel_gain: 0.008,
            drag_gain: 0.1,
            frame_ms: 16.0,
            input_reset_ms: 100,
            release_reset_ms: 150,
            scale_depth: 0.09,
            scale_lerp_moving: 0.08,
            scale_lerp_rest: 0.15,
            scale_snap: 1e-3,
        }
    }
}

/// Normalized scroll speed and the tile scale eased from it.
///
/// Input events set the speed in `[0, 1]`; it falls back to zero after a short
/// quiet period. Every frame, [`tick`](Self::tick) eases the scale toward
/// `1 - speed * scale_depth`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollFeedback {
    params: FeedbackParams,
    speed: f64,
    reset_at_ms: Option<u64>,
    scale: f64,
}

impl Default for ScrollFeedback {
    fn default() -> Self {
        Self::new(FeedbackParams::default())
    }
}

impl ScrollFeedback {
    /// Creates feedback at rest with scale `1.0`.
    #[must_use]
    pub fn new(params: FeedbackParams) -> Self {
        Self {
            params,
            speed: 0.0,
            reset_at_ms: None,
            scale: 1.0,
        }
    }

    /// Normalized speed in `[0, 1]`.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Current tile scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Scale the current speed eases toward.
    #[must_use]
    pub fn target_scale(&self) -> f64 {
        1.0 - self.speed * self.params.scale_depth
    }

    /// Records a wheel event with raw `delta`.
    pub fn on_wheel(&mut self, delta: Vec2, now_ms: u64) {
        self.speed = (delta.hypot() * self.params.wheel_gain).min(1.0);
        self.reset_at_ms = Some(now_ms.saturating_add(self.params.input_reset_ms));
    }

    /// Records a drag move.
    pub fn on_drag(&mut self, sample: &DragSample, now_ms: u64) {
        let per_frame = sample.speed() * self.params.frame_ms;
        self.speed = (per_frame * self.params.drag_gain).min(1.0);
        self.reset_at_ms = Some(now_ms.saturating_add(self.params.input_reset_ms));
    }

    /// Records the end of a drag.
    pub fn on_release(&mut self, now_ms: u64) {
        self.reset_at_ms = Some(now_ms.saturating_add(self.params.release_reset_ms));
    }

    /// Expires the speed if due, then eases the scale one frame.
    pub fn tick(&mut self, now_ms: u64) -> f64 {
        if self.reset_at_ms.is_some_and(|at| now_ms >= at) {
            self.speed = 0.0;
            self.reset_at_ms = None;
        }
        let lerp = if self.speed == 0.0 {
            self.params.scale_lerp_rest
        } else {
            self.params.scale_lerp_moving
        };
        let target = self.target_scale();
        if (target - self.scale).abs() < self.params.scale_snap {
            self.scale = target;
        } else {
            self.scale += (target - self.scale) * lerp;
        }
        self.scale
    }
}
