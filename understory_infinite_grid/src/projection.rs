// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Size};

/// How viewport units stretch over a view that is not square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AspectMode {
    /// Both axes span exactly `viewport_units`, whatever the view's shape.
    ///
    /// Tiles stretch with the view and resizing never changes which cells are
    /// visible.
    #[default]
    Stretch,
    /// The vertical axis spans `viewport_units`; the horizontal span follows
    /// the view's aspect ratio.
    ///
    /// Tiles keep their shape and a wider view shows more columns, like an
    /// orthographic camera with a fixed height.
    FixedHeight,
}

/// Mapping between device pixels and viewport units.
///
/// The grid and its hit testing work in viewport units; pointers arrive in
/// device pixels relative to the view. `GridProjection` tracks the view
/// rectangle and the [`AspectMode`] and keeps both directions of the affine
/// mapping up to date.
///
/// ```rust
/// use kurbo::{Point, Rect};
/// use understory_infinite_grid::{AspectMode, GridProjection};
///
/// let mut projection = GridProjection::new(Rect::new(0.0, 0.0, 800.0, 400.0), 100.0, AspectMode::Stretch);
/// assert_eq!(projection.device_to_units(Point::new(400.0, 200.0)), Point::new(50.0, 50.0));
///
/// projection.set_aspect(AspectMode::FixedHeight);
/// assert_eq!(projection.visible_extent().width, 200.0);
/// ```
#[derive(Clone, Debug)]
pub struct GridProjection {
    view_rect: Rect,
    viewport_units: f64,
    aspect: AspectMode,
    units_to_device: Affine,
    device_to_units: Affine,
}

impl GridProjection {
    /// Creates a projection for a view covering `view_rect` in device pixels.
    #[must_use]
    pub fn new(view_rect: Rect, viewport_units: f64, aspect: AspectMode) -> Self {
        let mut projection = Self {
            view_rect,
            viewport_units,
            aspect,
            units_to_device: Affine::IDENTITY,
            device_to_units: Affine::IDENTITY,
        };
        projection.rebuild_transforms();
        projection
    }

    /// The view rectangle in device pixels.
    #[must_use]
    pub fn view_rect(&self) -> Rect {
        self.view_rect
    }

    /// Sets the view rectangle. Returns `true` if it changed.
    pub fn set_view_rect(&mut self, rect: Rect) -> bool {
        if self.view_rect == rect {
            return false;
        }
        self.view_rect = rect;
        self.rebuild_transforms();
        true
    }

    /// Current aspect mode.
    #[must_use]
    pub fn aspect(&self) -> AspectMode {
        self.aspect
    }

    /// Switches the aspect mode.
    pub fn set_aspect(&mut self, aspect: AspectMode) {
        if self.aspect != aspect {
            self.aspect = aspect;
            self.rebuild_transforms();
        }
    }

    /// Viewport units along the fixed axis.
    #[must_use]
    pub fn viewport_units(&self) -> f64 {
        self.viewport_units
    }

    /// The region of the grid plane the view shows, in viewport units.
    ///
    /// This is the extent windowing must cover. A degenerate view falls back
    /// to the square `viewport_units` extent.
    #[must_use]
    pub fn visible_extent(&self) -> Size {
        let units = self.viewport_units;
        let view = self.view_rect.size();
        match self.aspect {
            AspectMode::FixedHeight if view.width > 0.0 && view.height > 0.0 => {
                Size::new(units * view.width / view.height, units)
            }
            _ => Size::new(units, units),
        }
    }

    /// Converts a device-space point into viewport units.
    #[must_use]
    pub fn device_to_units(&self, point: Point) -> Point {
        self.device_to_units * point
    }

    /// Converts a point in viewport units into device space.
    #[must_use]
    pub fn units_to_device(&self, point: Point) -> Point {
        self.units_to_device * point
    }

    /// Converts a rectangle in viewport units into device space.
    #[must_use]
    pub fn units_to_device_rect(&self, rect: Rect) -> Rect {
        // Axis-aligned with positive scales, so the corners stay ordered.
        Rect::from_points(
            self.units_to_device(rect.origin()),
            self.units_to_device(Point::new(rect.x1, rect.y1)),
        )
    }

    /// The affine mapping viewport units to device pixels.
    #[must_use]
    pub fn units_to_device_transform(&self) -> Affine {
        self.units_to_device
    }

    fn rebuild_transforms(&mut self) {
        let view = self.view_rect.size();
        let extent = self.visible_extent();
        if !(view.width > 0.0 && view.height > 0.0 && extent.width > 0.0) {
            self.units_to_device = Affine::translate(self.view_rect.origin().to_vec2());
            self.device_to_units = self.units_to_device.inverse();
            return;
        }
        let sx = view.width / extent.width;
        let sy = view.height / extent.height;
        // Units -> device: scale into pixels, then move into the view rect.
        self.units_to_device = Affine::translate(self.view_rect.origin().to_vec2())
            * Affine::scale_non_uniform(sx, sy);
        self.device_to_units = self.units_to_device.inverse();
    }
}
