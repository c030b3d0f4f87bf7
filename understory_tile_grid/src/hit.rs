// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometric picking: which cell lies under a point in the view.
//!
//! Picking inverts the same mapping windowing uses. The column comes straight
//! from the horizontal offset; the row needs the column's speed multiplier to
//! undo parallax. Tiles are drawn inset inside their cells, so a point in the
//! gutter between two tiles picks nothing.
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use understory_tile_grid::{GridConfig, LogicalCell, pick_cell};
//!
//! let config = GridConfig::builder().palette_len(25).build().unwrap();
//! let offset = Vec2::new(10.0, 0.0);
//!
//! // 10 units into the view plus 10 of scroll is 20 units into column 0.
//! let hit = pick_cell(&config, offset, Point::new(10.0, 30.0)).unwrap();
//! assert_eq!(hit.cell, LogicalCell::new(0, 0));
//!
//! // Exactly on a column boundary is inside the inset gutter.
//! assert!(pick_cell(&config, offset, Point::new(15.0, 30.0)).is_none());
//! ```

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

use crate::config::GridConfig;
use crate::index::LogicalCell;
use crate::scalar::floor_index;
use crate::window::{VisibleCell, VisibleWindow};

/// Returns the cell whose tile contains `point`, given in view units.
///
/// Returns `None` if the point falls in the inset gutter around a tile or is
/// not finite.
#[must_use]
pub fn pick_cell(config: &GridConfig, offset: Vec2, point: Point) -> Option<VisibleCell> {
    if !(point.is_finite() && offset.is_finite()) {
        return None;
    }
    let cell = config.cell_size();
    let inset = config.cell_inset();

    let grid_x = (point.x + offset.x) / cell.width;
    let col = floor_index(grid_x);
    let speed = config.speed(col);
    let grid_y = (point.y + offset.y * speed) / cell.height;
    let row = floor_index(grid_y);

    let inside = |t: f64| {
        let frac = t - t.floor();
        frac >= inset && frac <= 1.0 - inset
    };
    if !(inside(grid_x) && inside(grid_y)) {
        return None;
    }
    Some(VisibleCell::resolve(config, LogicalCell::new(col, row)))
}

/// Like [`pick_cell`], but only reports cells realized in `window`.
#[must_use]
pub fn pick_in_window(
    config: &GridConfig,
    window: &VisibleWindow,
    point: Point,
) -> Option<VisibleCell> {
    let picked = pick_cell(config, window.offset(), point)?;
    window.get(picked.cell).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColumnSpeeds, compute_visible};

    fn parallax() -> GridConfig {
        GridConfig::builder()
            .palette_len(25)
            .column_speeds(ColumnSpeeds::missionary())
            .cell_inset(0.05)
            .build()
            .unwrap()
    }

    #[test]
    fn cell_centers_pick_back_to_their_cell() {
        let config = parallax();
        let offset = Vec2::new(-37.0, 512.0);
        let window = compute_visible(offset, &config);
        let size = config.cell_size();

        for visible in window.cells() {
            let origin = visible.origin_in_view(offset);
            let center = origin + Vec2::new(size.width / 2.0, size.height / 2.0);
            let picked = pick_in_window(&config, &window, center).unwrap();
            assert_eq!(picked.cell, visible.cell);
            assert_eq!(picked.content_index, visible.content_index);
        }
    }

    #[test]
    fn gutter_points_pick_nothing() {
        let config = parallax();
        let size = config.cell_size();
        // Column boundary at x = 25 with zero offset.
        assert!(pick_cell(&config, Vec2::ZERO, Point::new(size.width, 10.0)).is_none());
        // Just inside the inset on the left edge of column 1.
        let x = size.width + size.width * 0.04;
        assert!(pick_cell(&config, Vec2::ZERO, Point::new(x, 10.0)).is_none());
        let x = size.width + size.width * 0.06;
        assert_eq!(
            pick_cell(&config, Vec2::ZERO, Point::new(x, 10.0)).map(|c| c.cell),
            Some(LogicalCell::new(1, 0))
        );
    }

    #[test]
    fn picking_undoes_column_parallax() {
        let config = parallax();
        let size = config.cell_size();
        let offset = Vec2::new(0.0, 100.0);
        // Column 3 moves at 1.4x: 140 units scrolled, a point at y = 20 lands
        // 160 units down the column, in row 2.
        let x = 3.5 * size.width;
        let hit = pick_cell(&config, offset, Point::new(x, 20.0)).unwrap();
        assert_eq!(hit.cell, LogicalCell::new(3, 2));
        // Column 4 moves at 0.6x: 80 units down, row 1.
        let x = 4.5 * size.width;
        let hit = pick_cell(&config, offset, Point::new(x, 20.0)).unwrap();
        assert_eq!(hit.cell, LogicalCell::new(4, 1));
    }

    #[test]
    fn points_outside_the_window_are_not_realized() {
        let config = parallax();
        let window = compute_visible(Vec2::ZERO, &config);
        let far = Point::new(10_000.0, 10.0);
        assert!(pick_cell(&config, Vec2::ZERO, far).is_some());
        assert!(pick_in_window(&config, &window, far).is_none());
    }

    #[test]
    fn non_finite_points_pick_nothing() {
        let config = parallax();
        assert!(pick_cell(&config, Vec2::ZERO, Point::new(f64::NAN, 0.0)).is_none());
    }
}
