// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for wraparound indexing and windowing.
//!
//! These check the invariants hosts rely on for any offset:
//!
//! 1. Wrapping lands in `[0, period)` and is congruent to its input.
//! 2. Content is a pure function of the wrapped cell.
//! 3. A window never holds more than `max_visible_cells` cells.
//! 4. Every cell in a window is unique and covers the viewport.
//! 5. Picking the center of any realized tile returns that tile.

use core::num::NonZeroU32;

use kurbo::{Point, Vec2};
use proptest::prelude::*;
use understory_tile_grid::{
    ColumnSpeeds, GridConfig, LogicalCell, compute_visible, content_index_of, pick_cell,
    pick_in_window, wrap,
};

fn speeds_strategy() -> impl Strategy<Value = ColumnSpeeds> {
    prop_oneof![
        Just(ColumnSpeeds::uniform()),
        Just(ColumnSpeeds::missionary()),
        Just(ColumnSpeeds::drifting()),
        Just(ColumnSpeeds::slow_drift()),
        prop::collection::vec(0.05_f64..3.0, 1..8).prop_map(ColumnSpeeds::from_multipliers),
    ]
}

fn config_strategy() -> impl Strategy<Value = GridConfig> {
    (
        1_u32..9,
        1_u32..9,
        0.5_f64..8.0,
        0.5_f64..8.0,
        1_u32..5,
        1_usize..40,
        speeds_strategy(),
    )
        .prop_map(|(cols, rows, vis_cols, vis_rows, buffer, palette, speeds)| {
            GridConfig::builder()
                .period(cols, rows)
                .visible(vis_cols, vis_rows)
                .buffer(buffer)
                .palette_len(palette)
                .column_speeds(speeds)
                .build()
                .unwrap()
        })
}

fn offset_strategy() -> impl Strategy<Value = Vec2> {
    (-1.0e6_f64..1.0e6, -1.0e6_f64..1.0e6).prop_map(|(x, y)| Vec2::new(x, y))
}

proptest! {
    #[test]
    fn wrap_is_in_range_and_congruent(n in any::<i64>(), period in 1_u32..10_000) {
        let p = NonZeroU32::new(period).unwrap();
        let w = wrap(n, p);
        prop_assert!(w < period);
        let diff = i128::from(n) - i128::from(w);
        prop_assert_eq!(diff.rem_euclid(i128::from(period)), 0);
    }
}

proptest! {
    #[test]
    fn content_depends_only_on_wrapped_cell(
        config in config_strategy(),
        col in -1_000_i64..1_000,
        row in -1_000_i64..1_000,
        k in -50_i64..50,
    ) {
        let cols = i64::from(config.cols().get());
        let rows = i64::from(config.rows().get());
        let a = LogicalCell::new(col, row);
        let b = LogicalCell::new(col + k * cols, row - k * rows);
        let wa = a.wrapped(config.cols(), config.rows());
        let wb = b.wrapped(config.cols(), config.rows());
        prop_assert_eq!(wa, wb);
        prop_assert_eq!(
            content_index_of(wa, config.rows(), config.palette_len()),
            content_index_of(wb, config.rows(), config.palette_len())
        );
    }
}

proptest! {
    #[test]
    fn window_size_is_bounded(config in config_strategy(), offset in offset_strategy()) {
        let window = compute_visible(offset, &config);
        prop_assert!(
            window.len() <= config.max_visible_cells(),
            "{} cells exceeds bound {} at {:?}",
            window.len(),
            config.max_visible_cells(),
            offset
        );
    }
}

proptest! {
    #[test]
    fn window_cells_are_unique_and_consistent(
        config in config_strategy(),
        offset in offset_strategy(),
    ) {
        let window = compute_visible(offset, &config);
        let mut seen: Vec<LogicalCell> = window.cells().iter().map(|c| c.cell).collect();
        seen.sort();
        seen.dedup();
        prop_assert_eq!(seen.len(), window.len());

        for visible in window.cells() {
            let actual = visible.cell.wrapped(config.cols(), config.rows());
            prop_assert_eq!(visible.actual, actual);
            prop_assert_eq!(
                visible.content_index,
                content_index_of(actual, config.rows(), config.palette_len())
            );
            prop_assert_eq!(window.get(visible.cell), Some(visible));
        }
    }
}

proptest! {
    #[test]
    fn every_viewport_point_is_realized(
        config in config_strategy(),
        offset in offset_strategy(),
        px in 0.0_f64..100.0,
        py in 0.0_f64..100.0,
    ) {
        let window = compute_visible(offset, &config);
        if let Some(hit) = pick_cell(&config, offset, Point::new(px, py)) {
            prop_assert!(window.contains(hit.cell), "{:?} not realized", hit.cell);
        }
    }
}

proptest! {
    #[test]
    fn tile_centers_pick_their_own_cell(
        config in config_strategy(),
        offset in offset_strategy(),
    ) {
        let window = compute_visible(offset, &config);
        let size = config.cell_size();
        for visible in window.cells() {
            let center = visible.origin_in_view(offset)
                + Vec2::new(size.width / 2.0, size.height / 2.0);
            let picked = pick_in_window(&config, &window, center);
            prop_assert_eq!(picked.map(|c| c.cell), Some(visible.cell));
        }
    }
}
