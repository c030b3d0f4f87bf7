// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reconciliation invariants over arbitrary scroll trajectories.
//!
//! 1. The number of assigned cells never exceeds `max_visible_cells`.
//! 2. No slot (and no drawable) is assigned to two cells at once.
//! 3. Every slot is either assigned or idle, never both and never neither.
//! 4. Every assigned cell shows the content its wrapped cell selects.

use std::collections::HashSet;

use kurbo::Vec2;
use proptest::prelude::*;
use understory_tile_grid::{ColumnSpeeds, GridConfig, compute_visible};
use understory_tile_pool::{Assignments, RecordingSurface, SlotState, TilePool};

fn config_strategy() -> impl Strategy<Value = GridConfig> {
    (
        1_u32..8,
        1_u32..8,
        1.0_f64..6.0,
        1.0_f64..4.0,
        1_u32..5,
        prop_oneof![
            Just(ColumnSpeeds::uniform()),
            Just(ColumnSpeeds::missionary()),
            Just(ColumnSpeeds::slow_drift()),
        ],
    )
        .prop_map(|(cols, rows, vis_cols, vis_rows, buffer, speeds)| {
            GridConfig::builder()
                .period(cols, rows)
                .visible(vis_cols, vis_rows)
                .buffer(buffer)
                .palette_len(17)
                .column_speeds(speeds)
                .build()
                .unwrap()
        })
}

fn trajectory_strategy() -> impl Strategy<Value = Vec<Vec2>> {
    prop::collection::vec(
        (-400.0_f64..400.0, -400.0_f64..400.0).prop_map(|(x, y)| Vec2::new(x, y)),
        1..60,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn assignments_stay_bounded_and_exclusive(
        config in config_strategy(),
        steps in trajectory_strategy(),
    ) {
        let mut surface = RecordingSurface::new(config.tile_size());
        let mut pool = TilePool::for_config(&config);
        let mut assignments = Assignments::new();
        let mut offset = Vec2::ZERO;

        for step in steps {
            offset += step;
            let window = compute_visible(offset, &config);
            assignments.reconcile(&mut pool, &mut surface, &window);

            prop_assert!(assignments.len() <= config.max_visible_cells());
            prop_assert_eq!(assignments.len(), window.len());

            let mut slots = HashSet::new();
            let mut drawables = HashSet::new();
            for (cell, handle) in assignments.iter() {
                prop_assert!(slots.insert(handle.slot()), "slot shared at {:?}", cell);
                let drawable = pool.drawable(handle).unwrap();
                prop_assert!(drawables.insert(drawable));
                prop_assert_eq!(pool.owner(handle.slot()), Some(cell));
                prop_assert_eq!(pool.owner_of_drawable(drawable), Some(cell));

                let visible = window.get(cell).unwrap();
                prop_assert_eq!(pool.content_index(handle.slot()), Some(visible.content_index));
                prop_assert_eq!(
                    surface.drawable(drawable).map(|d| d.content_index),
                    Some(visible.content_index)
                );
            }

            let stats = pool.stats();
            prop_assert_eq!(stats.active, assignments.len());
            prop_assert_eq!(stats.active + stats.idle, stats.total);
            let idle = pool
                .slots()
                .filter(|(_, state)| *state == SlotState::Idle)
                .count();
            prop_assert_eq!(idle, stats.idle);
        }

        assignments.release_all(&mut pool, &mut surface);
        pool.teardown(&mut surface);
        prop_assert_eq!(surface.live_drawables(), 0);
    }
}

#[test]
fn long_scroll_keeps_pool_at_window_size() {
    let config = GridConfig::builder()
        .palette_len(25)
        .column_speeds(ColumnSpeeds::missionary())
        .build()
        .unwrap();
    let mut surface = RecordingSurface::new(config.tile_size());
    let mut pool = TilePool::for_config(&config);
    let mut assignments = Assignments::new();

    for step in 0..5_000 {
        let t = f64::from(step);
        let offset = Vec2::new(t * 3.3, -t * 9.1);
        let window = compute_visible(offset, &config);
        assignments.reconcile(&mut pool, &mut surface, &window);
    }
    assert!(pool.len() <= config.max_visible_cells());
    assert!(pool.stats().recycled > pool.stats().created);
}
