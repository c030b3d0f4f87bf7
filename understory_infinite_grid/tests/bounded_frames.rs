// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Invariants that must hold after every frame, for any input.

use std::collections::HashSet;

use kurbo::{Point, Size, Vec2};
use proptest::prelude::*;
use understory_infinite_grid::{EngineOptions, FrameReport, GridEngine, ManualScheduler};
use understory_scroll_motion::{ArrowKey, InputEvent, PointerKind};
use understory_tile_grid::{ColumnSpeeds, GridConfig, Palette};
use understory_tile_pool::RecordingSurface;

type Engine = GridEngine<u16, RecordingSurface, ManualScheduler>;

fn engine(speeds: ColumnSpeeds, buffer: u32) -> Engine {
    let grid = GridConfig::builder()
        .period(5, 5)
        .visible(4.0, 1.5)
        .buffer(buffer)
        .column_speeds(speeds);
    let tile = grid.clone().palette_len(25).build().unwrap().tile_size();
    let options = EngineOptions {
        grid,
        view_size: Size::new(640.0, 480.0),
        ..EngineOptions::default()
    };
    let mut engine = GridEngine::new(
        options,
        Palette::new(0..25).unwrap(),
        RecordingSurface::new(tile),
        ManualScheduler::new(16),
    )
    .unwrap();
    engine.start();
    engine
}

fn event_strategy() -> impl Strategy<Value = InputEvent> {
    let point = (0.0_f64..640.0, 0.0_f64..480.0).prop_map(|(x, y)| Point::new(x, y));
    let kind = prop_oneof![Just(PointerKind::Mouse), Just(PointerKind::Touch)];
    prop_oneof![
        4 => (-600.0_f64..600.0, -600.0_f64..600.0)
            .prop_map(|(x, y)| InputEvent::Wheel { delta: Vec2::new(x, y) }),
        2 => (point.clone(), kind.clone())
            .prop_map(|(position, kind)| InputEvent::PointerDown { position, kind }),
        4 => (point.clone(), kind.clone())
            .prop_map(|(position, kind)| InputEvent::PointerMove { position, kind }),
        2 => (point.clone(), kind).prop_map(|(position, kind)| InputEvent::PointerUp { position, kind }),
        1 => point.prop_map(|position| InputEvent::Click { position }),
        1 => Just(InputEvent::PointerLeave),
        1 => prop_oneof![
            Just(ArrowKey::Up),
            Just(ArrowKey::Down),
            Just(ArrowKey::Left),
            Just(ArrowKey::Right)
        ]
        .prop_map(InputEvent::Key),
        1 => (100.0_f64..1600.0, 100.0_f64..1200.0)
            .prop_map(|(w, h)| InputEvent::Resize(Size::new(w, h))),
    ]
}

/// Events per frame, for a few hundred frames.
fn script_strategy() -> impl Strategy<Value = Vec<Vec<InputEvent>>> {
    prop::collection::vec(prop::collection::vec(event_strategy(), 0..3), 1..200)
}

fn speeds_strategy() -> impl Strategy<Value = ColumnSpeeds> {
    prop_oneof![
        Just(ColumnSpeeds::uniform()),
        Just(ColumnSpeeds::missionary()),
        Just(ColumnSpeeds::drifting()),
        prop::collection::vec(0.05_f64..3.0, 1..6).prop_map(ColumnSpeeds::from_multipliers),
    ]
}

fn play(engine: &mut Engine, script: &[Vec<InputEvent>], mut check: impl FnMut(&Engine, &FrameReport)) {
    for frame in script {
        let now = engine.scheduler().now_ms();
        for (i, event) in frame.iter().enumerate() {
            engine.push_input(*event, now + i as u64);
        }
        let now = engine.scheduler_mut().next_frame().unwrap();
        let report = engine.tick(now);
        check(engine, &report);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn every_frame_stays_bounded_and_consistent(
        speeds in speeds_strategy(),
        buffer in 1_u32..4,
        script in script_strategy(),
    ) {
        let mut engine = engine(speeds, buffer);
        let bound = engine.config().max_visible_cells();
        let mut failure = None;

        play(&mut engine, &script, |engine, report| {
            if failure.is_some() {
                return;
            }
            let assigned = engine.assigned_len();
            let drawables: HashSet<_> = engine.assignments().map(|(_, d)| d).collect();
            if assigned > bound {
                failure = Some(format!("{assigned} cells assigned, bound {bound}"));
            } else if engine.pool_stats().total > bound {
                failure = Some(format!("pool holds {}, bound {bound}", engine.pool_stats().total));
            } else if drawables.len() != assigned {
                failure = Some("a drawable is assigned to two cells".into());
            } else if engine.surface().visible_drawables() != assigned {
                failure = Some(format!(
                    "{} visible drawables for {assigned} cells",
                    engine.surface().visible_drawables()
                ));
            } else if !report.offset.is_finite() {
                failure = Some("offset is not finite".into());
            }
        });
        prop_assert!(failure.is_none(), "{}", failure.unwrap_or_default());

        let (surface, _) = engine.teardown();
        prop_assert_eq!(surface.live_drawables(), 0);
    }

    #[test]
    fn the_same_script_replays_identically(script in script_strategy()) {
        let mut a = engine(ColumnSpeeds::missionary(), 2);
        let mut b = engine(ColumnSpeeds::missionary(), 2);
        let mut reports_a = Vec::new();
        let mut reports_b = Vec::new();
        play(&mut a, &script, |_, report| reports_a.push(report.clone()));
        play(&mut b, &script, |_, report| reports_b.push(report.clone()));
        prop_assert_eq!(reports_a, reports_b);
        prop_assert_eq!(a.hovered(), b.hovered());
    }
}
