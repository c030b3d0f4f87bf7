// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless infinite grid.
//!
//! Drive a `GridEngine` with a scripted drag, a wheel flick and a click, and
//! print the visible tiles as text after each gesture settles.
//!
//! Run:
//! - `cargo run -p understory_demos --example headless_scroll`
//! - `cargo run -p understory_demos --example headless_scroll -- grid.json`
//!
//! The optional JSON file holds grid settings, for example
//! `{"cols": 6, "rows": 4, "visible_cols": 3.0, "column_speeds": [1.0, 0.5, 1.5]}`.
//! Missing fields keep their defaults. Set
//! `RUST_LOG=debug` to see pool and surface activity.

use std::error::Error;

use kurbo::{Point, Size, Vec2};
use understory_demos::{TextSurface, init_logging};
use understory_infinite_grid::{EngineOptions, FrameFlags, GridEngine, GridEvent, ManualScheduler};
use understory_scroll_motion::{InputEvent, PointerKind};
use understory_tile_grid::{ColumnSpeeds, GridConfig, GridConfigBuilder, Palette};

const PLACES: [&str; 12] = [
    "atoll", "bluff", "canyon", "delta", "estuary", "fjord", "glacier", "heath", "inlet", "jungle",
    "karst", "lagoon",
];

type Engine = GridEngine<&'static str, TextSurface, ManualScheduler>;

fn load_grid() -> Result<GridConfigBuilder, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(GridConfig::builder()
            .period(5, 5)
            .visible(4.0, 1.5)
            .column_speeds(ColumnSpeeds::missionary())),
    }
}

/// Ticks until motion settles, returning the hover and activation events seen.
fn settle(engine: &mut Engine) -> Vec<GridEvent> {
    let mut events = Vec::new();
    while let Some(now) = engine.scheduler_mut().next_frame() {
        let report = engine.tick(now);
        events.extend(report.events.iter().copied());
        if report.flags.contains(FrameFlags::SETTLED) {
            break;
        }
    }
    events
}

fn show(engine: &Engine, title: &str) {
    let offset = engine.offset();
    println!("== {title} (offset {:.1}, {:.1})", offset.x, offset.y);
    print!("{}", engine.surface().render(engine.projection().visible_extent(), 60, 24));
    let stats = engine.pool_stats();
    println!(
        "   {} tiles assigned, pool {}/{} in use\n",
        engine.assigned_len(),
        stats.active,
        stats.total
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    let grid = load_grid()?;
    let palette = Palette::new(PLACES)?;
    let tile = grid.clone().palette_len(PLACES.len()).build()?.tile_size();
    let options = EngineOptions {
        grid,
        view_size: Size::new(600.0, 600.0),
        ..EngineOptions::default()
    };
    let mut engine = GridEngine::new(options, palette, TextSurface::new(tile), ManualScheduler::new(16))?;
    engine.start();
    settle(&mut engine);
    show(&engine, "start");

    // Drag up and to the left, then let go.
    let kind = PointerKind::Mouse;
    let now = engine.scheduler().now_ms();
    engine.push_input(InputEvent::PointerDown { position: Point::new(300.0, 300.0), kind }, now);
    for step in 1..=8 {
        let position = Point::new(300.0 - 10.0 * f64::from(step), 300.0 - 25.0 * f64::from(step));
        let now = engine.scheduler_mut().next_frame().unwrap_or_default();
        engine.push_input(InputEvent::PointerMove { position, kind }, now);
        engine.tick(now);
    }
    let now = engine.scheduler().now_ms();
    engine.push_input(InputEvent::PointerUp { position: Point::new(220.0, 100.0), kind }, now);
    settle(&mut engine);
    show(&engine, "after drag");

    let now = engine.scheduler().now_ms();
    engine.push_input(InputEvent::Wheel { delta: Vec2::new(0.0, 360.0) }, now);
    settle(&mut engine);
    show(&engine, "after wheel");

    let now = engine.scheduler().now_ms();
    engine.push_input(InputEvent::Click { position: Point::new(300.0, 300.0) }, now);
    for event in settle(&mut engine) {
        if let GridEvent::Activated(cell) = event {
            let name = engine.content(cell.content_index).copied().unwrap_or("?");
            println!("activated {:?}: {name}", cell.cell);
        }
    }

    let frames = engine.scheduler().frames();
    let (surface, _) = engine.teardown();
    let counters = surface.recording().counters();
    println!(
        "{frames} frames, {} drawables created, {} rebinds, {} live after teardown",
        counters.created,
        counters.content_rebinds,
        surface.recording().live_drawables()
    );
    Ok(())
}
