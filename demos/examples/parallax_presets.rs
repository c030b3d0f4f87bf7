// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parallax presets side by side.
//!
//! Feed the same wheel flick to engines using each column speed preset and
//! print how far every column travelled, plus the number of tiles each needed.
//!
//! Run:
//! - `cargo run -p understory_demos --example parallax_presets`

use kurbo::{Size, Vec2};
use understory_demos::init_logging;
use understory_infinite_grid::{EngineOptions, GridEngine, ManualScheduler};
use understory_scroll_motion::InputEvent;
use understory_tile_grid::{ColumnSpeeds, ConfigError, GridConfig, LogicalCell, Palette};
use understory_tile_pool::RecordingSurface;

fn run(name: &str, speeds: ColumnSpeeds) -> Result<(), ConfigError> {
    let grid = GridConfig::builder().column_speeds(speeds);
    let tile = grid.clone().palette_len(25).build()?.tile_size();
    let options = EngineOptions {
        grid,
        view_size: Size::new(800.0, 800.0),
        ..EngineOptions::default()
    };
    let palette = Palette::new(0..25_u32)?;
    let mut engine = GridEngine::new(options, palette, RecordingSurface::new(tile), ManualScheduler::new(16))?;
    engine.start();

    engine.push_input(InputEvent::Wheel { delta: Vec2::new(0.0, 240.0) }, 0);
    let mut peak = 0;
    while let Some(now) = engine.scheduler_mut().next_frame() {
        let report = engine.tick(now);
        peak = peak.max(engine.assigned_len());
        if report.settled() {
            break;
        }
    }

    let config = engine.config();
    let offset = engine.offset();
    let shifts: Vec<String> = (0..i64::from(config.cols().get()))
        .map(|col| {
            let origin = config.cell_origin(LogicalCell::new(col, 0));
            let moved = config.cell_origin_in_view(LogicalCell::new(col, 0), offset);
            format!("{:6.1}", origin.y - moved.y)
        })
        .collect();
    println!(
        "{name:>10}: column travel [{}], peak {peak} tiles of {} allowed, {} ms",
        shifts.join(" "),
        config.max_visible_cells(),
        engine.scheduler().now_ms()
    );
    let _ = engine.teardown();
    Ok(())
}

fn main() -> Result<(), ConfigError> {
    init_logging();
    run("uniform", ColumnSpeeds::uniform())?;
    run("missionary", ColumnSpeeds::missionary())?;
    run("drifting", ColumnSpeeds::drifting())?;
    run("slow drift", ColumnSpeeds::slow_drift())?;
    Ok(())
}
