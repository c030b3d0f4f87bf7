// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size, Vec2};
use understory_infinite_grid::{EngineOptions, GridEngine, ManualScheduler};
use understory_scroll_motion::{InputEvent, PointerKind};
use understory_tile_grid::{ColumnSpeeds, GridConfig, Palette};
use understory_tile_pool::RecordingSurface;

type Engine = GridEngine<u32, RecordingSurface, ManualScheduler>;

fn engine() -> Engine {
    let grid = GridConfig::builder()
        .period(5, 5)
        .column_speeds(ColumnSpeeds::missionary());
    let tile = grid.clone().palette_len(25).build().unwrap().tile_size();
    let options = EngineOptions {
        grid,
        view_size: Size::new(1280.0, 800.0),
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

/// Feeds a drag with a fling, a few wheel spins and a still stretch, one
/// second of frames at a time.
fn run_session(engine: &mut Engine, frames: usize) -> usize {
    let kind = PointerKind::Mouse;
    let mut churn = 0;
    for i in 0..frames {
        let Some(now) = engine.scheduler_mut().next_frame() else {
            break;
        };
        let phase = i % 60;
        let x = 600.0 - phase as f64 * 9.0;
        let event = match phase {
            0 => Some(InputEvent::PointerDown { position: Point::new(x, 400.0), kind }),
            1..=20 => Some(InputEvent::PointerMove { position: Point::new(x, 400.0 - phase as f64 * 12.0), kind }),
            21 => Some(InputEvent::PointerUp { position: Point::new(x, 160.0), kind }),
            30 | 35 | 40 => Some(InputEvent::Wheel { delta: Vec2::new(0.0, 120.0) }),
            _ => None,
        };
        if let Some(event) = event {
            engine.push_input(event, now);
        }
        churn += engine.tick(now).diff.acquired.len();
    }
    churn
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_infinite_grid");
    group.sample_size(30);

    group.bench_function("tick_600_frames", |b| {
        b.iter_batched(
            engine,
            |mut engine| {
                let churn = run_session(&mut engine, 600);
                black_box(churn);
                black_box(engine.teardown());
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("tick_settled", |b| {
        let mut engine = engine();
        engine.tick(0);
        let mut now = 0;
        b.iter(|| {
            now += 16;
            black_box(engine.tick(now).flags);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_engine);
criterion_main!(benches);
