// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size, Vec2};
use understory_tile_grid::{
    ColumnSpeeds, GridConfig, VisibleWindow, compute_visible, compute_visible_in, pick_cell,
};
use understory_tile_pool::{Assignments, RecordingSurface, TilePool};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    /// Uniform in `[-1, 1]`.
    fn next_signed(&mut self) -> f64 {
        f64::from(self.next_u32()) / f64::from(u32::MAX) * 2.0 - 1.0
    }
}

fn config(visible: f64, buffer: u32) -> GridConfig {
    GridConfig::builder()
        .period(5, 5)
        .visible(visible, visible * 0.375)
        .buffer(buffer)
        .palette_len(25)
        .column_speeds(ColumnSpeeds::missionary())
        .build()
        .unwrap()
}

/// A drifting scroll path: small steps with occasional long flings.
fn trajectory(steps: usize, seed: u64) -> Vec<Vec2> {
    let mut rng = Lcg::new(seed);
    let mut offset = Vec2::ZERO;
    (0..steps)
        .map(|i| {
            let reach = if i % 97 == 0 { 400.0 } else { 4.0 };
            offset += Vec2::new(rng.next_signed() * reach, rng.next_signed() * reach);
            offset
        })
        .collect()
}

fn bench_windowing(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_tile_grid");
    group.sample_size(50);

    for &(visible, buffer) in &[(4.0_f64, 2_u32), (12.0, 2), (32.0, 4)] {
        let config = config(visible, buffer);
        let path = trajectory(1_024, 0x7115_0000_0000_0001);

        group.bench_function(format!("compute_visible(v={visible},b={buffer})"), |b| {
            b.iter(|| {
                let mut total = 0_usize;
                for &offset in &path {
                    total += compute_visible(offset, &config).len();
                }
                black_box(total);
            });
        });

        group.bench_function(
            format!("compute_visible_in_reused(v={visible},b={buffer})"),
            |b| {
                let mut window = VisibleWindow::new();
                let extent = Size::new(100.0, 100.0);
                b.iter(|| {
                    let mut total = 0_usize;
                    for &offset in &path {
                        compute_visible_in(offset, &config, extent, &mut window);
                        total += window.len();
                    }
                    black_box(total);
                });
            },
        );

        group.bench_function(format!("pick_cell(v={visible},b={buffer})"), |b| {
            let mut rng = Lcg::new(0x7115_0000_0000_0002);
            let points: Vec<Point> = (0..1_024)
                .map(|_| Point::new(50.0 + rng.next_signed() * 50.0, 50.0 + rng.next_signed() * 50.0))
                .collect();
            b.iter(|| {
                let mut hits = 0_usize;
                for (point, &offset) in points.iter().zip(&path) {
                    hits += usize::from(pick_cell(&config, offset, *point).is_some());
                }
                black_box(hits);
            });
        });
    }
    group.finish();
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_tile_pool");
    group.sample_size(30);

    for &(visible, buffer) in &[(4.0_f64, 2_u32), (12.0, 2), (32.0, 4)] {
        let config = config(visible, buffer);
        let windows: Vec<_> = trajectory(512, 0x7115_0000_0000_0003)
            .into_iter()
            .map(|offset| compute_visible(offset, &config))
            .collect();

        group.bench_function(format!("reconcile_path(v={visible},b={buffer})"), |b| {
            b.iter_batched(
                || {
                    (
                        TilePool::for_config(&config),
                        Assignments::new(),
                        RecordingSurface::new(config.tile_size()),
                    )
                },
                |(mut pool, mut assignments, mut surface)| {
                    let mut churn = 0_usize;
                    for window in &windows {
                        let diff = assignments.reconcile(&mut pool, &mut surface, window);
                        churn += diff.acquired.len();
                    }
                    assignments.release_all(&mut pool, &mut surface);
                    pool.teardown(&mut surface);
                    black_box(churn);
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_windowing, bench_reconcile);
criterion_main!(benches);
