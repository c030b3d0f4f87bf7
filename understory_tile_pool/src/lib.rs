// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_tile_pool --heading-base-level=0

//! Understory Tile Pool: bounded recycling of render drawables for virtualized tile grids.
//!
//! A virtualized grid realizes only the cells near the viewport, but those
//! cells change every time the user scrolls. Creating and destroying a render
//! object per cell per frame is wasteful; this crate keeps a pool of them and
//! hands each newly visible cell a recycled one.
//!
//! - [`RenderSurface`]: the seam to whatever actually draws (a canvas, a
//!   retained scene, a GPU surface). The pool only creates, rebinds, moves,
//!   hides and destroys drawables through it.
//! - [`TilePool`]: a slot arena with a free list. [`TilePool::acquire`] returns
//!   a move-only [`PoolHandle`]; [`TilePool::release`] consumes it. A drawable
//!   is destroyed only at [`TilePool::teardown`].
//! - [`Assignments`]: the `LogicalCell → PoolHandle` map, updated from a
//!   [`VisibleWindow`](understory_tile_grid::VisibleWindow) by
//!   [`Assignments::reconcile`].
//! - [`RecordingSurface`]: an in-memory surface for headless hosts and tests.
//!
//! Because cells own their handles by value, a slot can never be assigned to
//! two cells at once, and the number of live drawables tracks the window size
//! rather than the distance scrolled.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Vec2;
//! use understory_tile_grid::{GridConfig, compute_visible};
//! use understory_tile_pool::{Assignments, RecordingSurface, TilePool};
//!
//! let config = GridConfig::builder().palette_len(25).build().unwrap();
//! let mut surface = RecordingSurface::new(config.tile_size());
//! let mut pool = TilePool::for_config(&config);
//! let mut assignments = Assignments::new();
//!
//! // Scroll a long way; the pool never grows past one window.
//! for step in 0..200 {
//!     let offset = Vec2::new(step as f64 * 7.5, step as f64 * -11.0);
//!     let window = compute_visible(offset, &config);
//!     assignments.reconcile(&mut pool, &mut surface, &window);
//!     assert!(assignments.len() <= config.max_visible_cells());
//! }
//! assert!(pool.len() <= config.max_visible_cells());
//!
//! assignments.release_all(&mut pool, &mut surface);
//! pool.teardown(&mut surface);
//! assert_eq!(surface.live_drawables(), 0);
//! ```
//!
//! Pool growth past its soft cap and palette entries without content are
//! reported as `tracing` warnings; neither is an error.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod pool;
mod reconcile;
mod recording;
mod surface;

pub use pool::{PoolHandle, PoolStats, SlotId, SlotState, TilePool};
pub use reconcile::{Assignments, ReconcileDiff};
pub use recording::{DrawableId, DrawableState, RecordingSurface, SurfaceCounters};
pub use surface::{Intersections, RenderSurface};
