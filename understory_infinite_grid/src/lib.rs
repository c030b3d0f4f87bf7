// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_infinite_grid --heading-base-level=0

//! Understory Infinite Grid: an endless, wraparound tile grid with parallax columns.
//!
//! This crate wires the lower-level pieces into one engine:
//!
//! - [`understory_tile_grid`] decides which cells are visible and what they show.
//! - [`understory_tile_pool`] recycles drawables as cells come and go.
//! - [`understory_scroll_motion`] turns input into a smoothed, momentum-carrying offset.
//!
//! [`GridEngine`] owns one of each plus a [`RenderSurface`] and a
//! [`FrameScheduler`] supplied by the host. Input is queued with
//! [`GridEngine::push_input`] and applied at the start of the next
//! [`GridEngine::tick`], so a recorded input stream replays identically.
//! Each tick returns a [`FrameReport`] with [`FrameFlags`] and any hover or
//! activation [`GridEvent`]s.
//!
//! Positions handed to the surface are in viewport units; [`GridProjection`]
//! maps device pixels to those units for hit testing and tells windowing how
//! much of the plane a non-square view shows.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Size, Vec2};
//! use understory_infinite_grid::{EngineOptions, FrameFlags, GridEngine, ManualScheduler};
//! use understory_scroll_motion::InputEvent;
//! use understory_tile_grid::{ColumnSpeeds, GridConfig, Palette};
//! use understory_tile_pool::RecordingSurface;
//!
//! let options = EngineOptions {
//!     grid: GridConfig::builder().period(5, 5).column_speeds(ColumnSpeeds::missionary()),
//!     view_size: Size::new(500.0, 500.0),
//!     ..EngineOptions::default()
//! };
//! let palette = Palette::new((0..25).map(|i| format!("image-{i}.jpg"))).unwrap();
//! let surface = RecordingSurface::new(Size::new(24.5, 65.33));
//!
//! let mut engine = GridEngine::new(options, palette, surface, ManualScheduler::new(16)).unwrap();
//! engine.start();
//!
//! // Spin the wheel and let the motion play out.
//! engine.push_input(InputEvent::Wheel { delta: Vec2::new(0.0, 120.0) }, 0);
//! while let Some(now) = engine.scheduler_mut().next_frame() {
//!     if engine.tick(now).flags.contains(FrameFlags::SETTLED) {
//!         break;
//!     }
//! }
//! assert!(engine.offset().y > 48.0);
//! assert!(engine.pool_stats().total <= engine.config().max_visible_cells());
//!
//! // Click in the middle of a tile.
//! engine.push_input(InputEvent::Click { position: Point::new(60.0, 160.0) }, 3_000);
//! let report = engine.tick(3_016);
//! let clicked = report.activations().next().unwrap();
//! assert!(engine.content(clicked.content_index).is_some());
//!
//! let (surface, _) = engine.teardown();
//! assert_eq!(surface.live_drawables(), 0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod engine;
mod frame;
mod projection;
mod scheduler;

pub use engine::{EngineOptions, GridEngine, HitStrategy};
pub use frame::{FrameEvents, FrameFlags, FrameReport, GridEvent};
pub use projection::{AspectMode, GridProjection};
pub use scheduler::{FrameScheduler, ManualScheduler};

pub use understory_tile_pool::RenderSurface;
