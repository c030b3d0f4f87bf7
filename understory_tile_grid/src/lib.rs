// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_tile_grid --heading-base-level=0

//! Understory Tile Grid: wraparound indexing and parallax windowing for infinite tile surfaces.
//!
//! This crate provides the pure coordinate math behind a two-dimensional surface
//! that appears to extend forever in every direction, while its content repeats
//! over a small finite period. Each column of the grid scrolls vertically at its
//! own rate, which gives the surface a parallax look.
//!
//! The core concepts are:
//!
//! - [`LogicalCell`]: an unbounded integer grid coordinate, the identity of a
//!   tile while it is on screen.
//! - [`ActualCell`] and [`wrap`]: a logical cell reduced modulo the grid period,
//!   used only to choose content via [`content_index_of`].
//! - [`GridConfig`]: validated, immutable grid geometry (period, visible
//!   extent, buffer, [`ColumnSpeeds`], cell inset), built with
//!   [`GridConfigBuilder`].
//! - [`compute_visible`] / [`compute_visible_in`]: given a scroll offset,
//!   returns the [`VisibleWindow`] of cells to realize.
//! - [`pick_cell`]: maps a point in the view back to the cell under it.
//!
//! This crate deliberately does **not** own any render objects. Host code (or
//! `understory_tile_pool`) is responsible for diffing successive windows and
//! creating, recycling and positioning drawables.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Vec2;
//! use understory_tile_grid::{ColumnSpeeds, GridConfig, compute_visible};
//!
//! // A 5x5 period, four columns and one and a half rows across the viewport.
//! let config = GridConfig::builder()
//!     .period(5, 5)
//!     .visible(4.0, 1.5)
//!     .palette_len(25)
//!     .column_speeds(ColumnSpeeds::missionary())
//!     .build()
//!     .unwrap();
//!
//! let window = compute_visible(Vec2::new(-40.0, 250.0), &config);
//! assert!(window.len() <= config.max_visible_cells());
//!
//! for cell in window.cells() {
//!     // Position the tile for `cell.cell` showing `cell.content_index` at
//!     // `cell.origin_in_view(window.offset())`.
//!     assert!(cell.content_index < 25);
//! }
//! ```
//!
//! All positions live in normalized viewport units: by default the viewport is
//! `100 × 100` units regardless of its size in pixels, so resizing the host
//! window does not change any of the math here.
//!
//! ## Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` for [`GridConfigBuilder`] and
//!   [`ColumnSpeeds`], so grid configuration can be loaded from files.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod hit;
mod index;
mod palette;
mod scalar;
mod window;

pub use config::{ColumnSpeeds, ConfigError, GridConfig, GridConfigBuilder};
pub use hit::{pick_cell, pick_in_window};
pub use index::{ActualCell, LogicalCell, content_index_of, wrap};
pub use palette::Palette;
pub use window::{ColumnSpan, VisibleCell, VisibleWindow, compute_visible, compute_visible_in};
