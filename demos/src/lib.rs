// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Helpers shared by the headless grid demos.
//!
//! [`TextSurface`] is a [`RenderSurface`] that keeps drawables in memory,
//! logs their lifecycle, and can rasterize the visible tiles into a block of
//! characters so a terminal can show what a real renderer would draw.

use std::fmt::Write as _;

use kurbo::{Point, Size};
use understory_tile_pool::{DrawableId, Intersections, RecordingSurface, RenderSurface};

/// Characters used for palette entries, cycling for larger palettes.
const GLYPHS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// An in-memory surface that can print itself.
#[derive(Debug)]
pub struct TextSurface {
    inner: RecordingSurface,
}

impl TextSurface {
    /// Creates a surface drawing tiles of `tile_size` viewport units.
    pub fn new(tile_size: Size) -> Self {
        Self {
            inner: RecordingSurface::new(tile_size),
        }
    }

    /// The recorded drawable state.
    pub fn recording(&self) -> &RecordingSurface {
        &self.inner
    }

    /// Rasterizes visible tiles over `extent` viewport units into `cols` by
    /// `rows` characters. Gutters and uncovered space print as `.`.
    pub fn render(&self, extent: Size, cols: usize, rows: usize) -> String {
        let mut cells = vec![b'.'; cols * rows];
        for (id, state) in self.inner.drawables() {
            if !state.visible {
                continue;
            }
            let Some(bounds) = self.inner.bounds_of(id) else {
                continue;
            };
            let glyph = GLYPHS[state.content_index % GLYPHS.len()];
            for row in 0..rows {
                for col in 0..cols {
                    // Sample each character at its center.
                    let p = Point::new(
                        (col as f64 + 0.5) * extent.width / cols as f64,
                        (row as f64 + 0.5) * extent.height / rows as f64,
                    );
                    if bounds.contains(p) {
                        cells[row * cols + col] = glyph;
                    }
                }
            }
        }

        let mut out = String::with_capacity((cols + 1) * rows);
        for line in cells.chunks(cols) {
            let _ = writeln!(out, "{}", String::from_utf8_lossy(line));
        }
        out
    }
}

impl RenderSurface for TextSurface {
    type Drawable = DrawableId;

    fn create_drawable(&mut self, content_index: usize) -> DrawableId {
        let id = self.inner.create_drawable(content_index);
        tracing::debug!(drawable = id.0, content_index, "created drawable");
        id
    }

    fn set_content(&mut self, drawable: DrawableId, content_index: usize) {
        tracing::trace!(drawable = drawable.0, content_index, "rebound drawable");
        self.inner.set_content(drawable, content_index);
    }

    fn set_transform(&mut self, drawable: DrawableId, origin: Point, scale: f64) {
        self.inner.set_transform(drawable, origin, scale);
    }

    fn set_visible(&mut self, drawable: DrawableId, visible: bool) {
        self.inner.set_visible(drawable, visible);
    }

    fn destroy_drawable(&mut self, drawable: DrawableId) {
        tracing::debug!(drawable = drawable.0, "destroyed drawable");
        self.inner.destroy_drawable(drawable);
    }

    fn query_intersections(&self, point: Point) -> Intersections<DrawableId> {
        self.inner.query_intersections(point)
    }

    fn resize(&mut self, size: Size) {
        tracing::info!(width = size.width, height = size.height, "surface resized");
        self.inner.resize(size);
    }

    fn has_content(&self, content_index: usize) -> bool {
        self.inner.has_content(content_index)
    }
}

/// Installs a `tracing` subscriber filtered by `RUST_LOG`, defaulting to
/// `info`.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
