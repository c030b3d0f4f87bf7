// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory reference surface.

use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};
use kurbo::{Point, Rect, Size, Vec2};

use crate::surface::{Intersections, RenderSurface};

/// Drawable id handed out by [`RecordingSurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawableId(pub u32);

/// Last state written to one drawable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawableState {
    /// Bound palette entry.
    pub content_index: usize,
    /// Top-left corner in viewport units.
    pub origin: Point,
    /// Scale about the tile center.
    pub scale: f64,
    /// Whether the drawable is shown.
    pub visible: bool,
}

/// Call counts for a [`RecordingSurface`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceCounters {
    /// `create_drawable` calls.
    pub created: u64,
    /// `destroy_drawable` calls.
    pub destroyed: u64,
    /// `set_content` calls.
    pub content_rebinds: u64,
    /// `set_transform` calls.
    pub transforms: u64,
}

/// A [`RenderSurface`] that records drawable state instead of drawing.
///
/// Every drawable is a rectangle of the configured tile size. Point queries
/// return visible drawables whose (scaled) rectangle contains the point,
/// newest first. Useful for headless hosts, tests and benchmarks.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    tile_size: Size,
    viewport: Size,
    next_id: u32,
    drawables: HashMap<DrawableId, DrawableState>,
    missing: HashSet<usize>,
    counters: SurfaceCounters,
}

impl RecordingSurface {
    /// Creates a surface whose drawables are `tile_size` viewport units.
    #[must_use]
    pub fn new(tile_size: Size) -> Self {
        Self {
            tile_size,
            viewport: Size::ZERO,
            next_id: 0,
            drawables: HashMap::new(),
            missing: HashSet::new(),
            counters: SurfaceCounters::default(),
        }
    }

    /// Marks a palette entry as failed to load.
    pub fn mark_missing(&mut self, content_index: usize) {
        self.missing.insert(content_index);
    }

    /// State of a live drawable.
    #[must_use]
    pub fn drawable(&self, id: DrawableId) -> Option<&DrawableState> {
        self.drawables.get(&id)
    }

    /// Size of every drawable, in viewport units.
    #[must_use]
    pub fn tile_size(&self) -> Size {
        self.tile_size
    }

    /// Live drawables in unspecified order.
    pub fn drawables(&self) -> impl Iterator<Item = (DrawableId, &DrawableState)> + '_ {
        self.drawables.iter().map(|(id, state)| (*id, state))
    }

    /// Number of drawables created and not yet destroyed.
    #[must_use]
    pub fn live_drawables(&self) -> usize {
        self.drawables.len()
    }

    /// Number of live drawables currently shown.
    #[must_use]
    pub fn visible_drawables(&self) -> usize {
        self.drawables.values().filter(|d| d.visible).count()
    }

    /// Last size passed to [`RenderSurface::resize`].
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Call counts so far.
    #[must_use]
    pub fn counters(&self) -> SurfaceCounters {
        self.counters
    }

    /// Area a live drawable covers, after its scale, in viewport units.
    #[must_use]
    pub fn bounds_of(&self, id: DrawableId) -> Option<Rect> {
        self.drawables.get(&id).map(|state| self.bounds(state))
    }

    fn bounds(&self, state: &DrawableState) -> Rect {
        let rect = Rect::from_origin_size(state.origin, self.tile_size);
        let center = rect.center();
        let half = Vec2::new(rect.width(), rect.height()) * (0.5 * state.scale);
        Rect::from_points(center - half, center + half)
    }
}

impl RenderSurface for RecordingSurface {
    type Drawable = DrawableId;

    fn create_drawable(&mut self, content_index: usize) -> DrawableId {
        let id = DrawableId(self.next_id);
        self.next_id += 1;
        self.drawables.insert(
            id,
            DrawableState {
                content_index,
                origin: Point::ZERO,
                scale: 1.0,
                visible: false,
            },
        );
        self.counters.created += 1;
        id
    }

    fn set_content(&mut self, drawable: DrawableId, content_index: usize) {
        if let Some(state) = self.drawables.get_mut(&drawable) {
            state.content_index = content_index;
            self.counters.content_rebinds += 1;
        }
    }

    fn set_transform(&mut self, drawable: DrawableId, origin: Point, scale: f64) {
        if let Some(state) = self.drawables.get_mut(&drawable) {
            state.origin = origin;
            state.scale = scale;
            self.counters.transforms += 1;
        }
    }

    fn set_visible(&mut self, drawable: DrawableId, visible: bool) {
        if let Some(state) = self.drawables.get_mut(&drawable) {
            state.visible = visible;
        }
    }

    fn destroy_drawable(&mut self, drawable: DrawableId) {
        if self.drawables.remove(&drawable).is_some() {
            self.counters.destroyed += 1;
        }
    }

    fn query_intersections(&self, point: Point) -> Intersections<DrawableId> {
        let mut hits: Vec<DrawableId> = self
            .drawables
            .iter()
            .filter(|(_, state)| state.visible && self.bounds(state).contains(point))
            .map(|(id, _)| *id)
            .collect();
        hits.sort_unstable_by(|a, b| b.cmp(a));
        hits.into_iter().collect()
    }

    fn resize(&mut self, size: Size) {
        self.viewport = size;
    }

    fn has_content(&self, content_index: usize) -> bool {
        !self.missing.contains(&content_index)
    }
}
