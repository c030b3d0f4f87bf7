// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Size, Vec2};
use understory_scroll_motion::{
    DispatchEffect, InputDispatcher, InputEvent, InputParams, InputQueue, MotionParams,
    ScrollMotion,
};
use understory_tile_grid::{
    ConfigError, GridConfig, GridConfigBuilder, LogicalCell, Palette, VisibleCell, VisibleWindow,
    compute_visible_in, pick_cell,
};
use understory_tile_pool::{Assignments, PoolStats, ReconcileDiff, RenderSurface, TilePool};

use crate::frame::{FrameEvents, FrameFlags, FrameReport, GridEvent};
use crate::projection::{AspectMode, GridProjection};
use crate::scheduler::FrameScheduler;

/// Which hit tester [`GridEngine::pick`] uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HitStrategy {
    /// Invert the grid geometry at the current offset. Ignores the feedback
    /// scale applied to tiles.
    #[default]
    Geometry,
    /// Ask the surface which drawables are under the point and map the nearest
    /// one back to the cell that owns it.
    Surface,
}

/// Everything needed to build a [`GridEngine`] besides its collaborators.
#[derive(Clone, Debug)]
pub struct EngineOptions {
    /// Grid shape. Its palette length is taken from the palette.
    pub grid: GridConfigBuilder,
    /// Motion smoothing and decay.
    pub motion: MotionParams,
    /// Input sensitivities and timings.
    pub input: InputParams,
    /// How viewport units cover a non-square view.
    pub aspect: AspectMode,
    /// Hit tester used for hover and activation.
    pub hit: HitStrategy,
    /// Initial view size in device pixels.
    pub view_size: Size,
    /// The window is recomputed once the offset has moved this far on either
    /// axis since the last computation, in viewport units.
    pub rewindow_threshold: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            grid: GridConfigBuilder::default(),
            motion: MotionParams::default(),
            input: InputParams::default(),
            aspect: AspectMode::default(),
            hit: HitStrategy::default(),
            view_size: Size::new(1024.0, 1024.0),
            rewindow_threshold: 0.1,
        }
    }
}

/// One infinite grid: input, motion, windowing, recycling and hit testing,
/// advanced together one frame at a time.
///
/// The engine owns its [`RenderSurface`] and [`FrameScheduler`] for its whole
/// life and hands them back from [`teardown`](Self::teardown). Nothing is
/// global; two engines never share state.
///
/// Each [`tick`](Self::tick) runs the same fixed sequence:
///
/// 1. drain queued input in arrival order,
/// 2. advance motion by one step,
/// 3. ease the scroll feedback scale,
/// 4. recompute the window if the offset moved far enough, on the first
///    frame, after a resize, or when motion comes to rest,
/// 5. reconcile pool assignments with the window,
/// 6. position and show the assigned drawables,
/// 7. re-evaluate hover.
pub struct GridEngine<T, S: RenderSurface, F> {
    config: GridConfig,
    palette: Palette<T>,
    surface: S,
    scheduler: F,
    projection: GridProjection,
    motion: ScrollMotion,
    input: InputDispatcher,
    queue: InputQueue,
    pool: TilePool<S::Drawable>,
    assignments: Assignments,
    window: VisibleWindow,
    windowed_at: Option<Vec2>,
    rewindow_threshold: f64,
    was_settled: bool,
    scale: f64,
    hit: HitStrategy,
    pointer: Option<Point>,
    hovered: Option<VisibleCell>,
}

impl<T, S: RenderSurface, F> core::fmt::Debug for GridEngine<T, S, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GridEngine")
            .field("offset", &self.motion.offset())
            .field("cells", &self.assignments.len())
            .field("pool", &self.pool.stats())
            .field("hovered", &self.hovered.map(|h| h.cell))
            .finish_non_exhaustive()
    }
}

impl<T, S: RenderSurface, F: FrameScheduler> GridEngine<T, S, F> {
    /// Builds an engine over `palette`.
    ///
    /// The grid's palette length is set from `palette`, and the configuration
    /// is validated; invalid shapes return the [`ConfigError`].
    pub fn new(
        options: EngineOptions,
        palette: Palette<T>,
        mut surface: S,
        scheduler: F,
    ) -> Result<Self, ConfigError> {
        let config = options.grid.palette_len(palette.len().get()).build()?;
        let projection = GridProjection::new(
            Rect::from_origin_size(Point::ZERO, options.view_size),
            config.viewport_units(),
            options.aspect,
        );
        surface.resize(options.view_size);
        let mut pool = TilePool::for_config(&config);
        pool.set_soft_cap(soft_cap(&config, projection.visible_extent()));

        Ok(Self {
            config,
            palette,
            surface,
            scheduler,
            projection,
            motion: ScrollMotion::new(options.motion),
            input: InputDispatcher::new(options.input),
            queue: InputQueue::new(),
            pool,
            assignments: Assignments::new(),
            window: VisibleWindow::new(),
            windowed_at: None,
            rewindow_threshold: options.rewindow_threshold,
            was_settled: true,
            scale: 1.0,
            hit: options.hit,
            pointer: None,
            hovered: None,
        })
    }

    /// Asks the scheduler for frames.
    pub fn start(&mut self) {
        tracing::debug!(
            cols = self.config.cols().get(),
            rows = self.config.rows().get(),
            palette = self.palette.len().get(),
            "grid engine started"
        );
        self.scheduler.start();
    }

    /// Stops frame delivery without tearing anything down.
    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// Queues an event for the next frame.
    pub fn push_input(&mut self, event: InputEvent, now_ms: u64) {
        self.queue.push(event, now_ms);
    }

    /// Runs one frame at host time `now_ms`.
    pub fn tick(&mut self, now_ms: u64) -> FrameReport {
        let mut flags = FrameFlags::empty();
        let mut events = FrameEvents::new();

        // Take the queue so activation can hit test against `self` while
        // draining; the allocation is handed back afterwards.
        let mut queue = core::mem::take(&mut self.queue);
        for timed in queue.drain() {
            match self.input.dispatch(&timed.event, timed.time_ms, &mut self.motion) {
                DispatchEffect::None => {}
                DispatchEffect::Resized(size) => {
                    if self.apply_resize(size) {
                        flags |= FrameFlags::RESIZED;
                    }
                }
                DispatchEffect::Hover(position) => self.pointer = Some(position),
                DispatchEffect::PointerLeft => self.pointer = None,
                DispatchEffect::Activate(position) => {
                    self.pointer = Some(position);
                    if let Some(cell) = self.pick(position) {
                        tracing::debug!(
                            col = cell.cell.col,
                            row = cell.cell.row,
                            content_index = cell.content_index,
                            "tile activated"
                        );
                        events.push(GridEvent::Activated(cell));
                    }
                }
            }
        }
        self.queue = queue;

        let step = self.motion.tick();
        if step.delta != Vec2::ZERO {
            flags |= FrameFlags::MOVED;
        }
        if step.settled {
            flags |= FrameFlags::SETTLED;
        }
        if !step.settled || self.input.is_scrolling(now_ms) {
            flags |= FrameFlags::SCROLLING;
        }

        let scale = self.input.tick(now_ms);
        let rescaled = scale != self.scale;
        self.scale = scale;

        let offset = step.offset;
        let came_to_rest = step.settled && !self.was_settled;
        self.was_settled = step.settled;
        let rewindow = match self.windowed_at {
            None => true,
            Some(at) => {
                flags.contains(FrameFlags::RESIZED)
                    || (came_to_rest && at != offset)
                    || (offset.x - at.x).abs() > self.rewindow_threshold
                    || (offset.y - at.y).abs() > self.rewindow_threshold
            }
        };

        let mut diff = ReconcileDiff::default();
        if rewindow {
            compute_visible_in(
                offset,
                &self.config,
                self.projection.visible_extent(),
                &mut self.window,
            );
            self.windowed_at = Some(offset);
            diff = self
                .assignments
                .reconcile(&mut self.pool, &mut self.surface, &self.window);
            if !diff.is_empty() {
                flags |= FrameFlags::RECONCILED;
            }
        }

        let stale = FrameFlags::MOVED | FrameFlags::RECONCILED | FrameFlags::RESIZED;
        if rescaled || flags.intersects(stale) {
            self.bind(offset, &diff.acquired);
        }

        let hovered = if self.input.is_dragging() {
            None
        } else {
            self.pointer.and_then(|p| self.pick(p))
        };
        if hovered.map(|h| h.cell) != self.hovered.map(|h| h.cell) {
            if let Some(old) = self.hovered {
                events.push(GridEvent::HoverLeave(old));
            }
            if let Some(new) = hovered {
                events.push(GridEvent::HoverEnter(new));
            }
            self.hovered = hovered;
            flags |= FrameFlags::HOVER_CHANGED;
        }

        tracing::trace!(
            now_ms,
            x = offset.x,
            y = offset.y,
            cells = self.assignments.len(),
            flags = flags.bits(),
            "frame"
        );

        FrameReport {
            flags,
            offset,
            scale,
            diff,
            events,
        }
    }

    /// The cell under `screen`, a device-space point relative to the view.
    #[must_use]
    pub fn pick(&self, screen: Point) -> Option<VisibleCell> {
        let point = self.projection.device_to_units(screen);
        match self.hit {
            HitStrategy::Geometry => pick_cell(&self.config, self.motion.offset(), point),
            HitStrategy::Surface => self
                .surface
                .query_intersections(point)
                .into_iter()
                .find_map(|drawable| self.pool.owner_of_drawable(drawable))
                .map(|cell| VisibleCell::resolve(&self.config, cell)),
        }
    }

    /// Stops the scheduler, returns every drawable to the pool, destroys them
    /// all, and hands the collaborators back.
    pub fn teardown(mut self) -> (S, F) {
        self.scheduler.stop();
        let released = self
            .assignments
            .release_all(&mut self.pool, &mut self.surface);
        let stats = self.pool.stats();
        self.pool.teardown(&mut self.surface);
        tracing::debug!(
            released,
            created = stats.created,
            recycled = stats.recycled,
            "grid engine torn down"
        );
        (self.surface, self.scheduler)
    }
}

impl<T, S: RenderSurface, F> GridEngine<T, S, F> {
    /// The validated grid configuration.
    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// The rendered scroll offset.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.motion.offset()
    }

    /// The motion model.
    #[must_use]
    pub fn motion(&self) -> &ScrollMotion {
        &self.motion
    }

    /// Moves straight to `offset` with no easing. The window follows on the
    /// next tick.
    pub fn jump_to(&mut self, offset: Vec2) {
        self.motion.jump_to(offset);
        self.windowed_at = None;
    }

    /// The cell under the pointer, as of the last tick.
    #[must_use]
    pub fn hovered(&self) -> Option<&VisibleCell> {
        self.hovered.as_ref()
    }

    /// Returns `true` while motion is under way or within the quiet period
    /// after the last scroll input.
    #[must_use]
    pub fn is_scrolling(&self, now_ms: u64) -> bool {
        !self.motion.is_settled() || self.input.is_scrolling(now_ms)
    }

    /// Returns `true` while a recent click keeps fast mode on.
    #[must_use]
    pub fn fast_mode(&self, now_ms: u64) -> bool {
        self.input.is_fast(now_ms)
    }

    /// Current tile scale from scroll-speed feedback.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Every assigned cell with its drawable, in unspecified order.
    pub fn assignments(&self) -> impl Iterator<Item = (LogicalCell, S::Drawable)> + '_ {
        self.assignments
            .iter()
            .filter_map(|(cell, handle)| Some((cell, self.pool.drawable(handle)?)))
    }

    /// Number of assigned cells.
    #[must_use]
    pub fn assigned_len(&self) -> usize {
        self.assignments.len()
    }

    /// The window computed by the last rewindowing tick.
    #[must_use]
    pub fn window(&self) -> &VisibleWindow {
        &self.window
    }

    /// Pool counters.
    #[must_use]
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// The palette entry for `content_index`.
    #[must_use]
    pub fn content(&self, content_index: usize) -> Option<&T> {
        self.palette.get(content_index)
    }

    /// The palette.
    #[must_use]
    pub fn palette(&self) -> &Palette<T> {
        &self.palette
    }

    /// The device ↔ viewport-unit projection.
    #[must_use]
    pub fn projection(&self) -> &GridProjection {
        &self.projection
    }

    /// Hit tester in use.
    #[must_use]
    pub fn hit_strategy(&self) -> HitStrategy {
        self.hit
    }

    /// Switches the hit tester. Takes effect on the next pick.
    pub fn set_hit_strategy(&mut self, hit: HitStrategy) {
        self.hit = hit;
    }

    /// Number of events waiting for the next tick.
    #[must_use]
    pub fn pending_input(&self) -> usize {
        self.queue.len()
    }

    /// The render surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The frame scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    /// The frame scheduler, for hosts that pull frames from it.
    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    fn apply_resize(&mut self, size: Size) -> bool {
        if !self
            .projection
            .set_view_rect(Rect::from_origin_size(Point::ZERO, size))
        {
            return false;
        }
        self.surface.resize(size);
        let extent = self.projection.visible_extent();
        self.pool.set_soft_cap(soft_cap(&self.config, extent));
        tracing::debug!(
            width = size.width,
            height = size.height,
            extent_w = extent.width,
            "view resized"
        );
        true
    }

    /// Pushes the current offset and scale to every assigned drawable and
    /// shows the ones that just entered.
    fn bind(&mut self, offset: Vec2, acquired: &[LogicalCell]) {
        for (cell, handle) in self.assignments.iter() {
            let Some(drawable) = self.pool.drawable(handle) else {
                continue;
            };
            let origin = self.config.cell_rect_in_view(cell, offset).origin();
            self.surface.set_transform(drawable, origin, self.scale);
        }
        for &cell in acquired {
            if let Some(drawable) = self
                .assignments
                .get(cell)
                .and_then(|handle| self.pool.drawable(handle))
            {
                self.surface.set_visible(drawable, true);
            }
        }
    }
}

fn soft_cap(config: &GridConfig, extent: Size) -> usize {
    config.max_visible_cells_in(extent).saturating_mul(4)
}

#[cfg(test)]
mod tests {
    use understory_tile_pool::RecordingSurface;

    use super::*;
    use crate::scheduler::ManualScheduler;

    type Engine = GridEngine<u32, RecordingSurface, ManualScheduler>;

    fn engine() -> Engine {
        let options = EngineOptions {
            grid: GridConfig::builder().period(5, 5).visible(4.0, 1.5).buffer(2),
            view_size: Size::new(400.0, 400.0),
            ..EngineOptions::default()
        };
        let tile = GridConfig::builder()
            .period(5, 5)
            .visible(4.0, 1.5)
            .palette_len(25)
            .build()
            .unwrap()
            .tile_size();
        let palette = Palette::new(0..25).unwrap();
        GridEngine::new(options, palette, RecordingSurface::new(tile), ManualScheduler::new(16))
            .unwrap()
    }

    #[test]
    fn first_tick_realizes_the_window() {
        let mut e = engine();
        e.start();
        let report = e.tick(0);
        assert!(report.flags.contains(FrameFlags::RECONCILED));
        assert!(report.settled());
        // 9 columns (-2..=6) by 7 rows (-2..=4).
        assert_eq!(e.assigned_len(), 63);
        assert_eq!(e.surface().visible_drawables(), 63);
        assert_eq!(report.diff.acquired.len(), 63);
    }

    #[test]
    fn settled_frames_do_no_work() {
        let mut e = engine();
        e.tick(0);
        let before = e.surface().counters();
        let report = e.tick(16);
        assert!(!report.moved());
        assert!(report.diff.is_empty());
        assert_eq!(e.surface().counters(), before);
    }

    #[test]
    fn palette_length_comes_from_the_palette() {
        let e = engine();
        assert_eq!(e.config().palette_len().get(), 25);
        assert_eq!(e.content(24), Some(&24));
        assert_eq!(e.content(25), None);
    }

    #[test]
    fn invalid_grid_is_rejected() {
        let options = EngineOptions {
            grid: GridConfig::builder().period(0, 5),
            ..EngineOptions::default()
        };
        let palette = Palette::new([()]).unwrap();
        let surface = RecordingSurface::new(Size::new(1.0, 1.0));
        let err = GridEngine::new(options, palette, surface, ManualScheduler::default()).unwrap_err();
        assert_eq!(err, ConfigError::EmptyPeriod { cols: 0, rows: 5 });
    }

    #[test]
    fn jump_rewindows_on_next_tick() {
        let mut e = engine();
        e.tick(0);
        e.jump_to(Vec2::new(1_000.0, -3_000.0));
        let report = e.tick(16);
        assert!(report.flags.contains(FrameFlags::RECONCILED));
        assert_eq!(e.window().offset(), Vec2::new(1_000.0, -3_000.0));
        assert!(e.pool_stats().total <= e.config().max_visible_cells());
    }
}
