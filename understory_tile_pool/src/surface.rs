// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rendering collaborator seam.

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Point, Size};
use smallvec::SmallVec;

/// Drawables returned by a point query, nearest first.
pub type Intersections<D> = SmallVec<[D; 4]>;

/// A rendering surface that owns the actual drawables.
///
/// The tile pool never draws anything itself. It asks the surface to create,
/// rebind, position, hide and destroy drawables, and identifies them by the
/// small copyable [`Drawable`](RenderSurface::Drawable) ids the surface hands
/// out.
///
/// All positions are in viewport units (the coordinate space of
/// `understory_tile_grid`). Mapping those to pixels is the surface's business,
/// which it can update in [`resize`](RenderSurface::resize).
pub trait RenderSurface {
    /// Identity of one drawable on this surface.
    type Drawable: Copy + Eq + Hash + Debug;

    /// Creates a drawable bound to palette entry `content_index`.
    ///
    /// May be called many times with the same index; the surface is expected
    /// to share decoded content between drawables.
    fn create_drawable(&mut self, content_index: usize) -> Self::Drawable;

    /// Rebinds an existing drawable to another palette entry.
    fn set_content(&mut self, drawable: Self::Drawable, content_index: usize);

    /// Places a drawable's top-left corner at `origin`, scaled about its
    /// center by `scale`.
    fn set_transform(&mut self, drawable: Self::Drawable, origin: Point, scale: f64);

    /// Shows or hides a drawable.
    fn set_visible(&mut self, drawable: Self::Drawable, visible: bool);

    /// Releases the drawable's resources. The id is never used again.
    fn destroy_drawable(&mut self, drawable: Self::Drawable);

    /// Returns the visible drawables under `point`, nearest first.
    fn query_intersections(&self, point: Point) -> Intersections<Self::Drawable>;

    /// The host viewport changed to `size` device pixels.
    fn resize(&mut self, size: Size);

    /// Returns `false` if `content_index` has no backing resource (for
    /// example, a failed load). The drawable is bound anyway and the surface
    /// shows a placeholder.
    fn has_content(&self, content_index: usize) -> bool {
        let _ = content_index;
        true
    }
}
