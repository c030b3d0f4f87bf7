// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keeping the cell → handle map in step with the visible window.

use alloc::vec::Vec;

use hashbrown::HashMap;
use understory_tile_grid::{LogicalCell, VisibleWindow};

use crate::pool::{PoolHandle, TilePool};
use crate::surface::RenderSurface;

/// Cells that changed during one [`Assignments::reconcile`] pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileDiff {
    /// Cells that entered the window and received a handle, in window order.
    pub acquired: Vec<LogicalCell>,
    /// Cells that left the window and gave their handle back, sorted.
    pub released: Vec<LogicalCell>,
    /// Cells that kept their handle.
    pub retained: usize,
}

impl ReconcileDiff {
    /// Returns `true` if nothing entered or left the window.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.acquired.is_empty() && self.released.is_empty()
    }
}

/// The authoritative record of which cell owns which pool slot.
///
/// Each key owns its [`PoolHandle`] outright, so no slot can be assigned to
/// two cells. The map only changes through [`reconcile`](Self::reconcile) and
/// [`release_all`](Self::release_all).
#[derive(Debug, Default)]
pub struct Assignments {
    map: HashMap<LogicalCell, PoolHandle>,
    leaving: Vec<(LogicalCell, PoolHandle)>,
}

impl Assignments {
    /// Creates an empty assignment map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Brings the map in line with `window`.
    ///
    /// Cells still in the window keep their handle untouched, because content
    /// is a pure function of the cell. Cells that left release their handle
    /// first, so cells that entered in the same pass recycle those slots
    /// before any new drawable is created.
    pub fn reconcile<S: RenderSurface>(
        &mut self,
        pool: &mut TilePool<S::Drawable>,
        surface: &mut S,
        window: &VisibleWindow,
    ) -> ReconcileDiff {
        let mut diff = ReconcileDiff::default();

        self.leaving
            .extend(self.map.extract_if(|cell, _| !window.contains(*cell)));
        self.leaving.sort_unstable_by_key(|(cell, _)| *cell);
        for (cell, handle) in self.leaving.drain(..) {
            pool.release(surface, handle);
            diff.released.push(cell);
        }

        for visible in window.cells() {
            if self.map.contains_key(&visible.cell) {
                diff.retained += 1;
                continue;
            }
            let handle = pool.acquire(surface, visible.cell, visible.content_index);
            self.map.insert(visible.cell, handle);
            diff.acquired.push(visible.cell);
        }

        tracing::trace!(
            acquired = diff.acquired.len(),
            released = diff.released.len(),
            retained = diff.retained,
            "reconciled tile assignments"
        );
        diff
    }

    /// Releases every handle back to the pool.
    pub fn release_all<S: RenderSurface>(
        &mut self,
        pool: &mut TilePool<S::Drawable>,
        surface: &mut S,
    ) -> usize {
        let released = self.map.len();
        for (_, handle) in self.map.drain() {
            pool.release(surface, handle);
        }
        released
    }

    /// The handle assigned to `cell`.
    #[must_use]
    pub fn get(&self, cell: LogicalCell) -> Option<&PoolHandle> {
        self.map.get(&cell)
    }

    /// Returns `true` if `cell` currently owns a handle.
    #[must_use]
    pub fn contains(&self, cell: LogicalCell) -> bool {
        self.map.contains_key(&cell)
    }

    /// Iterates assignments in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (LogicalCell, &PoolHandle)> + '_ {
        self.map.iter().map(|(cell, handle)| (*cell, handle))
    }

    /// Number of assigned cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if no cell is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
