// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot arena of recyclable drawables.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;
use core::sync::atomic::{AtomicU32, Ordering};

use hashbrown::HashMap;
use kurbo::Point;
use understory_tile_grid::{GridConfig, LogicalCell};

use crate::surface::RenderSurface;

static NEXT_POOL_ID: AtomicU32 = AtomicU32::new(0);

/// Index of a slot in a [`TilePool`].
///
/// Unlike [`PoolHandle`], a slot id is plain data: it can be copied and
/// compared freely, but holding one grants nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(u32);

impl SlotId {
    /// Position of the slot in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Exclusive claim on one active slot.
///
/// A handle is neither `Clone` nor `Copy`. It is minted by
/// [`TilePool::acquire`] and consumed by [`TilePool::release`], so a slot can
/// never be owned by two cells at once, and dropping a handle without
/// releasing it leaves the slot marked active rather than silently reusing it.
///
/// Handles carry the identity of the pool that minted them; a pool ignores
/// handles from any other pool.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PoolHandle {
    pool: u32,
    slot: SlotId,
}

impl PoolHandle {
    /// The slot this handle owns.
    #[must_use]
    pub fn slot(&self) -> SlotId {
        self.slot
    }
}

/// What a slot is doing right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotState {
    /// Parked in the free list, hidden.
    Idle,
    /// Rendering the given cell.
    Active(LogicalCell),
}

#[derive(Clone, Debug)]
struct Slot<D> {
    drawable: D,
    content_index: usize,
    state: SlotState,
}

/// Counters describing a pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Slots in the arena, active or idle.
    pub total: usize,
    /// Slots owned by a handle.
    pub active: usize,
    /// Slots on the free list.
    pub idle: usize,
    /// Size above which growth is reported as a warning.
    pub soft_cap: usize,
    /// Drawables created over the pool's lifetime.
    pub created: u64,
    /// Acquisitions served from the free list.
    pub recycled: u64,
}

/// Arena of drawables with a free list.
///
/// Drawables are created lazily and never destroyed until
/// [`teardown`](Self::teardown); a released drawable is hidden and parked for
/// the next [`acquire`](Self::acquire). The pool also remembers which slot
/// every drawable lives in, so a drawable reported by a surface query can be
/// traced back to the cell that owns it.
pub struct TilePool<D> {
    id: u32,
    slots: Vec<Slot<D>>,
    free: Vec<SlotId>,
    by_drawable: HashMap<D, SlotId>,
    soft_cap: usize,
    next_warning: usize,
    created: u64,
    recycled: u64,
}

impl<D: Debug> Debug for TilePool<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TilePool")
            .field("total", &self.slots.len())
            .field("idle", &self.free.len())
            .field("soft_cap", &self.soft_cap)
            .finish_non_exhaustive()
    }
}

impl<D: Copy + Eq + Hash + Debug> TilePool<D> {
    /// Creates an empty pool that warns once it grows past `soft_cap` slots.
    #[must_use]
    pub fn new(soft_cap: usize) -> Self {
        Self {
            id: NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed),
            slots: Vec::new(),
            free: Vec::new(),
            by_drawable: HashMap::new(),
            soft_cap,
            next_warning: soft_cap,
            created: 0,
            recycled: 0,
        }
    }

    /// Creates a pool whose soft cap is four windows' worth of cells.
    #[must_use]
    pub fn for_config(config: &GridConfig) -> Self {
        Self::new(config.max_visible_cells().saturating_mul(4))
    }

    /// Changes the soft cap, for example after the visible extent grew.
    pub fn set_soft_cap(&mut self, soft_cap: usize) {
        self.soft_cap = soft_cap;
        self.next_warning = self.next_warning.max(soft_cap);
    }

    /// Claims a slot for `cell`, bound to `content_index`.
    ///
    /// Idle slots are reused first (rebinding their content if it differs);
    /// a new drawable is created only when the free list is empty. The
    /// drawable's visibility and transform are left to the caller.
    pub fn acquire<S>(&mut self, surface: &mut S, cell: LogicalCell, content_index: usize) -> PoolHandle
    where
        S: RenderSurface<Drawable = D>,
    {
        if !surface.has_content(content_index) {
            tracing::warn!(
                content_index,
                col = cell.col,
                row = cell.row,
                "no content loaded for palette entry, binding placeholder"
            );
        }

        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot.index()];
            if entry.content_index != content_index {
                surface.set_content(entry.drawable, content_index);
                entry.content_index = content_index;
            }
            entry.state = SlotState::Active(cell);
            self.recycled += 1;
            return PoolHandle {
                pool: self.id,
                slot,
            };
        }

        let drawable = surface.create_drawable(content_index);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "a pool with more than u32::MAX drawables is not a supported configuration"
        )]
        let slot = SlotId(self.slots.len() as u32);
        self.slots.push(Slot {
            drawable,
            content_index,
            state: SlotState::Active(cell),
        });
        self.by_drawable.insert(drawable, slot);
        self.created += 1;

        if self.slots.len() > self.next_warning {
            tracing::warn!(
                slots = self.slots.len(),
                soft_cap = self.soft_cap,
                "tile pool grew past its soft cap; check buffer and windowing"
            );
            self.next_warning = self.slots.len().saturating_mul(2);
        }
        PoolHandle {
            pool: self.id,
            slot,
        }
    }

    /// Returns a slot to the free list, hiding its drawable and resetting its
    /// transform.
    ///
    /// A handle minted by another pool is dropped with an error event and
    /// leaves this pool untouched.
    pub fn release<S>(&mut self, surface: &mut S, handle: PoolHandle)
    where
        S: RenderSurface<Drawable = D>,
    {
        let slot = handle.slot;
        let entry = match self.slots.get_mut(slot.index()) {
            Some(entry) if handle.pool == self.id => entry,
            _ => {
                tracing::error!(
                    pool = self.id,
                    handle_pool = handle.pool,
                    slot = slot.0,
                    "ignoring a handle from another tile pool"
                );
                return;
            }
        };
        if entry.state == SlotState::Idle {
            tracing::error!(slot = slot.0, "ignoring release of an idle slot");
            return;
        }
        surface.set_visible(entry.drawable, false);
        surface.set_transform(entry.drawable, Point::ZERO, 1.0);
        entry.state = SlotState::Idle;
        self.free.push(slot);
    }

    /// The drawable behind a handle, or `None` for a handle from another pool.
    #[must_use]
    pub fn drawable(&self, handle: &PoolHandle) -> Option<D> {
        if handle.pool != self.id {
            return None;
        }
        self.slots.get(handle.slot.index()).map(|s| s.drawable)
    }

    /// Current state of a slot.
    #[must_use]
    pub fn state(&self, slot: SlotId) -> Option<SlotState> {
        self.slots.get(slot.index()).map(|s| s.state)
    }

    /// The cell a slot is rendering, if it is active.
    #[must_use]
    pub fn owner(&self, slot: SlotId) -> Option<LogicalCell> {
        match self.state(slot)? {
            SlotState::Active(cell) => Some(cell),
            SlotState::Idle => None,
        }
    }

    /// The slot holding `drawable`, if it came from this pool.
    #[must_use]
    pub fn slot_of(&self, drawable: D) -> Option<SlotId> {
        self.by_drawable.get(&drawable).copied()
    }

    /// The cell currently rendered by `drawable`, if any.
    #[must_use]
    pub fn owner_of_drawable(&self, drawable: D) -> Option<LogicalCell> {
        self.owner(self.slot_of(drawable)?)
    }

    /// Palette entry a slot is bound to.
    #[must_use]
    pub fn content_index(&self, slot: SlotId) -> Option<usize> {
        self.slots.get(slot.index()).map(|s| s.content_index)
    }

    /// Iterates every slot with its state, in slot order.
    pub fn slots(&self) -> impl Iterator<Item = (SlotId, SlotState)> + '_ {
        self.slots.iter().enumerate().map(|(i, slot)| {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "slot count never exceeds u32::MAX, see acquire"
            )]
            let id = SlotId(i as u32);
            (id, slot.state)
        })
    }

    /// Number of slots, active or idle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no drawable has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Snapshot of the pool counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            total: self.slots.len(),
            active: self.slots.len() - self.free.len(),
            idle: self.free.len(),
            soft_cap: self.soft_cap,
            created: self.created,
            recycled: self.recycled,
        }
    }

    /// Destroys every drawable and empties the pool.
    ///
    /// All handles must have been released first.
    pub fn teardown<S>(&mut self, surface: &mut S)
    where
        S: RenderSurface<Drawable = D>,
    {
        debug_assert_eq!(
            self.free.len(),
            self.slots.len(),
            "tearing down a pool with outstanding handles"
        );
        tracing::debug!(drawables = self.slots.len(), "tearing down tile pool");
        for slot in self.slots.drain(..) {
            surface.destroy_drawable(slot.drawable);
        }
        self.free.clear();
        self.by_drawable.clear();
        self.next_warning = self.soft_cap;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use crate::RecordingSurface;
    use kurbo::Size;

    fn surface() -> RecordingSurface {
        RecordingSurface::new(Size::new(10.0, 10.0))
    }

    #[test]
    fn acquire_creates_then_recycles() {
        let mut surface = surface();
        let mut pool = TilePool::new(8);

        let a = pool.acquire(&mut surface, LogicalCell::new(0, 0), 3);
        let slot_a = a.slot();
        assert_eq!(pool.owner(slot_a), Some(LogicalCell::new(0, 0)));
        pool.release(&mut surface, a);
        assert_eq!(pool.owner(slot_a), None);

        let b = pool.acquire(&mut surface, LogicalCell::new(9, 9), 3);
        assert_eq!(b.slot(), slot_a);
        let stats = pool.stats();
        assert_eq!(stats.created, 1);
        assert_eq!(stats.recycled, 1);
        assert_eq!(stats.active, 1);
        // Same content index: no rebind needed.
        assert_eq!(surface.counters().content_rebinds, 0);
        pool.release(&mut surface, b);
    }

    #[test]
    fn recycling_rebinds_changed_content() {
        let mut surface = surface();
        let mut pool = TilePool::new(8);
        let a = pool.acquire(&mut surface, LogicalCell::new(0, 0), 1);
        let drawable = pool.drawable(&a).unwrap();
        pool.release(&mut surface, a);

        let b = pool.acquire(&mut surface, LogicalCell::new(0, 1), 2);
        assert_eq!(pool.drawable(&b), Some(drawable));
        assert_eq!(surface.drawable(drawable).unwrap().content_index, 2);
        assert_eq!(surface.counters().content_rebinds, 1);
        pool.release(&mut surface, b);
    }

    #[test]
    fn release_hides_and_resets_transform() {
        let mut surface = surface();
        let mut pool = TilePool::new(8);
        let a = pool.acquire(&mut surface, LogicalCell::new(0, 0), 0);
        let d = pool.drawable(&a).unwrap();
        surface.set_transform(d, Point::new(30.0, 40.0), 0.9);
        surface.set_visible(d, true);

        pool.release(&mut surface, a);
        let state = surface.drawable(d).unwrap();
        assert!(!state.visible);
        assert_eq!(state.origin, Point::ZERO);
        assert_eq!(state.scale, 1.0);
    }

    #[test]
    fn drawables_map_back_to_their_owner() {
        let mut surface = surface();
        let mut pool = TilePool::new(8);
        let a = pool.acquire(&mut surface, LogicalCell::new(-4, 2), 0);
        let d = pool.drawable(&a).unwrap();
        assert_eq!(pool.slot_of(d), Some(a.slot()));
        assert_eq!(pool.owner_of_drawable(d), Some(LogicalCell::new(-4, 2)));
        pool.release(&mut surface, a);
        assert_eq!(pool.owner_of_drawable(d), None);
    }

    #[test]
    fn growth_past_soft_cap_continues() {
        let mut surface = surface();
        let mut pool = TilePool::new(2);
        let handles: Vec<_> = (0..5)
            .map(|i| pool.acquire(&mut surface, LogicalCell::new(i, 0), 0))
            .collect();
        assert_eq!(pool.len(), 5);
        assert_eq!(pool.stats().soft_cap, 2);
        for h in handles {
            pool.release(&mut surface, h);
        }
    }

    #[test]
    fn missing_content_still_binds() {
        let mut surface = surface();
        surface.mark_missing(7);
        let mut pool = TilePool::new(2);
        let a = pool.acquire(&mut surface, LogicalCell::new(0, 0), 7);
        let d = pool.drawable(&a).unwrap();
        assert_eq!(surface.drawable(d).unwrap().content_index, 7);
        pool.release(&mut surface, a);
    }

    #[test]
    fn handles_from_another_pool_are_ignored() {
        let mut surface = surface();
        let mut ours = TilePool::new(8);
        let mut theirs = TilePool::new(8);

        // Slot 0 of `ours` is idle when the foreign handle for slot 0 arrives.
        let parked = ours.acquire(&mut surface, LogicalCell::new(0, 0), 0);
        ours.release(&mut surface, parked);
        let foreign = theirs.acquire(&mut surface, LogicalCell::new(5, 5), 0);
        assert_eq!(foreign.slot(), SlotId(0));
        assert_eq!(ours.drawable(&foreign), None);
        ours.release(&mut surface, foreign);
        assert_eq!(ours.stats().idle, 1);

        // The free list was not doubled: two acquisitions get two slots.
        let a = ours.acquire(&mut surface, LogicalCell::new(1, 0), 0);
        let b = ours.acquire(&mut surface, LogicalCell::new(2, 0), 0);
        assert_ne!(a.slot(), b.slot());
        assert_eq!(ours.stats().active, 2);
        assert_eq!(theirs.owner(SlotId(0)), Some(LogicalCell::new(5, 5)));
        ours.release(&mut surface, a);
        ours.release(&mut surface, b);
    }

    #[test]
    fn teardown_destroys_everything() {
        let mut surface = surface();
        let mut pool = TilePool::new(8);
        let a = pool.acquire(&mut surface, LogicalCell::new(0, 0), 0);
        let b = pool.acquire(&mut surface, LogicalCell::new(1, 0), 1);
        pool.release(&mut surface, a);
        pool.release(&mut surface, b);

        pool.teardown(&mut surface);
        assert!(pool.is_empty());
        assert_eq!(surface.live_drawables(), 0);
        assert_eq!(surface.counters().destroyed, 2);
    }
}
