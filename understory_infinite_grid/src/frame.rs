// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Vec2;
use smallvec::SmallVec;
use understory_tile_grid::VisibleCell;
use understory_tile_pool::ReconcileDiff;

bitflags::bitflags! {
    /// What happened during one frame.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FrameFlags: u8 {
        /// The rendered offset moved.
        const MOVED         = 0b0000_0001;
        /// Cells entered or left the window.
        const RECONCILED    = 0b0000_0010;
        /// Motion is at rest.
        const SETTLED       = 0b0000_0100;
        /// The surface is moving or received scroll input recently.
        const SCROLLING     = 0b0000_1000;
        /// The hovered cell changed.
        const HOVER_CHANGED = 0b0001_0000;
        /// The view was resized.
        const RESIZED       = 0b0010_0000;
    }
}

/// Something the UI layer may want to react to.
///
/// Cells carry their `content_index`, so the UI can look up palette metadata
/// (a caption, a link) with [`GridEngine::content`](crate::GridEngine::content).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GridEvent {
    /// The pointer moved onto a tile.
    HoverEnter(VisibleCell),
    /// The pointer left a tile, or the tile scrolled out from under it.
    HoverLeave(VisibleCell),
    /// A tile was clicked or tapped.
    Activated(VisibleCell),
}

/// Grid events emitted in one frame, in the order they happened.
pub type FrameEvents = SmallVec<[GridEvent; 4]>;

/// Summary of one [`GridEngine::tick`](crate::GridEngine::tick).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// What changed.
    pub flags: FrameFlags,
    /// The rendered offset after the frame.
    pub offset: Vec2,
    /// Tile scale applied this frame.
    pub scale: f64,
    /// Cells that entered and left the window. Empty when the window was not
    /// recomputed.
    pub diff: ReconcileDiff,
    /// Hover and activation events.
    pub events: FrameEvents,
}

impl FrameReport {
    /// Returns `true` if the offset moved.
    #[must_use]
    pub fn moved(&self) -> bool {
        self.flags.contains(FrameFlags::MOVED)
    }

    /// Returns `true` if motion is at rest.
    #[must_use]
    pub fn settled(&self) -> bool {
        self.flags.contains(FrameFlags::SETTLED)
    }

    /// Cells activated this frame.
    pub fn activations(&self) -> impl Iterator<Item = &VisibleCell> + '_ {
        self.events.iter().filter_map(|event| match event {
            GridEvent::Activated(cell) => Some(cell),
            _ => None,
        })
    }
}
