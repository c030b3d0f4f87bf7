// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wraparound coordinate math: logical cells, actual cells, and content indices.
//!
//! Every function here is total. Logical coordinates may be any `i64`
//! (including negative values far from the origin); wrapping always lands in
//! `[0, period)`.

use core::num::{NonZeroU32, NonZeroUsize};

/// Reduces `n` into `[0, period)`.
///
/// This is the Euclidean remainder, so negative inputs wrap around from the
/// end of the period rather than producing negative results:
///
/// ```rust
/// use core::num::NonZeroU32;
/// use understory_tile_grid::wrap;
///
/// let five = NonZeroU32::new(5).unwrap();
/// assert_eq!(wrap(7, five), 2);
/// assert_eq!(wrap(-1, five), 4);
/// assert_eq!(wrap(-5, five), 0);
/// ```
#[must_use]
pub fn wrap(n: i64, period: NonZeroU32) -> u32 {
    let wrapped = n.rem_euclid(i64::from(period.get()));
    #[expect(
        clippy::cast_possible_truncation,
        reason = "rem_euclid by a u32 period is always in [0, period)"
    )]
    {
        wrapped as u32
    }
}

/// Unbounded integer grid coordinate.
///
/// Logical cells are never rendered directly; they are the identity a tile has
/// while it is on screen, and the key used to recycle render objects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalCell {
    /// Column, growing to the right.
    pub col: i64,
    /// Row, growing downward.
    pub row: i64,
}

impl LogicalCell {
    /// Creates a logical cell from a column and row.
    #[must_use]
    pub const fn new(col: i64, row: i64) -> Self {
        Self { col, row }
    }

    /// Reduces this cell modulo the grid period.
    #[must_use]
    pub fn wrapped(self, cols: NonZeroU32, rows: NonZeroU32) -> ActualCell {
        ActualCell {
            col: wrap(self.col, cols),
            row: wrap(self.row, rows),
        }
    }
}

/// A logical cell reduced modulo the grid period.
///
/// Components always satisfy `col < cols` and `row < rows`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActualCell {
    /// Wrapped column in `[0, cols)`.
    pub col: u32,
    /// Wrapped row in `[0, rows)`.
    pub row: u32,
}

/// Maps an actual cell to its entry in the content palette.
///
/// The palette is walked column-major (`col * rows + row`) and wraps when it
/// is shorter than the grid period. The product is computed in `u64`, so large
/// periods cannot overflow.
#[must_use]
pub fn content_index_of(actual: ActualCell, rows: NonZeroU32, palette_len: NonZeroUsize) -> usize {
    let linear = u64::from(actual.col) * u64::from(rows.get()) + u64::from(actual.row);
    let len = palette_len.get() as u64;
    #[expect(
        clippy::cast_possible_truncation,
        reason = "remainder is below palette_len, which is a usize"
    )]
    {
        (linear % len) as usize
    }
}
