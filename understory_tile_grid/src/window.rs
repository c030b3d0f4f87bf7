// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parallax windowing: which logical cells intersect the viewport plus buffer.

use alloc::vec::Vec;
use core::ops::RangeInclusive;

use kurbo::{Point, Size, Vec2};

use crate::config::GridConfig;
use crate::index::{ActualCell, LogicalCell, content_index_of, wrap};
use crate::scalar::{ceil_index, floor_index};

/// A logical cell that is currently inside the window, with everything needed
/// to render it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibleCell {
    /// Unbounded grid coordinate; the recycling key.
    pub cell: LogicalCell,
    /// The cell reduced modulo the grid period.
    pub actual: ActualCell,
    /// Palette entry shown in this cell.
    pub content_index: usize,
    /// Vertical speed multiplier of the cell's column.
    pub speed: f64,
    /// Top-left corner on the unscrolled grid, in viewport units.
    pub origin: Point,
}

impl VisibleCell {
    /// Derives the render data for `cell`.
    #[must_use]
    pub fn resolve(config: &GridConfig, cell: LogicalCell) -> Self {
        let actual = cell.wrapped(config.cols(), config.rows());
        Self {
            cell,
            actual,
            content_index: content_index_of(actual, config.rows(), config.palette_len()),
            speed: config.column_speeds().get(actual.col),
            origin: config.cell_origin(cell),
        }
    }

    /// Top-left corner in the view for `offset`.
    #[must_use]
    pub fn origin_in_view(&self, offset: Vec2) -> Point {
        Point::new(
            self.origin.x - offset.x,
            self.origin.y - offset.y * self.speed,
        )
    }
}

/// The realized rows of one realized column.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSpan {
    /// Logical column.
    pub col: i64,
    /// Wrapped column.
    pub actual_col: u32,
    /// Vertical speed multiplier of this column.
    pub speed: f64,
    /// Realized logical rows, inclusive on both ends.
    pub rows: RangeInclusive<i64>,
    /// Index of this column's first cell in [`VisibleWindow::cells`].
    pub first_cell: usize,
}

/// The set of cells realized for one scroll offset.
///
/// Columns are contiguous and ascending; within a column, rows are contiguous
/// and ascending. Because each column scrolls at its own speed, different
/// columns generally cover different row ranges.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleWindow {
    offset: Vec2,
    columns: Vec<ColumnSpan>,
    cells: Vec<VisibleCell>,
}

impl VisibleWindow {
    /// Creates an empty window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The scroll offset this window was computed for.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Realized columns in ascending order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnSpan] {
        &self.columns
    }

    /// All realized cells, column by column.
    #[must_use]
    pub fn cells(&self) -> &[VisibleCell] {
        &self.cells
    }

    /// Number of realized cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if nothing is realized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Realized logical columns, or `None` for an empty window.
    #[must_use]
    pub fn col_range(&self) -> Option<RangeInclusive<i64>> {
        Some(self.columns.first()?.col..=self.columns.last()?.col)
    }

    /// Returns the realized cell at `cell`, if it is inside the window.
    #[must_use]
    pub fn get(&self, cell: LogicalCell) -> Option<&VisibleCell> {
        let first = self.columns.first()?;
        let column_idx = usize::try_from(cell.col.checked_sub(first.col)?).ok()?;
        let span = self.columns.get(column_idx)?;
        if !span.rows.contains(&cell.row) {
            return None;
        }
        let row_idx = usize::try_from(cell.row - span.rows.start()).ok()?;
        self.cells.get(span.first_cell + row_idx)
    }

    /// Returns `true` if `cell` is inside the window.
    #[must_use]
    pub fn contains(&self, cell: LogicalCell) -> bool {
        self.get(cell).is_some()
    }

    fn clear(&mut self) {
        self.columns.clear();
        self.cells.clear();
    }
}

/// Computes the window for `offset` over the square default viewport extent.
///
/// See [`compute_visible_in`] for the algorithm.
#[must_use]
pub fn compute_visible(offset: Vec2, config: &GridConfig) -> VisibleWindow {
    let mut window = VisibleWindow::new();
    compute_visible_in(offset, config, config.viewport_extent(), &mut window);
    window
}

/// Recomputes `out` for `offset` over a viewport of `extent` viewport units.
///
/// Columns run from `floor(x / w) - buffer` to `ceil((x + extent.w) / w) +
/// buffer`. Each column then applies the same formula on the row axis using
/// its own effective vertical offset `y * speed(column)`.
///
/// `out` is cleared first and its allocations are reused, so hosts can keep a
/// single window alive across frames. A non-finite offset yields an empty
/// window.
pub fn compute_visible_in(offset: Vec2, config: &GridConfig, extent: Size, out: &mut VisibleWindow) {
    out.clear();
    out.offset = offset;
    if !offset.is_finite() {
        return;
    }

    let cell = config.cell_size();
    let buffer = i64::from(config.buffer());
    let cols = axis_range(offset.x, extent.width, cell.width, buffer);

    for col in cols {
        let actual_col = wrap(col, config.cols());
        let speed = config.column_speeds().get(actual_col);
        let rows = axis_range(offset.y * speed, extent.height, cell.height, buffer);
        let first_cell = out.cells.len();
        for row in rows.clone() {
            out.cells.push(VisibleCell::resolve(config, LogicalCell::new(col, row)));
        }
        out.columns.push(ColumnSpan {
            col,
            actual_col,
            speed,
            rows,
            first_cell,
        });
    }
}

/// Inclusive index range covering `[offset, offset + extent]` plus `buffer`
/// cells on each side.
///
/// The span is capped at `ceil(extent / cell) + 2 * buffer + 2`, which is the
/// exact worst case; the cap only bites when rounding in the two divisions
/// disagrees.
fn axis_range(offset: f64, extent: f64, cell: f64, buffer: i64) -> RangeInclusive<i64> {
    let start = floor_index(offset / cell).saturating_sub(buffer);
    let end = ceil_index((offset + extent) / cell).saturating_add(buffer);
    let max_span = ceil_index(extent / cell)
        .max(0)
        .saturating_add(buffer.saturating_mul(2))
        .saturating_add(2);
    let end = end.min(start.saturating_add(max_span - 1));
    start..=end
}
