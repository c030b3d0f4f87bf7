// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid configuration, column speed tables, and configuration errors.

use alloc::vec::Vec;
use core::num::{NonZeroU32, NonZeroUsize};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Size, Vec2};

use crate::index::{LogicalCell, wrap};
use crate::scalar::index_to_units;

/// Error returned when a [`GridConfig`] or [`crate::Palette`] cannot be built.
///
/// All of these are fatal: a grid with degenerate geometry would silently
/// produce wrong windows, so construction refuses it instead.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The wraparound period has no columns or no rows.
    #[error("grid period must be positive, got {cols} columns by {rows} rows")]
    EmptyPeriod {
        /// Configured column count.
        cols: u32,
        /// Configured row count.
        rows: u32,
    },
    /// The viewport extent is zero, negative, or not finite.
    #[error("viewport extent must be positive and finite, got {0}")]
    InvalidViewport(f64),
    /// The derived cell size is zero, negative, or not finite.
    #[error("cell size must be positive and finite, got {width} x {height}")]
    NonPositiveCellSize {
        /// Derived cell width (`viewport_units / visible_cols`).
        width: f64,
        /// Derived cell height (`viewport_units / visible_rows`).
        height: f64,
    },
    /// The content palette has no entries.
    #[error("content palette is empty")]
    EmptyPalette,
    /// A column speed multiplier is zero, negative, or not finite.
    #[error("speed multiplier for column {col} must be positive and finite, got {value}")]
    InvalidColumnSpeed {
        /// Column index in the speed table.
        col: usize,
        /// Offending multiplier.
        value: f64,
    },
    /// The buffer margin is zero cells.
    #[error("buffer margin must be at least one cell")]
    EmptyBuffer,
    /// The cell inset is outside `[0, 0.5)`.
    #[error("cell inset must be in [0, 0.5), got {0}")]
    InvalidInset(f64),
}

/// Per-column vertical speed multipliers.
///
/// Each column of the wraparound period scrolls vertically at
/// `offset.y * multiplier`. Columns without an entry use `1.0`. Which column
/// is fastest is a design decision, so the table is plain configuration; the
/// named presets reproduce a few layouts that work well in practice.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ColumnSpeeds {
    table: Vec<f64>,
}

impl ColumnSpeeds {
    /// Every column scrolls at the baseline rate.
    #[must_use]
    pub fn uniform() -> Self {
        Self { table: Vec::new() }
    }

    /// Builds a table from explicit multipliers, indexed by actual column.
    #[must_use]
    pub fn from_multipliers(multipliers: impl IntoIterator<Item = f64>) -> Self {
        Self {
            table: multipliers.into_iter().collect(),
        }
    }

    /// Staggered five-column layout: the fourth column is fastest, then the
    /// third, second and first; the fifth is slowest.
    #[must_use]
    pub fn missionary() -> Self {
        Self::from_multipliers([0.8, 1.0, 1.2, 1.4, 0.6])
    }

    /// Five-column layout where every column trails the input noticeably.
    #[must_use]
    pub fn drifting() -> Self {
        Self::from_multipliers([0.25, 0.3, 0.35, 0.4, 0.2])
    }

    /// Five-column layout for large wheel deltas; columns barely move
    /// relative to each other.
    #[must_use]
    pub fn slow_drift() -> Self {
        Self::from_multipliers([0.07, 0.08, 0.09, 0.095, 0.06])
    }

    /// Returns the configured multipliers.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.table
    }

    /// Returns the multiplier for an actual column, or `1.0` if unset.
    #[must_use]
    pub fn get(&self, actual_col: u32) -> f64 {
        self.table.get(actual_col as usize).copied().unwrap_or(1.0)
    }

    /// Returns the multiplier for a logical column of a grid with `cols`
    /// columns per period.
    #[must_use]
    pub fn speed(&self, col: i64, cols: NonZeroU32) -> f64 {
        self.get(wrap(col, cols))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self
            .table
            .iter()
            .enumerate()
            .find(|(_, v)| !(v.is_finite() && **v > 0.0))
        {
            Some((col, &value)) => Err(ConfigError::InvalidColumnSpeed { col, value }),
            None => Ok(()),
        }
    }
}

/// Unvalidated grid parameters.
///
/// Defaults describe a 5×5 period showing four columns and one and a half rows
/// across a 100-unit viewport, with a two-cell buffer. `palette_len` has no
/// meaningful default and must be set before [`GridConfigBuilder::build`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfigBuilder {
    /// Columns in the wraparound period.
    pub cols: u32,
    /// Rows in the wraparound period.
    pub rows: u32,
    /// Columns visible across the viewport (may be fractional).
    pub visible_cols: f64,
    /// Rows visible down the viewport (may be fractional).
    pub visible_rows: f64,
    /// Viewport extent in normalized units along each axis.
    pub viewport_units: f64,
    /// Extra cells realized on every side of the viewport.
    pub buffer: u32,
    /// Number of entries in the content palette.
    pub palette_len: usize,
    /// Per-column parallax multipliers.
    pub column_speeds: ColumnSpeeds,
    /// Fraction of a cell left empty on each side of its tile.
    pub cell_inset: f64,
}

impl Default for GridConfigBuilder {
    fn default() -> Self {
        Self {
            cols: 5,
            rows: 5,
            visible_cols: 4.0,
            visible_rows: 1.5,
            viewport_units: 100.0,
            buffer: 2,
            palette_len: 0,
            column_speeds: ColumnSpeeds::uniform(),
            cell_inset: 0.01,
        }
    }
}

impl GridConfigBuilder {
    /// Sets the wraparound period.
    #[must_use]
    pub fn period(mut self, cols: u32, rows: u32) -> Self {
        self.cols = cols;
        self.rows = rows;
        self
    }

    /// Sets how many columns and rows fit in the viewport.
    #[must_use]
    pub fn visible(mut self, cols: f64, rows: f64) -> Self {
        self.visible_cols = cols;
        self.visible_rows = rows;
        self
    }

    /// Sets the viewport extent in normalized units.
    #[must_use]
    pub fn viewport_units(mut self, units: f64) -> Self {
        self.viewport_units = units;
        self
    }

    /// Sets the buffer margin in cells. Must be at least one, so offsets the
    /// window lags behind by never expose an unrealized edge.
    #[must_use]
    pub fn buffer(mut self, cells: u32) -> Self {
        self.buffer = cells;
        self
    }

    /// Sets the content palette length.
    #[must_use]
    pub fn palette_len(mut self, len: usize) -> Self {
        self.palette_len = len;
        self
    }

    /// Sets the column speed table.
    #[must_use]
    pub fn column_speeds(mut self, speeds: ColumnSpeeds) -> Self {
        self.column_speeds = speeds;
        self
    }

    /// Sets the per-side cell inset as a fraction of the cell.
    #[must_use]
    pub fn cell_inset(mut self, inset: f64) -> Self {
        self.cell_inset = inset;
        self
    }

    /// Validates the parameters and derives cell geometry.
    pub fn build(self) -> Result<GridConfig, ConfigError> {
        let (Some(cols), Some(rows)) = (NonZeroU32::new(self.cols), NonZeroU32::new(self.rows))
        else {
            return Err(ConfigError::EmptyPeriod {
                cols: self.cols,
                rows: self.rows,
            });
        };
        if !(self.viewport_units.is_finite() && self.viewport_units > 0.0) {
            return Err(ConfigError::InvalidViewport(self.viewport_units));
        }
        let cell_width = self.viewport_units / self.visible_cols;
        let cell_height = self.viewport_units / self.visible_rows;
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !(valid(cell_width) && valid(cell_height)) {
            return Err(ConfigError::NonPositiveCellSize {
                width: cell_width,
                height: cell_height,
            });
        }
        if self.buffer == 0 {
            return Err(ConfigError::EmptyBuffer);
        }
        let palette_len = NonZeroUsize::new(self.palette_len).ok_or(ConfigError::EmptyPalette)?;
        self.column_speeds.validate()?;
        if !(0.0..0.5).contains(&self.cell_inset) {
            return Err(ConfigError::InvalidInset(self.cell_inset));
        }

        Ok(GridConfig {
            cols,
            rows,
            visible_cols: self.visible_cols,
            visible_rows: self.visible_rows,
            viewport_units: self.viewport_units,
            buffer: self.buffer,
            palette_len,
            column_speeds: self.column_speeds,
            cell_inset: self.cell_inset,
            cell_size: Size::new(cell_width, cell_height),
        })
    }
}

/// Validated, immutable grid configuration.
///
/// ```rust
/// use understory_tile_grid::{ColumnSpeeds, GridConfig};
///
/// let config = GridConfig::builder()
///     .period(5, 5)
///     .visible(4.0, 1.5)
///     .palette_len(25)
///     .column_speeds(ColumnSpeeds::missionary())
///     .build()
///     .unwrap();
///
/// assert_eq!(config.cell_size().width, 25.0);
/// assert_eq!(config.speed(3), 1.4);
/// assert_eq!(config.speed(-2), 1.4);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    cols: NonZeroU32,
    rows: NonZeroU32,
    visible_cols: f64,
    visible_rows: f64,
    viewport_units: f64,
    buffer: u32,
    palette_len: NonZeroUsize,
    column_speeds: ColumnSpeeds,
    cell_inset: f64,
    cell_size: Size,
}

impl GridConfig {
    /// Starts from the default parameters.
    #[must_use]
    pub fn builder() -> GridConfigBuilder {
        GridConfigBuilder::default()
    }

    /// Columns in the wraparound period.
    #[must_use]
    pub fn cols(&self) -> NonZeroU32 {
        self.cols
    }

    /// Rows in the wraparound period.
    #[must_use]
    pub fn rows(&self) -> NonZeroU32 {
        self.rows
    }

    /// Columns visible across the viewport.
    #[must_use]
    pub fn visible_cols(&self) -> f64 {
        self.visible_cols
    }

    /// Rows visible down the viewport.
    #[must_use]
    pub fn visible_rows(&self) -> f64 {
        self.visible_rows
    }

    /// Viewport extent in normalized units.
    #[must_use]
    pub fn viewport_units(&self) -> f64 {
        self.viewport_units
    }

    /// The square `viewport_units × viewport_units` extent.
    #[must_use]
    pub fn viewport_extent(&self) -> Size {
        Size::new(self.viewport_units, self.viewport_units)
    }

    /// Buffer margin in cells.
    #[must_use]
    pub fn buffer(&self) -> u32 {
        self.buffer
    }

    /// Content palette length.
    #[must_use]
    pub fn palette_len(&self) -> NonZeroUsize {
        self.palette_len
    }

    /// The column speed table.
    #[must_use]
    pub fn column_speeds(&self) -> &ColumnSpeeds {
        &self.column_speeds
    }

    /// Per-side inset as a fraction of the cell.
    #[must_use]
    pub fn cell_inset(&self) -> f64 {
        self.cell_inset
    }

    /// Cell width and height in viewport units.
    #[must_use]
    pub fn cell_size(&self) -> Size {
        self.cell_size
    }

    /// Size of the inset tile drawn inside each cell.
    #[must_use]
    pub fn tile_size(&self) -> Size {
        let keep = 1.0 - 2.0 * self.cell_inset;
        Size::new(self.cell_size.width * keep, self.cell_size.height * keep)
    }

    /// Speed multiplier for any logical column.
    #[must_use]
    pub fn speed(&self, col: i64) -> f64 {
        self.column_speeds.speed(col, self.cols)
    }

    /// Upper bound on the number of cells a window over the default viewport
    /// extent can contain, for any offset.
    #[must_use]
    pub fn max_visible_cells(&self) -> usize {
        self.max_visible_cells_in(self.viewport_extent())
    }

    /// Upper bound on the number of cells a window over `extent` can contain.
    ///
    /// A span of `v` cells starting at an arbitrary fractional offset touches
    /// at most `ceil(v) + 1` cells; the buffer adds `buffer` on each side and
    /// the inclusive range one more.
    #[must_use]
    pub fn max_visible_cells_in(&self, extent: Size) -> usize {
        let buffer = f64::from(self.buffer);
        let cols = (extent.width / self.cell_size.width).ceil() + 2.0 * buffer + 2.0;
        let rows = (extent.height / self.cell_size.height).ceil() + 2.0 * buffer + 2.0;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "Both factors are small positive integers for any sane configuration"
        )]
        {
            (cols.max(0.0) as usize).saturating_mul(rows.max(0.0) as usize)
        }
    }

    /// Position of a cell's top-left corner on the unscrolled grid.
    #[must_use]
    pub fn cell_origin(&self, cell: LogicalCell) -> Point {
        Point::new(
            index_to_units(cell.col, self.cell_size.width),
            index_to_units(cell.row, self.cell_size.height),
        )
    }

    /// Position of a cell's top-left corner in the view for `offset`.
    ///
    /// Horizontal scroll applies to every column equally; vertical scroll is
    /// scaled by the column's speed multiplier.
    #[must_use]
    pub fn cell_origin_in_view(&self, cell: LogicalCell, offset: Vec2) -> Point {
        let origin = self.cell_origin(cell);
        Point::new(
            origin.x - offset.x,
            origin.y - offset.y * self.speed(cell.col),
        )
    }

    /// The inset rectangle a cell's tile occupies in the view for `offset`.
    #[must_use]
    pub fn cell_rect_in_view(&self, cell: LogicalCell, offset: Vec2) -> Rect {
        let origin = self.cell_origin_in_view(cell, offset);
        let inset_x = self.cell_size.width * self.cell_inset;
        let inset_y = self.cell_size.height * self.cell_inset;
        Rect::new(
            origin.x + inset_x,
            origin.y + inset_y,
            origin.x + self.cell_size.width - inset_x,
            origin.y + self.cell_size.height - inset_y,
        )
    }
}
