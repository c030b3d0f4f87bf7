// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Float-to-index helpers shared by windowing and picking.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Floors the value and converts it to a cell index.
///
/// The `as` conversion saturates, so non-finite or huge offsets collapse to
/// the ends of the `i64` range instead of wrapping.
pub(crate) fn floor_index(value: f64) -> i64 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Cell indices are derived from finite scroll offsets; `as` saturates otherwise"
    )]
    {
        value.floor() as i64
    }
}

/// Ceils the value and converts it to a cell index.
pub(crate) fn ceil_index(value: f64) -> i64 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Cell indices are derived from finite scroll offsets; `as` saturates otherwise"
    )]
    {
        value.ceil() as i64
    }
}

/// Converts a cell index back into viewport units.
pub(crate) fn index_to_units(index: i64, cell_extent: f64) -> f64 {
    index as f64 * cell_extent
}
