// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::num::NonZeroUsize;

use crate::config::ConfigError;

/// Non-empty, immutable list of content identifiers.
///
/// The grid only ever needs the palette's length; the entries themselves are
/// whatever the host uses to find content (image paths, texture ids, captions
/// with links). Entries are addressed by the `content_index` of a cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette<T> {
    items: Vec<T>,
}

impl<T> Palette<T> {
    /// Wraps `items`, refusing an empty list.
    pub fn new(items: impl IntoIterator<Item = T>) -> Result<Self, ConfigError> {
        let items: Vec<T> = items.into_iter().collect();
        if items.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(Self { items })
    }

    /// Number of entries.
    #[allow(clippy::len_without_is_empty, reason = "a palette is never empty")]
    #[must_use]
    pub fn len(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.items.len()).unwrap_or(NonZeroUsize::MIN)
    }

    /// Returns the entry for `content_index`, if in range.
    #[must_use]
    pub fn get(&self, content_index: usize) -> Option<&T> {
        self.items.get(content_index)
    }

    /// Returns all entries in palette order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterates entries in palette order.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }
}
