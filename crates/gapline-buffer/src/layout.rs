//! Logical ↔ storage index translation.
//!
//! ## Learning: Pure Functions Over `Copy` Values
//!
//! `GapLayout` is three integers. Every translation is a method on a copy
//! of those integers, so the three-region rule can be tested on its own
//! without building a buffer, and nothing here can mutate storage.

use serde::{Deserialize, Serialize};

use crate::{BufferError, BufferResult};

/// Which of the three storage regions a storage index falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// `[0, gap_start)`: text before the gap
    BeforeGap,
    /// `[gap_start, gap_end)`: unused capacity
    Gap,
    /// `[gap_end, capacity)`: text after the gap
    AfterGap,
}

/// The partition of storage into before-gap text, gap, and after-gap text.
///
/// Invariant: `gap_start <= gap_end <= capacity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GapLayout {
    gap_start: usize,
    gap_end: usize,
    capacity: usize,
}

impl GapLayout {
    /// Creates a layout, rejecting boundaries that overlap or overrun storage.
    pub fn new(gap_start: usize, gap_end: usize, capacity: usize) -> BufferResult<Self> {
        if gap_start > gap_end || gap_end > capacity {
            return Err(BufferError::InvalidTransition(format!(
                "gap [{gap_start}, {gap_end}) does not fit in capacity {capacity}"
            )));
        }
        Ok(Self {
            gap_start,
            gap_end,
            capacity,
        })
    }

    /// Builds a layout from offsets the buffer already keeps consistent.
    pub(crate) fn from_parts(gap_start: usize, gap_end: usize, capacity: usize) -> Self {
        debug_assert!(gap_start <= gap_end && gap_end <= capacity);
        Self {
            gap_start,
            gap_end,
            capacity,
        }
    }

    /// Storage index of the first gap cell.
    #[inline]
    pub fn gap_start(&self) -> usize {
        self.gap_start
    }

    /// Storage index one past the last gap cell.
    #[inline]
    pub fn gap_end(&self) -> usize {
        self.gap_end
    }

    /// Total storage length, gap included.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// Logical length of the document.
    #[inline]
    pub fn len(&self) -> usize {
        self.capacity - self.gap_len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Classifies a storage index.
    ///
    /// Returns `OutOfRange` for indices at or past `capacity`.
    pub fn region(&self, storage_idx: usize) -> BufferResult<Region> {
        if storage_idx >= self.capacity {
            return Err(BufferError::OutOfRange {
                index: storage_idx,
                len: self.capacity,
            });
        }

        Ok(if storage_idx < self.gap_start {
            Region::BeforeGap
        } else if storage_idx < self.gap_end {
            Region::Gap
        } else {
            Region::AfterGap
        })
    }

    /// Maps a logical index in `[0, len]` to its storage index.
    ///
    /// Logical indices at or past `gap_start` skip over the gap. The end
    /// position `len` maps to one past the last text cell.
    pub fn user_to_storage(&self, logical: usize) -> BufferResult<usize> {
        if logical > self.len() {
            return Err(BufferError::OutOfRange {
                index: logical,
                len: self.len(),
            });
        }

        if logical >= self.gap_start {
            Ok(logical + self.gap_len())
        } else {
            Ok(logical)
        }
    }

    /// Maps a storage index back to its logical index.
    ///
    /// Gap cells have no logical position; asking for one is an
    /// `InvalidTransition`. `capacity` itself maps to `len`.
    pub fn storage_to_user(&self, storage_idx: usize) -> BufferResult<usize> {
        if storage_idx > self.capacity {
            return Err(BufferError::OutOfRange {
                index: storage_idx,
                len: self.capacity,
            });
        }

        if storage_idx >= self.gap_end {
            Ok(storage_idx - self.gap_len())
        } else if storage_idx < self.gap_start {
            Ok(storage_idx)
        } else {
            Err(BufferError::InvalidTransition(format!(
                "storage index {storage_idx} lies inside the gap [{}, {})",
                self.gap_start, self.gap_end
            )))
        }
    }
}
