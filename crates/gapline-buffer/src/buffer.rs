//! Gap buffer with a point.
//!
//! ## Why a Gap Buffer?
//!
//! Edits in an editor cluster around the cursor. Keeping the unused
//! capacity (the gap) right at the cursor means:
//! - **Typing**: one write into the gap, O(1)
//! - **Backspace / delete**: widen the gap by one, O(1)
//! - **Jumping elsewhere**: slide the gap, O(distance moved)
//!
//! ## Learning: Offsets Instead of References
//!
//! ```rust,ignore
//! let start = buffer.gap_start;   // a plain usize
//! buffer.grow()?;                 // Vec may reallocate...
//! buffer.text[start];             // ...and the offset is still meaningful
//! ```
//!
//! Holding `&mut text[i]` across a reallocation would not compile, so every
//! storage position is an index that gets recomputed after growth.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::iter::Chars;
use crate::{BufferError, BufferResult, GapLayout, Position};

/// Default number of cells added whenever the gap runs out.
pub const DEFAULT_GROWTH_INCREMENT: usize = 64;

/// Largest accepted growth increment, in cells.
pub const MAX_GROWTH_INCREMENT: usize = 1 << 24;

/// Filler for gap cells. Never visible through the public API.
const GAP_FILL: char = '\0';

/// Configuration for buffer behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Cells added to storage each time the gap is exhausted.
    /// Also the initial capacity.
    pub growth_increment: usize,
}

impl BufferConfig {
    /// A zero increment could never make room for an insertion; anything
    /// past [`MAX_GROWTH_INCREMENT`] is an allocation the user did not mean.
    pub fn is_valid(&self) -> bool {
        (1..=MAX_GROWTH_INCREMENT).contains(&self.growth_increment)
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            growth_increment: DEFAULT_GROWTH_INCREMENT,
        }
    }
}

/// Snapshot of the buffer's offsets, for diagnostic rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferInternals {
    pub capacity: usize,
    /// Storage index the point translates to
    pub point_offset: usize,
    pub size: usize,
    pub gap_start_offset: usize,
    pub gap_end_offset: usize,
}

/// Document text stored as `[before gap | gap | after gap]`, plus the point.
///
/// # Failure Semantics
///
/// Every operation that would step outside the document returns an error
/// and leaves the buffer exactly as it was. Callers treat that as a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapBuffer {
    /// Backing storage, gap included
    text: Vec<char>,

    /// First gap cell
    gap_start: usize,

    /// One past the last gap cell
    gap_end: usize,

    /// Logical cursor position, `0..=len()`
    point: usize,

    config: BufferConfig,
}

impl GapBuffer {
    /// Creates an empty buffer whose gap spans the initial capacity.
    ///
    /// # Example
    /// ```
    /// use gapline_buffer::GapBuffer;
    ///
    /// let buffer = GapBuffer::new();
    /// assert!(buffer.is_empty());
    /// assert_eq!(buffer.capacity(), 64);
    /// ```
    pub fn new() -> Self {
        Self::with_config(BufferConfig::default())
    }

    /// Creates an empty buffer with custom configuration.
    ///
    /// An invalid config falls back to the default increment.
    pub fn with_config(config: BufferConfig) -> Self {
        let config = if config.is_valid() {
            config
        } else {
            tracing::warn!(
                growth_increment = config.growth_increment,
                "invalid growth increment, using default"
            );
            BufferConfig::default()
        };

        let (text, config) = match Self::allocate(config.growth_increment) {
            Ok(text) => (text, config),
            Err(err) => {
                tracing::warn!(%err, "initial allocation failed, using default increment");
                let config = BufferConfig::default();
                (vec![GAP_FILL; config.growth_increment], config)
            }
        };

        let capacity = text.len();
        Self {
            text,
            gap_start: 0,
            gap_end: capacity,
            point: 0,
            config,
        }
    }

    /// Storage of `capacity` gap cells, without aborting on allocation failure.
    fn allocate(capacity: usize) -> BufferResult<Vec<char>> {
        let mut text = Vec::new();
        text.try_reserve_exact(capacity)
            .map_err(|_| BufferError::CapacityExhausted {
                requested: capacity,
            })?;
        text.resize(capacity, GAP_FILL);
        Ok(text)
    }

    // ==================== Measurements ====================

    /// Number of characters in the document.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len() - (self.gap_end - self.gap_start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total storage length, gap included.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.text.len()
    }

    /// The logical cursor position.
    #[inline]
    pub fn point(&self) -> usize {
        self.point
    }

    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Current storage partition.
    #[inline]
    pub fn layout(&self) -> GapLayout {
        GapLayout::from_parts(self.gap_start, self.gap_end, self.text.len())
    }

    /// Offsets snapshot for diagnostics.
    pub fn internals(&self) -> BufferInternals {
        let layout = self.layout();
        BufferInternals {
            capacity: layout.capacity(),
            point_offset: layout
                .user_to_storage(self.point)
                .unwrap_or(layout.capacity()),
            size: layout.len(),
            gap_start_offset: layout.gap_start(),
            gap_end_offset: layout.gap_end(),
        }
    }

    // ==================== Text Access ====================

    /// Returns the character at a logical index.
    pub fn at(&self, idx: usize) -> BufferResult<char> {
        if idx >= self.len() {
            return Err(BufferError::OutOfRange {
                index: idx,
                len: self.len(),
            });
        }
        let storage = self.layout().user_to_storage(idx)?;
        Ok(self.text[storage])
    }

    /// Iterates the document in logical order, skipping the gap.
    pub fn chars(&self) -> Chars<'_> {
        Chars::new(self, 0, self.len())
    }

    /// Collects the whole document.
    pub fn text(&self) -> String {
        self.chars().collect()
    }

    /// Raw storage, gap cells included. Only the iterator reads it.
    pub(crate) fn storage(&self) -> &[char] {
        &self.text
    }

    // ==================== Mutations ====================

    /// Inserts one character at the point and advances the point past it.
    pub fn insert(&mut self, ch: char) -> BufferResult<()> {
        self.check_point()?;

        self.move_gap()?;
        self.text[self.gap_start] = ch;
        self.gap_start += 1;
        self.point += 1;
        Ok(())
    }

    /// Inserts each character of `s` in turn.
    ///
    /// Stops at the first failure; characters already inserted stay.
    pub fn insert_str(&mut self, s: &str) -> BufferResult<()> {
        for ch in s.chars() {
            self.insert(ch)?;
        }
        Ok(())
    }

    /// Deletes the character before the point (backspace).
    ///
    /// Returns the removed character.
    pub fn delete_previous(&mut self) -> BufferResult<char> {
        self.check_point()?;
        if self.point == 0 {
            return Err(BufferError::OutOfRange {
                index: self.point,
                len: self.len(),
            });
        }

        self.move_gap()?;
        self.gap_start -= 1;
        self.point -= 1;
        Ok(self.text[self.gap_start])
    }

    /// Deletes the character after the point. The point stays put.
    pub fn delete_next(&mut self) -> BufferResult<char> {
        self.check_point()?;
        if self.point == self.len() {
            return Err(BufferError::OutOfRange {
                index: self.point,
                len: self.len(),
            });
        }

        self.move_gap()?;
        let ch = self.text[self.gap_end];
        self.gap_end += 1;
        Ok(ch)
    }

    // ==================== Point Motion ====================

    /// Moves the point by `delta` characters. The gap is not touched.
    pub fn point_move(&mut self, delta: isize) -> BufferResult<()> {
        let target = self
            .point
            .checked_add_signed(delta)
            .filter(|&target| target <= self.len())
            .ok_or(BufferError::MoveOutOfRange {
                point: self.point,
                delta,
                len: self.len(),
            })?;

        self.point = target;
        Ok(())
    }

    /// Puts the point at a logical index in `0..=len()`.
    pub fn point_set(&mut self, idx: usize) -> BufferResult<()> {
        if idx > self.len() {
            return Err(BufferError::OutOfRange {
                index: idx,
                len: self.len(),
            });
        }
        self.point = idx;
        Ok(())
    }

    // ==================== Search ====================

    /// Finds the first `ch` at or after `from`.
    ///
    /// Returns the logical index of the match, `None` if the scan reaches
    /// the end of the document.
    pub fn search_forward(&self, ch: char, from: usize) -> BufferResult<Option<usize>> {
        self.check_index(from)?;
        Ok(Chars::new(self, from, self.len())
            .position(|c| c == ch)
            .map(|offset| from + offset))
    }

    /// Finds the nearest `ch` strictly before `from`.
    ///
    /// Returns the logical index of the match, `None` if the scan reaches
    /// the start of the document.
    pub fn search_backward(&self, ch: char, from: usize) -> BufferResult<Option<usize>> {
        self.check_index(from)?;
        Ok(Chars::new(self, 0, from).rposition(|c| c == ch))
    }

    // ==================== Lines ====================

    /// Logical index of the first character on the line containing `idx`.
    pub fn line_start(&self, idx: usize) -> BufferResult<usize> {
        Ok(self.search_backward('\n', idx)?.map_or(0, |nl| nl + 1))
    }

    /// Logical index of the newline ending the line containing `idx`,
    /// or `len()` on the last line.
    pub fn line_end(&self, idx: usize) -> BufferResult<usize> {
        Ok(self.search_forward('\n', idx)?.unwrap_or(self.len()))
    }

    /// Line/column of a logical index.
    pub fn position_of(&self, idx: usize) -> BufferResult<Position> {
        let start = self.line_start(idx)?;
        let line = Chars::new(self, 0, start).filter(|&c| c == '\n').count();
        Ok(Position::new(line, idx - start))
    }

    /// Line/column of the point.
    pub fn position(&self) -> Position {
        self.position_of(self.point).unwrap_or_default()
    }

    // ==================== Gap Management ====================

    /// Slides the gap so it starts exactly at the point.
    ///
    /// Grows storage first if the gap is exhausted. Cost is proportional
    /// to the distance moved, not to the document size.
    fn move_gap(&mut self) -> BufferResult<()> {
        if self.gap_start == self.gap_end {
            self.grow()?;
        }

        if self.point == self.gap_start {
            return Ok(());
        }

        let p = self.layout().user_to_storage(self.point)?;
        match p.cmp(&self.gap_start) {
            Ordering::Greater => {
                // Point is after the gap: pull [gap_end, p) down to gap_start.
                let n = p.checked_sub(self.gap_end).ok_or_else(|| {
                    BufferError::InvalidTransition(format!(
                        "point maps to storage {p}, inside gap [{}, {})",
                        self.gap_start, self.gap_end
                    ))
                })?;
                self.text.copy_within(self.gap_end..p, self.gap_start);
                self.gap_start += n;
                self.gap_end += n;
            }
            Ordering::Less => {
                // Point is before the gap: push [p, gap_start) up against gap_end.
                let n = self.gap_start - p;
                self.text.copy_within(p..self.gap_start, self.gap_end - n);
                self.gap_start -= n;
                self.gap_end -= n;
            }
            Ordering::Equal => {}
        }

        tracing::trace!(
            gap_start = self.gap_start,
            gap_end = self.gap_end,
            point = self.point,
            "moved gap"
        );
        Ok(())
    }

    /// Appends one growth increment of gap at the end of storage.
    ///
    /// Only called with an empty gap, so the text is already contiguous
    /// and the new cells can simply become the gap.
    fn grow(&mut self) -> BufferResult<()> {
        let increment = self.config.growth_increment;
        self.text
            .try_reserve_exact(increment)
            .map_err(|_| BufferError::CapacityExhausted {
                requested: increment,
            })?;

        let old_capacity = self.text.len();
        self.text.resize(old_capacity + increment, GAP_FILL);
        self.gap_start = old_capacity;
        self.gap_end = self.text.len();

        tracing::debug!(capacity = self.text.len(), "grew gap buffer storage");
        Ok(())
    }

    fn check_point(&self) -> BufferResult<()> {
        self.check_index(self.point)
    }

    /// Accepts logical positions in `0..=len()`.
    fn check_index(&self, idx: usize) -> BufferResult<()> {
        if idx > self.len() {
            return Err(BufferError::OutOfRange {
                index: idx,
                len: self.len(),
            });
        }
        Ok(())
    }
}

impl Default for GapBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for GapBuffer {
    /// Lays the text out before the gap, with the point at the end.
    fn from(s: &str) -> Self {
        let increment = DEFAULT_GROWTH_INCREMENT;
        let mut text: Vec<char> = s.chars().collect();
        let len = text.len();
        let capacity = (len / increment + 1) * increment;
        text.resize(capacity, GAP_FILL);

        Self {
            text,
            gap_start: len,
            gap_end: capacity,
            point: len,
            config: BufferConfig::default(),
        }
    }
}

impl From<String> for GapBuffer {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl fmt::Display for GapBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.chars().try_for_each(|c| write!(f, "{c}"))
    }
}

impl<'a> IntoIterator for &'a GapBuffer {
    type Item = char;
    type IntoIter = Chars<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.chars()
    }
}
