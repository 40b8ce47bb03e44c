//! Logical-order iteration over a [`GapBuffer`].

use std::iter::FusedIterator;

use crate::GapBuffer;

/// Characters of a buffer in logical order, never touching gap cells.
///
/// Created by [`GapBuffer::chars`]. Cloning yields an independent cursor,
/// so a reader can restart from any point it saved.
#[derive(Debug, Clone)]
pub struct Chars<'a> {
    buffer: &'a GapBuffer,
    /// Next logical index to yield from the front
    front: usize,
    /// One past the next logical index to yield from the back
    back: usize,
}

impl<'a> Chars<'a> {
    /// Iterates logical indices `front..back`. Callers keep `back <= len`.
    pub(crate) fn new(buffer: &'a GapBuffer, front: usize, back: usize) -> Self {
        debug_assert!(front <= back && back <= buffer.len());
        Self {
            buffer,
            front,
            back,
        }
    }

    /// Logical index the next call to `next` would yield.
    pub fn offset(&self) -> usize {
        self.front
    }

    fn char_at(&self, logical: usize) -> Option<char> {
        let storage = self.buffer.layout().user_to_storage(logical).ok()?;
        self.buffer.storage().get(storage).copied()
    }
}

impl Iterator for Chars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        if self.front >= self.back {
            return None;
        }
        let ch = self.char_at(self.front)?;
        self.front += 1;
        Some(ch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for Chars<'_> {
    fn next_back(&mut self) -> Option<char> {
        if self.front >= self.back {
            return None;
        }
        let ch = self.char_at(self.back - 1)?;
        self.back -= 1;
        Some(ch)
    }
}

impl ExactSizeIterator for Chars<'_> {}

impl FusedIterator for Chars<'_> {}

#[cfg(test)]
mod tests {
    use crate::{BufferConfig, GapBuffer};

    fn with_gap_in_middle() -> GapBuffer {
        let mut buffer = GapBuffer::with_config(BufferConfig {
            growth_increment: 8,
        });
        buffer.insert_str("abef").unwrap();
        buffer.point_set(2).unwrap();
        buffer.insert_str("cd").unwrap();
        buffer
    }

    #[test]
    fn test_forward_skips_gap() {
        let buffer = with_gap_in_middle();
        let layout = buffer.layout();
        assert!(layout.gap_start() > 0 && layout.gap_end() < layout.capacity());
        assert_eq!(buffer.chars().collect::<String>(), "abcdef");
    }

    #[test]
    fn test_reverse() {
        let buffer = with_gap_in_middle();
        assert_eq!(buffer.chars().rev().collect::<String>(), "fedcba");
    }

    #[test]
    fn test_meet_in_the_middle() {
        let buffer = with_gap_in_middle();
        let mut chars = buffer.chars();
        assert_eq!(chars.next(), Some('a'));
        assert_eq!(chars.next_back(), Some('f'));
        assert_eq!(chars.len(), 4);
        assert_eq!(chars.offset(), 1);
        assert_eq!(chars.collect::<String>(), "bcde");
    }

    #[test]
    fn test_restartable() {
        let buffer = with_gap_in_middle();
        let mut chars = buffer.chars();
        chars.next();
        let saved = chars.clone();
        assert_eq!(chars.count(), 5);
        assert_eq!(saved.collect::<String>(), "bcdef");
    }

    #[test]
    fn test_empty_is_fused() {
        let buffer = GapBuffer::new();
        let mut chars = buffer.chars();
        assert_eq!(chars.next(), None);
        assert_eq!(chars.next(), None);
        assert_eq!(chars.next_back(), None);
    }
}
