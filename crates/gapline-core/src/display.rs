//! Read-only rendering of a buffer.
//!
//! `Display` never mutates the buffer. It reads the logical text through
//! the iterator, and, when diagnostics are on, walks the raw storage
//! layout to show where the gap and the point sit:
//!
//! ```text
//! he###llo
//!   P
//! Gap start = 2 Gap end = 5 Point = 2 Count = 5
//! ```

use std::fmt;

use gapline_buffer::{BufferResult, GapBuffer, Position, Region};

use crate::config::Config;

/// Drawn for storage cells inside the gap.
const GAP_CELL: char = '#';

/// Drawn for control characters in the storage row.
const UNPRINTABLE_CELL: char = '~';

const POINT_MARKER: char = 'P';

/// Diagnostic view of the storage layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalsView {
    /// One cell per storage slot, gap included
    pub storage: String,

    /// `P` under the point's storage index
    pub markers: String,

    pub summary: String,
}

/// One rendered screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Document text split at `'\n'`
    pub lines: Vec<String>,

    pub cursor: Position,

    pub status: String,

    pub internals: Option<InternalsView>,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        if let Some(internals) = &self.internals {
            writeln!(f, "{}", internals.storage)?;
            writeln!(f, "{}", internals.markers)?;
            writeln!(f, "{}", internals.summary)?;
        }
        write!(f, "{}", self.status)
    }
}

/// Renders buffers into frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct Display {
    show_internals: bool,
}

impl Display {
    pub fn new(show_internals: bool) -> Self {
        Self { show_internals }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.display.show_internals)
    }

    pub fn render(&self, buffer: &GapBuffer) -> BufferResult<Frame> {
        let text = buffer.text();
        let lines = text.split('\n').map(String::from).collect();
        let cursor = buffer.position();
        let status = format!(
            "-- gapline --  {cursor}  ({} chars)",
            buffer.len()
        );

        let internals = if self.show_internals {
            Some(Self::render_internals(buffer)?)
        } else {
            None
        };

        Ok(Frame {
            lines,
            cursor,
            status,
            internals,
        })
    }

    fn render_internals(buffer: &GapBuffer) -> BufferResult<InternalsView> {
        let layout = buffer.layout();
        let storage = (0..layout.capacity())
            .map(|idx| match layout.region(idx)? {
                Region::Gap => Ok(GAP_CELL),
                Region::BeforeGap | Region::AfterGap => {
                    let ch = buffer.at(layout.storage_to_user(idx)?)?;
                    Ok(if ch.is_control() { UNPRINTABLE_CELL } else { ch })
                }
            })
            .collect::<BufferResult<String>>()?;

        let internals = buffer.internals();
        let mut markers = " ".repeat(internals.point_offset);
        markers.push(POINT_MARKER);

        let summary = format!(
            "Gap start = {} Gap end = {} Point = {} Count = {}",
            internals.gap_start_offset,
            internals.gap_end_offset,
            internals.point_offset,
            internals.size
        );

        Ok(InternalsView {
            storage,
            markers,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gapline_buffer::BufferConfig;

    #[test]
    fn test_render_lines_and_cursor() {
        let mut buffer = GapBuffer::from("ab\ncd");
        buffer.point_set(4).unwrap();

        let frame = Display::default().render(&buffer).unwrap();
        assert_eq!(frame.lines, vec!["ab", "cd"]);
        assert_eq!(frame.cursor, Position::new(1, 1));
        assert_eq!(frame.status, "-- gapline --  2:2  (5 chars)");
        assert!(frame.internals.is_none());
    }

    #[test]
    fn test_render_empty_buffer() {
        let frame = Display::default().render(&GapBuffer::new()).unwrap();
        assert_eq!(frame.lines, vec![""]);
        assert_eq!(frame.cursor, Position::ZERO);
    }

    #[test]
    fn test_render_internals() {
        let mut buffer = GapBuffer::with_config(BufferConfig {
            growth_increment: 8,
        });
        buffer.insert_str("hello").unwrap();
        buffer.point_move(-3).unwrap();
        buffer.insert('X').unwrap();

        let frame = Display::new(true).render(&buffer).unwrap();
        let internals = frame.internals.unwrap();
        assert_eq!(internals.storage, "heX##llo");
        assert_eq!(internals.markers, "     P");
        assert_eq!(
            internals.summary,
            "Gap start = 3 Gap end = 5 Point = 5 Count = 6"
        );
    }

    #[test]
    fn test_render_internals_marks_control_chars() {
        let mut buffer = GapBuffer::with_config(BufferConfig {
            growth_increment: 4,
        });
        buffer.insert_str("a\nb").unwrap();

        let internals = Display::new(true).render(&buffer).unwrap().internals.unwrap();
        assert_eq!(internals.storage, "a~b#");
        // Point at the end maps past the gap, one past the last storage cell
        assert_eq!(internals.markers, "    P");
    }

    #[test]
    fn test_frame_display() {
        let buffer = GapBuffer::from("one\ntwo");
        let frame = Display::default().render(&buffer).unwrap();
        assert_eq!(frame.to_string(), "one\ntwo\n-- gapline --  2:4  (7 chars)");
    }
}
