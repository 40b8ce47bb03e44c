//! # Gapline Buffer
//!
//! Text storage for an interactive editor, backed by a gap buffer.
//!
//! ## Storage Layout
//!
//! ```text
//!  0          gap_start        gap_end          capacity
//!  ├──────────────┼───────────────┼────────────────┤
//!  │  before gap  │   (unused)    │   after gap    │
//!  └──────────────┴───────────────┴────────────────┘
//! ```
//!
//! The document text is the before-gap region followed by the after-gap
//! region. The gap follows the point around, so typing and deleting next to
//! the cursor never shifts the rest of the document.
//!
//! ## Ownership
//! - `GapBuffer` owns its storage; positions are plain `usize` offsets,
//!   never references, so growing the storage cannot leave anything dangling
//! - Readers borrow the buffer (`chars()`, `at()`), mutations need `&mut self`

mod buffer;
mod iter;
mod layout;
mod position;

pub use buffer::{
    BufferConfig, BufferInternals, DEFAULT_GROWTH_INCREMENT, GapBuffer, MAX_GROWTH_INCREMENT,
};
pub use iter::Chars;
pub use layout::{GapLayout, Region};
pub use position::Position;

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("Index {index} is out of range for a buffer of length {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("Cannot move point {point} by {delta} in a buffer of length {len}")]
    MoveOutOfRange { point: usize, delta: isize, len: usize },

    #[error("Invalid gap transition: {0}")]
    InvalidTransition(String),

    #[error("Could not grow storage by {requested} characters")]
    CapacityExhausted { requested: usize },
}

impl BufferError {
    /// Returns true for boundary failures a caller is expected to hit
    /// (cursor at an edge, index past the end).
    ///
    /// `InvalidTransition` is a defect inside the buffer itself;
    /// `CapacityExhausted` means the allocator said no.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            BufferError::OutOfRange { .. } | BufferError::MoveOutOfRange { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_creation() {
        let buffer = GapBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.point(), 0);
    }

    #[test]
    fn test_buffer_from_string() {
        let buffer = GapBuffer::from("Hello, World!");
        assert_eq!(buffer.len(), 13);
        assert_eq!(buffer.text(), "Hello, World!");
        assert_eq!(buffer.point(), 13);
    }

    #[test]
    fn test_insert_and_delete() {
        let mut buffer = GapBuffer::new();
        buffer.insert_str("Hello").unwrap();
        assert_eq!(buffer.text(), "Hello");

        buffer.insert_str(", World!").unwrap();
        assert_eq!(buffer.text(), "Hello, World!");

        buffer.point_set(5).unwrap();
        buffer.delete_next().unwrap();
        buffer.delete_next().unwrap();
        assert_eq!(buffer.text(), "HelloWorld!");
    }

    #[test]
    fn test_error_classification() {
        let range = BufferError::OutOfRange { index: 4, len: 3 };
        assert!(range.is_usage_error());
        let motion = BufferError::MoveOutOfRange {
            point: 0,
            delta: -1,
            len: 0,
        };
        assert!(motion.is_usage_error());
        assert!(!BufferError::InvalidTransition("gap".into()).is_usage_error());
        assert!(!BufferError::CapacityExhausted { requested: 64 }.is_usage_error());
    }

    #[test]
    fn test_error_messages() {
        let err = BufferError::OutOfRange { index: 7, len: 5 };
        assert_eq!(
            err.to_string(),
            "Index 7 is out of range for a buffer of length 5"
        );
    }
}
