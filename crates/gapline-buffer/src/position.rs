//! Line/column coordinates of a logical index.

use serde::{Deserialize, Serialize};

/// Where a logical index falls when the text is split at `'\n'`.
///
/// Both fields are 0-indexed and counted in characters. Field order makes
/// the derived ordering line-major.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const ZERO: Position = Position { line: 0, column: 0 };

    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The position just past `ch` when it sits at `self`.
    pub fn advance(self, ch: char) -> Self {
        if ch == '\n' {
            Self::new(self.line + 1, 0)
        } else {
            Self::new(self.line, self.column + 1)
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 1-indexed, like a status line
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_major_ordering() {
        assert!(Position::new(0, 9) < Position::new(1, 0));
        assert!(Position::new(1, 2) < Position::new(1, 3));
        assert_eq!(Position::default(), Position::ZERO);
    }

    #[test]
    fn test_advance() {
        let end = "ab\nc".chars().fold(Position::ZERO, Position::advance);
        assert_eq!(end, Position::new(1, 1));
    }

    #[test]
    fn test_display_is_one_indexed() {
        assert_eq!(Position::ZERO.to_string(), "1:1");
        assert_eq!(Position::new(3, 0).to_string(), "4:1");
    }
}
