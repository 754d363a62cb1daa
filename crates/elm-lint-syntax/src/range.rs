//! Source positions and ranges.
//!
//! Positions are 1-based in both row and column, and columns count
//! characters rather than bytes. Ordering is lexicographic on
//! `(row, column)`, which makes the derived `Ord` on [`Range`] exactly the
//! ordering diagnostics are sorted with.

use serde::{Deserialize, Serialize};

/// A point in a source file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Position {
    /// Line number (1-indexed).
    pub row: usize,
    /// Character column within the line (1-indexed).
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.row, self.column)
    }
}

/// A span of source text between two positions, `start <= end`.
///
/// Zero-length ranges are legal and denote insertion points.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Range {
    /// Start of the span (inclusive).
    pub start: Position,
    /// End of the span.
    pub end: Position,
}

impl Range {
    /// Creates a new range.
    #[must_use]
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// The zero range at `(0,0)`, used for synthetic diagnostics.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Returns true if the range spans no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Tests whether two ranges overlap.
    ///
    /// Ranges collide iff their open intervals share a position: ranges
    /// that merely touch (`a.end == b.start`) do not collide, and
    /// zero-length ranges never collide with anything.
    #[must_use]
    pub fn collides_with(&self, other: &Range) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.start < other.end && other.start < self.end
    }

    /// The smallest range containing both inputs.
    #[must_use]
    pub fn merge(&self, other: &Range) -> Range {
        Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}
