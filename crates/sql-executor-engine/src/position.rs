//! Text coordinates shared by the locator, the session and the host.
//!
//! Lines are 1-based and offsets are 0-based character offsets within the
//! line, matching what editors report for a caret. A [`Range`] produced from
//! a statement ends just past the final character of its last token.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A caret or token boundary. Ordered by `(line, offset)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub line: usize,
    pub offset: usize,
}

impl Point {
    pub const fn new(line: usize, offset: usize) -> Self {
        Self { line, offset }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.offset)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("range start {start} is after its end {end}")]
pub struct RangeError {
    pub start: Point,
    pub end: Point,
}

/// A contiguous span of text with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RangeParts")]
pub struct Range {
    pub start: Point,
    pub end: Point,
}

/// Unchecked wire form of a [`Range`].
#[derive(Deserialize)]
struct RangeParts {
    start: Point,
    end: Point,
}

impl TryFrom<RangeParts> for Range {
    type Error = RangeError;

    fn try_from(parts: RangeParts) -> Result<Self, Self::Error> {
        Self::try_new(parts.start, parts.end)
    }
}

impl Range {
    pub fn new(start: Point, end: Point) -> Self {
        debug_assert!(start <= end, "range start {start} is after its end {end}");
        Self { start, end }
    }

    pub fn try_new(start: Point, end: Point) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError { start, end });
        }
        Ok(Self { start, end })
    }

    /// Whether a caret at `point` is inside this span.
    ///
    /// Both boundaries count as inside: a caret right before the first
    /// character or right after the last one still belongs to the span.
    pub fn contains(&self, point: Point) -> bool {
        if point.line < self.start.line || point.line > self.end.line {
            return false;
        }
        let before_first = point.line == self.start.line && point.offset < self.start.offset;
        let after_last = point.line == self.end.line && point.offset > self.end.offset;
        !(before_first || after_last)
    }

    pub fn contains_range(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two spans share at least one character.
    ///
    /// Spans that only touch (one ends where the other starts) do not overlap.
    pub fn overlaps(&self, other: &Range) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// The host selection captured before a locate-and-execute cycle.
///
/// `anchor` is where the selection started and `active` is where the caret
/// sits; `active` may come before `anchor` for a backwards selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    pub anchor: Point,
    pub active: Point,
}

impl SelectionSnapshot {
    pub const fn new(anchor: Point, active: Point) -> Self {
        Self { anchor, active }
    }

    /// A collapsed selection: just a caret.
    pub const fn caret(point: Point) -> Self {
        Self {
            anchor: point,
            active: point,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    /// The selected text span regardless of selection direction.
    pub fn range(&self) -> Range {
        Range::new(self.anchor.min(self.active), self.anchor.max(self.active))
    }
}
