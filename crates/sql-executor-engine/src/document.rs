use std::borrow::Cow;

use xi_rope::{LinesMetric, Rope};

use crate::position::{Point, Range, SelectionSnapshot};
use crate::session::{EditorHost, HostError};

/// An editor buffer held in memory.
///
/// The text lives in a single `xi_rope::Rope` and is never normalised, so
/// `to_bytes()` returns exactly what was loaded. The selection is stored as
/// byte offsets into the rope and converted to [`Point`]s on the way out.
///
/// ```rust
/// # use sql_executor_engine::document::Document;
/// # use sql_executor_engine::position::Point;
/// let doc = Document::from_text("SELECT 1;\nSELECT 2;\n");
/// assert_eq!(doc.line_count(), 3);
/// assert_eq!(doc.point_to_offset(Point::new(2, 7)), 17);
/// ```
#[derive(Clone)]
pub struct Document {
    buffer: Rope,
    anchor: usize,
    active: usize,
}

impl Document {
    /// Create a document from raw file bytes, which must be UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_text(text))
    }

    /// Create a document with the caret at the very start.
    pub fn from_text(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            anchor: 0,
            active: 0,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_string().into_bytes()
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of lines. A trailing newline starts one more (empty) line.
    pub fn line_count(&self) -> usize {
        self.buffer.measure::<LinesMetric>() + 1
    }

    /// Text of a 1-based line without its line terminator.
    pub fn line(&self, line: usize) -> Option<Cow<'_, str>> {
        if line == 0 || line > self.line_count() {
            return None;
        }
        let (start, end) = self.line_bounds(line - 1);
        Some(self.buffer.slice_to_cow(start..end))
    }

    /// Byte offset of `point`.
    ///
    /// Lines past the end clamp to the end of the document and offsets past
    /// the end of a line clamp to the end of that line. Line 0 is treated as
    /// line 1.
    pub fn point_to_offset(&self, point: Point) -> usize {
        let last_line = self.line_count() - 1;
        let line_index = point.line.saturating_sub(1);
        if line_index > last_line {
            return self.len();
        }

        let (start, end) = self.line_bounds(line_index);
        let text = self.buffer.slice_to_cow(start..end);
        let within = text
            .char_indices()
            .nth(point.offset)
            .map_or(text.len(), |(byte, _)| byte);
        start + within
    }

    /// Line and character offset of a byte offset, clamped to the document.
    ///
    /// A byte offset inside a multi-byte character or a `\r\n` pair resolves
    /// to the position before it.
    pub fn offset_to_point(&self, offset: usize) -> Point {
        let offset = offset.min(self.len());
        let offset = self
            .buffer
            .at_or_prev_codepoint_boundary(offset)
            .unwrap_or(0);
        let line_index = self.buffer.line_of_offset(offset);
        let (start, end) = self.line_bounds(line_index);
        let text = self.buffer.slice_to_cow(start..end);

        let within = offset.min(end) - start;
        Point::new(line_index + 1, text[..within].chars().count())
    }

    /// Text covered by `range`, after clamping both ends.
    pub fn slice(&self, range: Range) -> Cow<'_, str> {
        let start = self.point_to_offset(range.start);
        let end = self.point_to_offset(range.end).max(start);
        self.buffer.slice_to_cow(start..end)
    }

    /// Put a collapsed caret at `point`.
    pub fn set_caret(&mut self, point: Point) {
        let offset = self.point_to_offset(point);
        self.anchor = offset;
        self.active = offset;
    }

    /// Start and end byte offsets of a 0-based line, excluding `\n` or `\r\n`.
    fn line_bounds(&self, line_index: usize) -> (usize, usize) {
        let start = self.buffer.offset_of_line(line_index);
        let next = if line_index + 1 < self.line_count() {
            self.buffer.offset_of_line(line_index + 1)
        } else {
            self.len()
        };

        let content = self.buffer.slice_to_cow(start..next);
        let trimmed = content
            .strip_suffix('\n')
            .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
            .unwrap_or(&content[..]);
        (start, start + trimmed.len())
    }
}

impl EditorHost for Document {
    fn text(&self) -> Cow<'_, str> {
        self.buffer.slice_to_cow(0..self.len())
    }

    fn selection(&self) -> SelectionSnapshot {
        SelectionSnapshot::new(
            self.offset_to_point(self.anchor),
            self.offset_to_point(self.active),
        )
    }

    fn select(&mut self, anchor: Point, active: Point) -> Result<(), HostError> {
        if anchor.line == 0 || active.line == 0 {
            return Err(HostError::Selection {
                anchor,
                active,
                reason: "lines are numbered from 1".to_string(),
            });
        }
        self.anchor = self.point_to_offset(anchor);
        self.active = self.point_to_offset(active);
        log::trace!("selection moved to {anchor}..{active}");
        Ok(())
    }

    fn selected_text(&self) -> String {
        let start = self.anchor.min(self.active);
        let end = self.anchor.max(self.active);
        self.buffer.slice_to_cow(start..end).into_owned()
    }
}
