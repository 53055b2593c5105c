//! Byte offsets to line/character [`Point`]s.

use sql_executor_engine::Point;

/// Start offset of every line in a text.
///
/// Only `\n` ends a line, the same rule the editor document uses, so a
/// `\r` before it counts as the last character of its line.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, starts }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// The point at a byte offset. Offsets past the end clamp to the end and
    /// offsets inside a character resolve to the character's start.
    pub fn point(&self, offset: usize) -> Point {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }

        let line = self.starts.partition_point(|&start| start <= offset) - 1;
        let start = self.starts[line];
        Point::new(line + 1, self.text[start..offset].chars().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const TEXT: &str = "SELECT 1;\r\nPRINT N'ü';\n\nGO";

    #[test]
    fn counts_lines() {
        assert_eq!(LineIndex::new("").line_count(), 1);
        assert_eq!(LineIndex::new("a\n").line_count(), 2);
        assert_eq!(LineIndex::new(TEXT).line_count(), 4);
    }

    #[rstest]
    #[case::start(0, Point::new(1, 0))]
    #[case::end_of_first_statement(9, Point::new(1, 9))]
    #[case::carriage_return(10, Point::new(1, 10))]
    #[case::second_line(11, Point::new(2, 0))]
    #[case::after_multibyte(22, Point::new(2, 10))]
    #[case::inside_multibyte(20, Point::new(2, 8))]
    #[case::empty_line(24, Point::new(3, 0))]
    #[case::last_line(25, Point::new(4, 0))]
    #[case::end(27, Point::new(4, 2))]
    #[case::past_end(100, Point::new(4, 2))]
    fn point_cases(#[case] offset: usize, #[case] expected: Point) {
        assert_eq!(LineIndex::new(TEXT).point(offset), expected);
    }
}
