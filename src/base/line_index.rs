//! Byte offset to line/column conversion
//!
//! Syntax tree nodes carry byte ranges; editors want row/column points.
//! A [`LineIndex`] is built once per document and answers both directions.

use text_size::TextSize;

/// A zero-indexed line/column position. Columns count bytes, matching the
/// tree's byte-oriented ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Maps byte offsets to line/column pairs and back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Offset one past each `\n` in the text; implicit leading 0 for line 0
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> LineIndex {
        let mut line_starts = vec![TextSize::new(0)];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::new(i as u32 + 1));
            }
        }
        LineIndex {
            line_starts,
            len: TextSize::of(text),
        }
    }

    /// Line/column of a byte offset. Offsets past the end clamp to the
    /// end of the text.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts[line];
        LineCol {
            line: line as u32,
            col: u32::from(offset) - u32::from(line_start),
        }
    }

    /// Byte offset of a line/column pair, if the line exists
    pub fn offset(&self, line_col: LineCol) -> Option<TextSize> {
        let start = *self.line_starts.get(line_col.line as usize)?;
        let offset = TextSize::new(u32::from(start) + line_col.col);
        (offset <= self.len).then_some(offset)
    }

    /// Number of lines in the text
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_roundtrip() {
        let index = LineIndex::new("debug=3\nlog_stderror=yes\n");
        let pos = index.line_col(TextSize::new(8));
        assert_eq!(pos, LineCol { line: 1, col: 0 });
        assert_eq!(index.offset(pos), Some(TextSize::new(8)));
    }

    #[test]
    fn test_mid_line() {
        let index = LineIndex::new("abc\ndef\n");
        assert_eq!(index.line_col(TextSize::new(5)), LineCol { line: 1, col: 1 });
    }

    #[test]
    fn test_clamps_past_end() {
        let index = LineIndex::new("abc");
        assert_eq!(index.line_col(TextSize::new(99)), LineCol { line: 0, col: 3 });
    }

    #[test]
    fn test_empty_text() {
        let index = LineIndex::new("");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_col(TextSize::new(0)), LineCol { line: 0, col: 0 });
    }

    #[test]
    fn test_offset_rejects_missing_line() {
        let index = LineIndex::new("abc\n");
        assert_eq!(index.offset(LineCol { line: 5, col: 0 }), None);
    }
}
