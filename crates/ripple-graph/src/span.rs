use serde::{Deserialize, Serialize};

/// Line/column source range of one arena node.
///
/// Lines are 1-based, columns 0-based (the convention the diff side of the
/// pipeline uses for hunk ranges).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl SourceSpan {
    pub fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Zero span, used for synthesized nodes.
    pub fn zero() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// True if every line of this span lies inside `[start, end]`.
    pub fn within_lines(&self, start: u32, end: u32) -> bool {
        self.start_line >= start && self.end_line <= end
    }

    /// True if this span touches any line in `[start, end]`.
    pub fn intersects_lines(&self, start: u32, end: u32) -> bool {
        self.start_line <= end && self.end_line >= start
    }
}

/// Byte-offset to line/column translation table, built once per source text.
#[derive(Debug)]
pub struct LineTable {
    /// Byte offset of the start of each line, ascending.
    line_starts: Vec<u32>,
}

impl LineTable {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }
        Self { line_starts }
    }

    /// 1-based line and 0-based column of a byte offset.
    pub fn position(&self, offset: u32) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let column = offset - self.line_starts[line];
        (line as u32 + 1, column)
    }

    /// Translate an `[start, end)` byte range into a line/column span.
    pub fn span(&self, start: u32, end: u32) -> SourceSpan {
        let (start_line, start_column) = self.position(start);
        let (end_line, end_column) = self.position(end);
        SourceSpan::new(start_line, start_column, end_line, end_column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_table_positions() {
        let table = LineTable::new("line 1\nline 2\nline 3");
        assert_eq!(table.position(0), (1, 0));
        assert_eq!(table.position(7), (2, 0));
        assert_eq!(table.position(14), (3, 0));
        assert_eq!(table.position(16), (3, 2));
    }

    #[test]
    fn span_within_and_intersects() {
        let span = SourceSpan::new(3, 0, 5, 10);
        assert!(span.within_lines(3, 5));
        assert!(span.within_lines(1, 9));
        assert!(!span.within_lines(4, 9));
        assert!(span.intersects_lines(5, 7));
        assert!(!span.intersects_lines(6, 7));
    }
}
