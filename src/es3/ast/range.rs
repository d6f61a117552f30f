//! Position and location tracking for source code locations
//!
//! ## Types
//!
//! - [`Span`] - A byte range into the source, carried by every AST node
//! - [`Position`] - A line:column position in source code
//! - [`SourceLocation`] - Utility for converting byte offsets to positions
//!
//! AST nodes only store byte spans. Line:column positions are derived on demand, for error
//! reporting, by building a [`SourceLocation`] over the same source text.

use serde::Serialize;
use std::fmt;
use std::ops::Range as ByteRange;

/// Byte range of a node in the source text. Metadata only: two trees that differ only in spans
/// describe the same program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn range(&self) -> ByteRange<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<ByteRange<usize>> for Span {
    fn from(range: ByteRange<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<&ByteRange<usize>> for Span {
    fn from(range: &ByteRange<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Represents a position in source code (line and column, both zero based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Provides fast conversion from byte offsets to line/column positions
pub struct SourceLocation {
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
    len: usize,
}

impl SourceLocation {
    /// Create a new SourceLocation from source code.
    ///
    /// `\n`, `\r\n`, a lone `\r`, U+2028 and U+2029 all end a line.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        let mut chars = source.char_indices().peekable();

        while let Some((byte_pos, ch)) = chars.next() {
            match ch {
                '\r' => {
                    if let Some((next_pos, '\n')) = chars.peek().copied() {
                        chars.next();
                        line_starts.push(next_pos + 1);
                    } else {
                        line_starts.push(byte_pos + 1);
                    }
                }
                '\n' | '\u{2028}' | '\u{2029}' => line_starts.push(byte_pos + ch.len_utf8()),
                _ => {}
            }
        }

        Self {
            line_starts,
            len: source.len(),
        }
    }

    /// Convert a byte offset to a line/column position. Offsets past the end clamp to the end.
    pub fn byte_to_position(&self, byte_offset: usize) -> Position {
        let byte_offset = byte_offset.min(self.len);
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1);

        let column = byte_offset - self.line_starts[line];

        Position::new(line, column)
    }

    /// Start and end positions of a span
    pub fn span_to_positions(&self, span: Span) -> (Position, Position) {
        (
            self.byte_to_position(span.start),
            self.byte_to_position(span.end),
        )
    }

    /// Get the total number of lines in the source
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the byte offset for the start of a line
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }
}
