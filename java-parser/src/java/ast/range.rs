//! Position and offset conversion
//!
//! This module is the single boundary between wire positions and byte offsets.
//!
//! ## Types
//!
//! - [`Position`] - A zero-based line/character pair, character counted in UTF-16 code units
//! - [`Span`] - A byte range into the source text
//! - [`SourceIndex`] - Line-start table for repeated conversions over one text
//!
//! ## Conversion rules
//!
//! - Offset from position: skip `line` newlines (or stop at end of text when there are fewer),
//!   then walk `character` UTF-16 code units forward. The walk does not stop at the end of the
//!   line and is clamped to the end of the text. A character that lands inside a surrogate pair
//!   rounds up past it, so the resulting offset is always a `char` boundary.
//! - Position from offset: the line is the number of newlines before the offset, the character is
//!   the UTF-16 length of the text between the start of that line and the offset.
//!
//! For any char-boundary offset `o <= text.len()`,
//! `offset_of(text, offset_to_position(text, o)) == o`.

use std::fmt;
use std::ops::Range as ByteRange;

/// Byte range into the parsed text.
pub type Span = ByteRange<usize>;

/// Represents a position in source code (line and UTF-16 character)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

/// Provides fast conversion between byte offsets and positions for one text
pub struct SourceIndex<'a> {
    text: &'a str,
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl<'a> SourceIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();
        Self { text, line_starts }
    }

    /// Convert a byte offset to a line/character position
    pub fn position(&self, offset: usize) -> Position {
        let offset = floor_char_boundary(self.text, offset);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let character = self.text[line_start..offset].encode_utf16().count();
        Position::new(line, character)
    }

    /// Convert a line/character position to a byte offset
    pub fn offset(&self, position: Position) -> usize {
        let line_start = self
            .line_starts
            .get(position.line)
            .copied()
            .unwrap_or(self.text.len());
        advance_utf16(self.text, line_start, position.character)
    }

    /// Convert a span to its start and end positions
    pub fn range(&self, span: &Span) -> (Position, Position) {
        (self.position(span.start), self.position(span.end))
    }
}

/// Byte offset of a wire position within `text`.
pub fn offset_of(text: &str, position: Position) -> usize {
    SourceIndex::new(text).offset(position)
}

/// Wire position of a byte offset within `text`.
pub fn offset_to_position(text: &str, offset: usize) -> Position {
    SourceIndex::new(text).position(offset)
}

fn advance_utf16(text: &str, from: usize, units: usize) -> usize {
    let mut remaining = units;
    let mut offset = from;
    for ch in text[from..].chars() {
        if remaining == 0 {
            break;
        }
        remaining = remaining.saturating_sub(ch.len_utf16());
        offset += ch.len_utf8();
    }
    offset
}

fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
