//! Source Position Model (spec §3, §4.2).
//!
//! A [`Location`] pins a point in a source file: an interned filename, a
//! 1-indexed line/column pair, and a 0-indexed byte offset. A [`Span`] pairs
//! a start and end `Location` and is what every token and AST node actually
//! carries.
//!
//! Column counting follows spec §4.2's advance rule precisely: `\n` bumps
//! the line and resets the column; `\r` is consumed but never advances
//! anything (it never reaches a token); every other scalar value advances
//! the column by exactly one, even when it's a multi-code-unit scalar
//! (astral-plane emoji, combining marks) — that's what makes the lexer's
//! decode-to-scalars step necessary rather than iterating UTF-8 bytes.

use crate::intern::StringId;

/// A single point in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Location {
    pub file: StringId,
    /// 1-indexed.
    pub line: u32,
    /// 1-indexed, counted in Unicode scalar values (spec §4.2).
    pub column: u32,
    /// 0-indexed, counted in UTF-8 code units (bytes).
    pub offset: u32,
}

impl Location {
    #[must_use]
    pub fn start_of_file(file: StringId) -> Self {
        Self {
            file,
            line: 1,
            column: 1,
            offset: 0,
        }
    }
}

/// A start/end pair of [`Location`]s. Every token and AST node carries one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    #[must_use]
    pub fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    /// A zero-width span at a single location, used for synthetic nodes
    /// introduced by the desugarer that have no literal source text of
    /// their own.
    #[must_use]
    pub fn point(loc: Location) -> Self {
        Self { start: loc, end: loc }
    }

    #[must_use]
    pub fn to(self, end: Location) -> Self {
        Self { start: self.start, end }
    }

    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start,
            end: other.end,
        }
    }
}

/// Tracks line/column/offset while a lexer walks a decoded sequence of
/// Unicode scalar values, applying the advance rule from spec §4.2.
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    file: StringId,
    line: u32,
    column: u32,
    offset: u32,
}

impl Cursor {
    #[must_use]
    pub fn new(file: StringId) -> Self {
        Self {
            file,
            line: 1,
            column: 1,
            offset: 0,
        }
    }

    #[must_use]
    pub fn location(self) -> Location {
        Location {
            file: self.file,
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }

    /// Advances past one decoded scalar value, whose UTF-8 encoding is
    /// `len_utf8` bytes long. Applies the `\n`/`\r`/other advance rule.
    pub fn advance(&mut self, scalar: char, len_utf8: u32) {
        match scalar {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            '\r' => {
                // Consumed but never emitted as a token; does not bump line
                // or column (spec §4.2).
            }
            _ => {
                self.column += 1;
            }
        }
        self.offset += len_utf8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newline_resets_column_and_bumps_line() {
        let mut c = Cursor::new(StringId::from_index(0));
        c.advance('a', 1);
        c.advance('\n', 1);
        let loc = c.location();
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 1);
    }

    #[test]
    fn carriage_return_does_not_advance_line_or_column() {
        let mut c = Cursor::new(StringId::from_index(0));
        c.advance('\r', 1);
        let loc = c.location();
        assert_eq!(loc.line, 1);
        assert_eq!(loc.column, 1);
        assert_eq!(loc.offset, 1);
    }

    #[test]
    fn astral_scalar_advances_column_by_one() {
        let mut c = Cursor::new(StringId::from_index(0));
        // U+1F600 GRINNING FACE is 4 UTF-8 bytes but one scalar value.
        c.advance('\u{1F600}', 4);
        let loc = c.location();
        assert_eq!(loc.column, 2);
        assert_eq!(loc.offset, 4);
    }
}
