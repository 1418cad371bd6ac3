//! Parse errors.
//!
//! A [`ParseError`] carries a message and a line/column [`Range`] so an
//! editor can underline the offending source. The formatter never produces
//! partial output: when parsing fails the error is returned as-is.

use crate::ast::Span;
use thiserror::Error;

/// Zero-based line and character column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub ln: usize,
    pub col: usize,
}

impl Position {
    /// Translate a byte offset into a line/column position.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let mut ln = 0;
        let mut col = 0;
        for (i, ch) in source.char_indices() {
            if i >= offset {
                break;
            }
            if ch == '\n' {
                ln += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        Self { ln, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn from_span(source: &str, span: Span) -> Self {
        Self {
            start: Position::from_offset(source, span.start),
            end: Position::from_offset(source, span.end),
        }
    }

    /// The range covering the whole of `source`.
    pub fn of_document(source: &str) -> Self {
        Self::from_span(source, Span::new(0, source.len()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{text} ({}:{})", .range.start.ln + 1, .range.start.col + 1)]
pub struct ParseError {
    pub text: String,
    pub range: Range,
}

impl ParseError {
    pub fn new(source: &str, span: Span, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            range: Range::from_span(source, span),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_translate_to_zero_based_positions() {
        let source = "ab\ncd\n\nef";
        assert_eq!(Position::from_offset(source, 0), Position { ln: 0, col: 0 });
        assert_eq!(Position::from_offset(source, 4), Position { ln: 1, col: 1 });
        assert_eq!(Position::from_offset(source, 7), Position { ln: 3, col: 0 });
        assert_eq!(Position::from_offset(source, 99), Position { ln: 3, col: 2 });
    }

    #[test]
    fn display_uses_one_based_location() {
        let err = ParseError::new("a\nbc", Span::new(3, 4), "unexpected token");
        assert_eq!(err.to_string(), "unexpected token (2:2)");
    }
}
