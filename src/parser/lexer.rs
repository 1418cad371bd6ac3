//! On-demand tokenizer for tag and expression contents.
//!
//! The lexer never runs ahead of the parser: template text is not
//! tokenized, only the inside of `{{ }}`, `{% %}` and directive values.
//! That keeps `}}` and `%}` unambiguous even when an object literal closes
//! right before the tag does.

use crate::ast::Span;
use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident,
    Number,
    String,
    Punct,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Multi-character punctuators, longest first.
const PUNCTUATORS: &[&str] = &[
    "...", "?.", "??", "=>", "==", "!=", "<=", ">=", "+=", "-=", "*=", "/=", "~=", "||", "&&",
    "++", "--", "..", "%}", "(", ")", "[", "]", "{", "}", ",", ";", ":", ".", "?", "=", "<", ">",
    "+", "-", "*", "/", "%", "~", "|", "!", "#", "@",
];

#[derive(Debug, Clone, Copy)]
pub(crate) struct Lexer<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> Lexer<'s> {
    pub fn new(src: &'s str, pos: usize) -> Self {
        Self { src, pos }
    }

    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let rest = &self.src[start..];
        let Some(first) = rest.chars().next() else {
            return Ok(self.token(TokenKind::Eof, start));
        };

        if is_ident_start(first) {
            self.pos += rest
                .find(|c: char| !is_ident_continue(c))
                .unwrap_or(rest.len());
            return Ok(self.token(TokenKind::Ident, start));
        }

        if first.is_ascii_digit()
            || (first == '.' && rest[1..].starts_with(|c: char| c.is_ascii_digit()))
        {
            self.scan_number();
            return Ok(self.token(TokenKind::Number, start));
        }

        if first == '"' || first == '\'' {
            self.scan_string(first)?;
            return Ok(self.token(TokenKind::String, start));
        }

        for punct in PUNCTUATORS {
            if rest.starts_with(punct) {
                // `a?.5:b` is a ternary, not an optional member access
                if *punct == "?."
                    && rest[2..].starts_with(|c: char| c.is_ascii_digit())
                {
                    continue;
                }
                self.pos += punct.len();
                return Ok(self.token(TokenKind::Punct, start));
            }
        }

        Err(ParseError::new(
            self.src,
            Span::new(start, start + first.len_utf8()),
            format!("Unexpected character `{first}`"),
        ))
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            span: Span::new(start, self.pos),
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.src[self.pos..];
        self.pos += rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
    }

    fn scan_number(&mut self) {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        // `1.5` continues the literal, `1..5` is a range
        if self.pos + 1 < bytes.len()
            && bytes[self.pos] == b'.'
            && bytes[self.pos + 1].is_ascii_digit()
        {
            self.pos += 1;
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
        }
    }

    fn scan_string(&mut self, quote: char) -> Result<(), ParseError> {
        let start = self.pos;
        let mut chars = self.src[start + 1..].char_indices();
        while let Some((i, ch)) = chars.next() {
            match ch {
                '\\' => {
                    chars.next();
                }
                c if c == quote => {
                    self.pos = start + 1 + i + 1;
                    return Ok(());
                }
                _ => {}
            }
        }
        Err(ParseError::new(
            self.src,
            Span::new(start, self.src.len()),
            "Unterminated string literal",
        ))
    }
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Whether `name` can be written without quotes as an object key.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_ident_start) && chars.all(is_ident_continue)
}

/// Decode the escapes of a quoted string literal.
pub(crate) fn unquote(raw: &str) -> String {
    let inner = &raw[1..raw.len().saturating_sub(1).max(1)];
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('t') => result.push('\t'),
                Some('r') => result.push('\r'),
                Some(c) => result.push(c),
                None => result.push('\\'),
            }
        } else {
            result.push(ch);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<(TokenKind, &str)> {
        let mut lexer = Lexer::new(src, 0);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            if token.kind == TokenKind::Eof {
                break;
            }
            out.push((token.kind, &src[token.span.start..token.span.end]));
        }
        out
    }

    #[test]
    fn ranges_are_not_fractions() {
        assert_eq!(
            kinds("1..10 2.5"),
            vec![
                (TokenKind::Number, "1"),
                (TokenKind::Punct, ".."),
                (TokenKind::Number, "10"),
                (TokenKind::Number, "2.5"),
            ]
        );
    }

    #[test]
    fn tag_close_is_a_single_token() {
        assert_eq!(
            kinds("a % b %}"),
            vec![
                (TokenKind::Ident, "a"),
                (TokenKind::Punct, "%"),
                (TokenKind::Ident, "b"),
                (TokenKind::Punct, "%}"),
            ]
        );
    }

    #[test]
    fn optional_chain_before_digit_is_ternary() {
        assert_eq!(
            kinds("a?.5:b")
                .into_iter()
                .map(|(_, text)| text)
                .collect::<Vec<_>>(),
            vec!["a", "?", ".5", ":", "b"]
        );
    }

    #[test]
    fn strings_keep_escapes_in_raw_form() {
        assert_eq!(kinds(r#""a\"b""#), vec![(TokenKind::String, r#""a\"b""#)]);
        assert_eq!(unquote(r#""a\"b""#), "a\"b");
        assert_eq!(unquote("'it\\'s'"), "it's");
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = Lexer::new("'abc", 0).next_token().unwrap_err();
        assert_eq!(err.text, "Unterminated string literal");
    }

    #[test]
    fn identifier_check() {
        assert!(is_identifier("foo_1"));
        assert!(is_identifier("$el"));
        assert!(!is_identifier("1foo"));
        assert!(!is_identifier("data-id"));
        assert!(!is_identifier(""));
    }
}
