//! Stylesheet parser for root-level `<style>` blocks.
//!
//! Only the structure the formatter needs is recovered: rules with their
//! selector list, declarations, at-rules and comments. Selector and value
//! text is kept as written, trimmed.

use crate::ast::{AtRule, Declaration, Span, StyleComment, StyleNode, StyleRule, StyleSheet};
use crate::error::ParseError;

/// Parse the stylesheet found at `span` in `source`. Error ranges refer to
/// the whole document.
pub fn parse_stylesheet(source: &str, span: Span) -> Result<StyleSheet, ParseError> {
    let mut parser = StyleParser {
        src: source,
        pos: span.start,
        end: span.end,
    };
    let nodes = parser.parse_nodes(false)?;
    Ok(StyleSheet { nodes })
}

struct StyleParser<'s> {
    src: &'s str,
    pos: usize,
    end: usize,
}

/// What stopped a prelude scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    Block,
    Semicolon,
    Close,
    Eof,
}

impl<'s> StyleParser<'s> {
    fn rest(&self) -> &'s str {
        &self.src[self.pos..self.end]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
    }

    fn error(&self, start: usize, text: &str) -> ParseError {
        ParseError::new(self.src, Span::new(start, self.pos.max(start + 1).min(self.end)), text)
    }

    /// Parse nodes until end of input, or until the `}` closing a block
    /// when `nested` is set. The `}` is consumed.
    fn parse_nodes(&mut self, nested: bool) -> Result<Vec<StyleNode>, ParseError> {
        let mut nodes = Vec::new();

        loop {
            self.skip_whitespace();
            let rest = self.rest();

            if rest.is_empty() {
                if nested {
                    return Err(self.error(self.pos, "Expected `}`, found end of style"));
                }
                break;
            }
            if rest.starts_with('}') {
                if nested {
                    self.pos += 1;
                    break;
                }
                return Err(self.error(self.pos, "Unexpected `}`"));
            }
            if rest.starts_with(';') {
                self.pos += 1;
                continue;
            }

            let node = if rest.starts_with("/*") {
                self.parse_block_comment()?
            } else if rest.starts_with("//") {
                self.parse_line_comment()
            } else if rest.starts_with('@') {
                self.parse_at_rule()?
            } else {
                self.parse_rule_or_declaration()?
            };
            nodes.push(node);
        }

        Ok(nodes)
    }

    fn parse_block_comment(&mut self) -> Result<StyleNode, ParseError> {
        let start = self.pos;
        let Some(len) = self.rest()[2..].find("*/") else {
            self.pos = self.end;
            return Err(self.error(start, "Unterminated comment"));
        };
        let text = self.rest()[2..2 + len].trim().to_string();
        self.pos += len + 4;
        Ok(StyleNode::Comment(StyleComment {
            text,
            inline: false,
        }))
    }

    fn parse_line_comment(&mut self) -> StyleNode {
        let rest = self.rest();
        let len = rest.find('\n').unwrap_or(rest.len());
        self.pos += len;
        StyleNode::Comment(StyleComment {
            text: rest[2..len].trim().to_string(),
            inline: true,
        })
    }

    fn parse_at_rule(&mut self) -> Result<StyleNode, ParseError> {
        self.pos += 1;
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(rest.len());
        let name = rest[..len].to_string();
        self.pos += len;

        let (params, stop) = self.scan_prelude()?;
        let nodes = match stop {
            Stop::Block => Some(self.parse_nodes(true)?),
            Stop::Semicolon | Stop::Close | Stop::Eof => None,
        };

        Ok(StyleNode::AtRule(AtRule {
            name,
            params: collapse_whitespace(params),
            nodes,
        }))
    }

    fn parse_rule_or_declaration(&mut self) -> Result<StyleNode, ParseError> {
        let start = self.pos;
        let (prelude, stop) = self.scan_prelude()?;

        if stop == Stop::Block {
            let selectors = split_top_level(prelude, ',')
                .into_iter()
                .map(collapse_whitespace)
                .filter(|selector| !selector.is_empty())
                .collect();
            let nodes = self.parse_nodes(true)?;
            return Ok(StyleNode::Rule(StyleRule { selectors, nodes }));
        }

        let Some((prop, value)) = prelude.split_once(':') else {
            return Err(self.error(start, "Expected `:` in declaration"));
        };
        let mut value = value.trim();
        let mut important = false;
        if let Some(bang) = value.rfind('!')
            && value[bang + 1..].trim().eq_ignore_ascii_case("important")
        {
            important = true;
            value = value[..bang].trim_end();
        }

        Ok(StyleNode::Declaration(Declaration {
            prop: prop.trim().to_string(),
            value: value.to_string(),
            important,
        }))
    }

    /// Scan up to the next top-level `{`, `;` or `}`. `{` and `;` are
    /// consumed, `}` is left for the enclosing block.
    fn scan_prelude(&mut self) -> Result<(&'s str, Stop), ParseError> {
        let start = self.pos;
        let rest = self.rest();
        let mut parens = 0usize;
        let mut quote: Option<char> = None;
        let mut chars = rest.char_indices();

        while let Some((i, ch)) = chars.next() {
            if let Some(q) = quote {
                match ch {
                    '\\' => {
                        chars.next();
                    }
                    c if c == q => quote = None,
                    _ => {}
                }
                continue;
            }
            let stop = match ch {
                '"' | '\'' => {
                    quote = Some(ch);
                    None
                }
                '(' => {
                    parens += 1;
                    None
                }
                ')' => {
                    parens = parens.saturating_sub(1);
                    None
                }
                '{' if parens == 0 => Some(Stop::Block),
                ';' if parens == 0 => Some(Stop::Semicolon),
                '}' if parens == 0 => Some(Stop::Close),
                _ => None,
            };
            if let Some(stop) = stop {
                self.pos = start + i;
                if stop != Stop::Close {
                    self.pos += 1;
                }
                return Ok((rest[..i].trim(), stop));
            }
        }

        if quote.is_some() {
            self.pos = self.end;
            return Err(self.error(start, "Unterminated string"));
        }
        self.pos = self.end;
        Ok((rest.trim(), Stop::Eof))
    }
}

/// Split on `separator` outside parentheses and strings.
fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut from = 0;

    for (i, ch) in text.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, c) if c == separator && depth == 0 => {
                parts.push(&text[from..i]);
                from = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[from..]);
    parts
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(code: &str) -> Vec<StyleNode> {
        parse_stylesheet(code, Span::new(0, code.len())).unwrap().nodes
    }

    #[test]
    fn rules_and_declarations() {
        let nodes = parse("a, b:hover {\n  color: red !important;\n  margin : 0 auto\n}");
        let [StyleNode::Rule(rule)] = nodes.as_slice() else {
            panic!("expected a single rule, got {nodes:?}");
        };
        assert_eq!(rule.selectors, vec!["a", "b:hover"]);
        assert_eq!(
            rule.nodes,
            vec![
                StyleNode::Declaration(Declaration {
                    prop: "color".into(),
                    value: "red".into(),
                    important: true,
                }),
                StyleNode::Declaration(Declaration {
                    prop: "margin".into(),
                    value: "0 auto".into(),
                    important: false,
                }),
            ]
        );
    }

    #[test]
    fn at_rules_with_and_without_blocks() {
        let nodes = parse("@import url(\"a;b.css\");\n@media (max-width: 600px) { p { x: y } }");
        assert_eq!(
            nodes[0],
            StyleNode::AtRule(AtRule {
                name: "import".into(),
                params: "url(\"a;b.css\")".into(),
                nodes: None,
            })
        );
        match &nodes[1] {
            StyleNode::AtRule(at_rule) => {
                assert_eq!(at_rule.name, "media");
                assert_eq!(at_rule.params, "(max-width: 600px)");
                assert_eq!(at_rule.nodes.as_ref().map(Vec::len), Some(1));
            }
            other => panic!("expected at-rule, got {other:?}"),
        }
    }

    #[test]
    fn comments() {
        let nodes = parse("/* block */\n// line\na { }");
        assert_eq!(
            nodes[0],
            StyleNode::Comment(StyleComment {
                text: "block".into(),
                inline: false,
            })
        );
        assert_eq!(
            nodes[1],
            StyleNode::Comment(StyleComment {
                text: "line".into(),
                inline: true,
            })
        );
    }

    #[test]
    fn multi_line_selectors_are_normalized() {
        let nodes = parse(".a\n  .b,\n.c > .d {}");
        let StyleNode::Rule(rule) = &nodes[0] else {
            panic!("expected rule");
        };
        assert_eq!(rule.selectors, vec![".a .b", ".c > .d"]);
    }

    #[test]
    fn errors_use_document_offsets() {
        let source = "<style>\na {\n  color red;\n}</style>";
        let err = parse_stylesheet(source, Span::new(7, source.len() - 8)).unwrap_err();
        assert_eq!(err.text, "Expected `:` in declaration");
        assert_eq!(err.range.start.ln, 2);
        assert_eq!(err.range.start.col, 2);
    }

    #[test]
    fn unclosed_block() {
        let err = parse_stylesheet("a {", Span::new(0, 3)).unwrap_err();
        assert_eq!(err.text, "Expected `}`, found end of style");
    }
}
