//! Template parser.
//!
//! A hand-written recursive descent parser turning Zvelte source text into
//! the positioned tree defined in [`crate::ast`]. Markup is scanned
//! directly; the contents of `{{ ... }}`, `{% ... %}` and directive values
//! are handed to the expression parser in [`expr`].
//!
//! Use [`parse`] to convert source text into a [`Root`].

pub(crate) mod expr;
pub(crate) mod lexer;
pub mod style;

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use crate::ast::{
    Attribute, AttributeKind, AttributeValue, AttributeValuePart, AwaitBlock, Directive,
    DirectiveKind, Element, ElementKind, Expr, ExprKind, ExpressionTag, ForBlock, Fragment,
    IfBlock, ImportTag, KeyBlock, Node, NodeKind, PlainAttribute, Root, SnippetBlock, Span,
    Spanned, Style, TransitionDirection, ZsScript,
};
use crate::error::ParseError;

use expr::ExprParser;

pub use expr::{parse_expression, parse_script};
pub use style::parse_stylesheet;

/// Elements that never have children and always self-close.
pub static VOID_ELEMENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ]
    .into_iter()
    .collect()
});

/// Local names recognised after the special prefix (`zvelte:head`, ...).
static SPECIAL_ELEMENTS: Lazy<HashMap<&'static str, ElementKind>> = Lazy::new(|| {
    HashMap::from([
        ("self", ElementKind::SpecialSelf),
        ("head", ElementKind::SpecialHead),
        ("element", ElementKind::SpecialElement),
        ("component", ElementKind::SpecialComponent),
    ])
});

/// Elements whose content is not markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

const DEFAULT_SPECIAL_TAG: &str = "zvelte";

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Prefix of special elements; `zvelte` when unset.
    pub special_tag: Option<String>,
}

impl ParseOptions {
    pub fn special_prefix(&self) -> &str {
        self.special_tag.as_deref().unwrap_or(DEFAULT_SPECIAL_TAG)
    }
}

/// Parse source text into a [`Root`].
///
/// Returns the first syntax error encountered; there is no recovery.
pub fn parse(source: &str, options: &ParseOptions) -> Result<Root, ParseError> {
    let mut parser = Parser {
        src: source,
        pos: 0,
        special: options.special_prefix(),
        depth: 0,
        in_head: false,
        imports: Vec::new(),
        zs: None,
        css: None,
    };

    let nodes = parser.parse_nodes(&[], None)?;
    Ok(Root {
        imports: parser.imports,
        zs: parser.zs,
        fragment: Fragment::new(nodes),
        css: parser.css,
    })
}

struct Parser<'s> {
    src: &'s str,
    pos: usize,
    special: &'s str,
    /// Nesting of elements and blocks around the cursor.
    depth: usize,
    in_head: bool,
    imports: Vec<Spanned<ImportTag>>,
    zs: Option<Spanned<ZsScript>>,
    css: Option<Spanned<Style>>,
}

/// Result of parsing one construct in content position.
enum Parsed {
    Node(Node),
    /// Lifted out of the fragment (imports, the root zs script and style
    /// blocks).
    Hoisted,
}

impl<'s> Parser<'s> {
    // -- Cursor helpers ----------------------------------------------------

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn at(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn eat(&mut self, prefix: &str) -> bool {
        if self.at(prefix) {
            self.pos += prefix.len();
            return true;
        }
        false
    }

    fn expect(&mut self, prefix: &str) -> Result<(), ParseError> {
        if self.eat(prefix) {
            return Ok(());
        }
        Err(self.error_here(format!("Expected `{prefix}`")))
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
    }

    fn error_here(&self, text: impl Into<String>) -> ParseError {
        let len = self.rest().chars().next().map_or(0, char::len_utf8);
        ParseError::new(self.src, Span::new(self.pos, self.pos + len), text)
    }

    fn expr_parser(&self, pos: usize) -> Result<ExprParser<'s>, ParseError> {
        ExprParser::new(self.src, pos)
    }

    // -- Fragments ---------------------------------------------------------

    /// Parse sibling nodes until end of input, a closing tag (when
    /// `closing` names the open element) or a `{% keyword %}` listed in
    /// `terminators`. The terminator itself is left unconsumed.
    fn parse_nodes(
        &mut self,
        terminators: &[&str],
        closing: Option<&str>,
    ) -> Result<Vec<Node>, ParseError> {
        let mut nodes: Vec<Node> = Vec::new();

        loop {
            if self.pos >= self.src.len() {
                if let Some(name) = closing {
                    return Err(self.error_here(format!("Expected `</{name}>`, found end of input")));
                }
                if let Some(end) = terminators.last() {
                    return Err(self.error_here(format!(
                        "Expected `{{% {end} %}}`, found end of input"
                    )));
                }
                break;
            }

            if self.at("</") {
                if closing.is_some() {
                    break;
                }
                return Err(self.error_here("Unexpected closing tag"));
            }

            if let Some(keyword) = self.peek_tag_keyword()
                && terminators.contains(&keyword)
            {
                break;
            }

            match self.parse_node()? {
                Parsed::Node(node) => push_node(&mut nodes, node),
                Parsed::Hoisted => {}
            }
        }

        Ok(nodes)
    }

    fn parse_fragment(
        &mut self,
        terminators: &[&str],
        closing: Option<&str>,
    ) -> Result<Fragment, ParseError> {
        self.depth += 1;
        let nodes = self.parse_nodes(terminators, closing);
        self.depth -= 1;
        Ok(Fragment::new(nodes?))
    }

    fn parse_node(&mut self) -> Result<Parsed, ParseError> {
        if self.at("{%") {
            return self.parse_block_tag();
        }
        if self.at("{{") {
            return self.parse_mustache().map(Parsed::Node);
        }
        if self.at("<!--") {
            return self.parse_comment().map(Parsed::Node);
        }
        if self.at("<") && self.rest()[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            return self.parse_element();
        }
        Ok(Parsed::Node(self.parse_text()))
    }

    fn parse_text(&mut self) -> Node {
        let start = self.pos;
        let rest = self.rest();
        let mut end = rest.len();
        for (i, ch) in rest.char_indices() {
            // the first character is always text, or we would not be here
            if i == 0 {
                continue;
            }
            let tail = &rest[i..];
            let starts_markup = match ch {
                '{' => tail.starts_with("{{") || tail.starts_with("{%"),
                '<' => tail[1..].starts_with(|c: char| c.is_ascii_alphabetic() || c == '/' || c == '!'),
                _ => false,
            };
            if starts_markup {
                end = i;
                break;
            }
        }
        self.pos += end;
        Spanned::new(
            NodeKind::Text(rest[..end].to_string()),
            Span::new(start, self.pos),
        )
    }

    fn parse_comment(&mut self) -> Result<Node, ParseError> {
        let start = self.pos;
        self.expect("<!--")?;
        let Some(len) = self.rest().find("-->") else {
            return Err(ParseError::new(
                self.src,
                Span::new(start, self.src.len()),
                "Unterminated comment",
            ));
        };
        let data = self.rest()[..len].to_string();
        self.pos += len + 3;
        Ok(Spanned::new(
            NodeKind::Comment(data),
            Span::new(start, self.pos),
        ))
    }

    // -- Expression tags ---------------------------------------------------

    fn parse_mustache(&mut self) -> Result<Node, ParseError> {
        let start = self.pos;
        let mut p = self.expr_parser(start + 2)?;

        let kind = if p.eat_punct("@")? {
            let (keyword, keyword_span) = p.expect_name()?;
            let expression = p.parse_expression()?;
            match keyword.as_str() {
                "html" => NodeKind::HtmlTag(expression),
                "render" => {
                    if !matches!(expression.node, ExprKind::Call { .. }) {
                        return Err(ParseError::new(
                            self.src,
                            expression.span,
                            "Expected a call expression",
                        ));
                    }
                    NodeKind::RenderTag(expression)
                }
                _ => {
                    return Err(ParseError::new(
                        self.src,
                        keyword_span,
                        format!("Unknown tag `@{keyword}`"),
                    ));
                }
            }
        } else {
            let expression = p.parse_expression()?;
            NodeKind::ExpressionTag(ExpressionTag { expression })
        };

        self.pos = p.expect_mustache_close()?;
        Ok(Spanned::new(kind, Span::new(start, self.pos)))
    }

    /// `{{ expression }}` in attribute-value position.
    fn parse_expression_tag(&mut self) -> Result<Spanned<ExpressionTag>, ParseError> {
        let start = self.pos;
        let mut p = self.expr_parser(start + 2)?;
        let expression = p.parse_expression()?;
        self.pos = p.expect_mustache_close()?;
        Ok(Spanned::new(
            ExpressionTag { expression },
            Span::new(start, self.pos),
        ))
    }

    // -- Block tags --------------------------------------------------------

    /// The keyword of the `{% ... %}` tag at the cursor.
    fn peek_tag_keyword(&self) -> Option<&'s str> {
        let inner = self.rest().strip_prefix("{%")?.trim_start();
        let len = inner
            .find(|c: char| !lexer::is_ident_continue(c))
            .unwrap_or(inner.len());
        Some(&inner[..len])
    }

    /// Consume a keyword-only tag such as `{% endif %}` and return its end.
    fn expect_simple_tag(&mut self, keyword: &str) -> Result<usize, ParseError> {
        let mut p = self.expr_parser(self.pos + 2)?;
        p.expect_keyword(keyword)?;
        self.pos = p.expect_tag_close()?;
        Ok(self.pos)
    }

    fn parse_block_tag(&mut self) -> Result<Parsed, ParseError> {
        let start = self.pos;
        let mut p = self.expr_parser(start + 2)?;
        let (keyword, keyword_span) = p.expect_name()?;

        let kind = match keyword.as_str() {
            "if" => {
                let test = p.parse_expression()?;
                self.pos = p.expect_tag_close()?;
                return self.parse_if(start, test, false).map(Parsed::Node);
            }
            "for" => {
                let mut context = p.parse_identifier()?;
                let mut index = None;
                if p.eat_punct(",")? {
                    index = Some(context);
                    context = p.parse_identifier()?;
                }
                p.expect_keyword("in")?;
                let expression = p.parse_expression()?;
                let key = if p.eat_punct("#")? {
                    p.expect_punct("(")?;
                    let key = p.parse_expression()?;
                    p.expect_punct(")")?;
                    Some(key)
                } else {
                    None
                };
                self.pos = p.expect_tag_close()?;

                let body = self.parse_fragment(&["else", "endfor"], None)?;
                let fallback = if self.peek_tag_keyword() == Some("else") {
                    self.expect_simple_tag("else")?;
                    Some(self.parse_fragment(&["endfor"], None)?)
                } else {
                    None
                };
                self.expect_simple_tag("endfor")?;

                NodeKind::ForBlock(ForBlock {
                    index,
                    context,
                    expression,
                    key,
                    body,
                    fallback,
                })
            }
            "key" => {
                let expression = p.parse_expression()?;
                self.pos = p.expect_tag_close()?;
                let fragment = self.parse_fragment(&["endkey"], None)?;
                self.expect_simple_tag("endkey")?;
                NodeKind::KeyBlock(KeyBlock {
                    expression,
                    fragment,
                })
            }
            "snippet" => {
                let (name, _) = p.expect_name()?;
                p.expect_punct("(")?;
                let mut parameters = Vec::new();
                while !p.at_punct(")") {
                    parameters.push(p.parse_identifier()?);
                    if !p.eat_punct(",")? {
                        break;
                    }
                }
                p.expect_punct(")")?;
                self.pos = p.expect_tag_close()?;
                let body = self.parse_fragment(&["endsnippet"], None)?;
                self.expect_simple_tag("endsnippet")?;
                NodeKind::SnippetBlock(SnippetBlock {
                    name,
                    parameters,
                    body,
                })
            }
            "await" => {
                let expression = p.parse_expression()?;
                return self.parse_await(start, p, expression).map(Parsed::Node);
            }
            "set" => {
                let assignment = p.parse_expression()?;
                if !matches!(assignment.node, ExprKind::Assignment { .. }) {
                    return Err(ParseError::new(
                        self.src,
                        assignment.span,
                        "Expected an assignment",
                    ));
                }
                self.pos = p.expect_tag_close()?;
                NodeKind::VariableTag(assignment)
            }
            "import" => {
                let (specifier, _) = p.expect_name()?;
                p.expect_keyword("from")?;
                let source = p.parse_string()?;
                self.pos = p.expect_tag_close()?;
                let span = Span::new(start, self.pos);
                if self.depth > 0 {
                    return Err(ParseError::new(
                        self.src,
                        span,
                        "Imports are only allowed at the top level",
                    ));
                }
                self.imports
                    .push(Spanned::new(ImportTag { specifier, source }, span));
                return Ok(Parsed::Hoisted);
            }
            _ => {
                return Err(ParseError::new(
                    self.src,
                    keyword_span,
                    format!("Unexpected tag `{keyword}`"),
                ));
            }
        };

        Ok(Parsed::Node(Spanned::new(kind, Span::new(start, self.pos))))
    }

    /// Everything after an `if`/`elseif` tag. The innermost block of an
    /// elseif chain consumes the shared `{% endif %}`.
    fn parse_if(&mut self, start: usize, test: Expr, elseif: bool) -> Result<Node, ParseError> {
        let consequent = self.parse_fragment(&["elseif", "else", "endif"], None)?;

        let alternate = match self.peek_tag_keyword() {
            Some("elseif") => {
                let branch_start = self.pos;
                let mut p = self.expr_parser(branch_start + 2)?;
                p.expect_keyword("elseif")?;
                let test = p.parse_expression()?;
                self.pos = p.expect_tag_close()?;

                self.depth += 1;
                let branch = self.parse_if(branch_start, test, true);
                self.depth -= 1;
                Some(Fragment::new(vec![branch?]))
            }
            Some("else") => {
                self.expect_simple_tag("else")?;
                let alternate = self.parse_fragment(&["endif"], None)?;
                self.expect_simple_tag("endif")?;
                Some(alternate)
            }
            _ => {
                self.expect_simple_tag("endif")?;
                None
            }
        };

        Ok(Spanned::new(
            NodeKind::IfBlock(IfBlock {
                elseif,
                test,
                consequent,
                alternate,
            }),
            Span::new(start, self.pos),
        ))
    }

    /// `{% await x %}` with pending content, or the short
    /// `{% await x then v %}` / `{% await x catch e %}` forms.
    fn parse_await(
        &mut self,
        start: usize,
        mut p: ExprParser<'s>,
        expression: Expr,
    ) -> Result<Node, ParseError> {
        let mut value = None;
        let mut error = None;
        let mut pending = None;
        let mut then = None;
        let mut catch = None;

        if p.eat_keyword("then")? {
            if !p.at_punct("%}") {
                value = Some(p.parse_identifier()?);
            }
            self.pos = p.expect_tag_close()?;
            then = Some(self.parse_fragment(&["catch", "endawait"], None)?);
        } else if p.eat_keyword("catch")? {
            if !p.at_punct("%}") {
                error = Some(p.parse_identifier()?);
            }
            self.pos = p.expect_tag_close()?;
            catch = Some(self.parse_fragment(&["endawait"], None)?);
        } else {
            self.pos = p.expect_tag_close()?;
            pending = Some(self.parse_fragment(&["then", "catch", "endawait"], None)?);

            if self.peek_tag_keyword() == Some("then") {
                let mut p = self.expr_parser(self.pos + 2)?;
                p.expect_keyword("then")?;
                if !p.at_punct("%}") {
                    value = Some(p.parse_identifier()?);
                }
                self.pos = p.expect_tag_close()?;
                then = Some(self.parse_fragment(&["catch", "endawait"], None)?);
            }
        }

        if catch.is_none() && self.peek_tag_keyword() == Some("catch") {
            let mut p = self.expr_parser(self.pos + 2)?;
            p.expect_keyword("catch")?;
            if !p.at_punct("%}") {
                error = Some(p.parse_identifier()?);
            }
            self.pos = p.expect_tag_close()?;
            catch = Some(self.parse_fragment(&["endawait"], None)?);
        }

        self.expect_simple_tag("endawait")?;

        Ok(Spanned::new(
            NodeKind::AwaitBlock(AwaitBlock {
                expression,
                value,
                error,
                pending,
                then,
                catch,
            }),
            Span::new(start, self.pos),
        ))
    }

    // -- Elements ----------------------------------------------------------

    fn parse_tag_name(&mut self) -> &'s str {
        let rest = self.rest();
        let len = rest
            .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn element_kind(&self, name: &str, span: Span) -> Result<ElementKind, ParseError> {
        if let Some((prefix, local)) = name.split_once(':')
            && prefix == self.special
        {
            return SPECIAL_ELEMENTS.get(local).copied().ok_or_else(|| {
                ParseError::new(
                    self.src,
                    span,
                    format!("Unknown special element `<{name}>`"),
                )
            });
        }
        if name.starts_with(|c: char| c.is_ascii_uppercase()) {
            return Ok(ElementKind::Component);
        }
        if name == "title" && self.in_head {
            return Ok(ElementKind::Title);
        }
        Ok(ElementKind::Regular)
    }

    fn parse_element(&mut self) -> Result<Parsed, ParseError> {
        let start = self.pos;
        self.expect("<")?;
        let name = self.parse_tag_name();
        let kind = self.element_kind(name, Span::new(start, self.pos))?;

        let mut attributes = Vec::new();
        let self_closing = loop {
            self.skip_whitespace();
            if self.eat("/>") {
                break true;
            }
            if self.eat(">") {
                break false;
            }
            if self.pos >= self.src.len() {
                return Err(self.error_here(format!("Unterminated `<{name}>` tag")));
            }
            attributes.push(self.parse_attribute()?);
        };

        let is_regular = kind == ElementKind::Regular;
        let is_void = is_regular && VOID_ELEMENTS.contains(name.to_ascii_lowercase().as_str());
        let mut fragment = Fragment::default();

        if is_void || self_closing {
            // no content and no closing tag
        } else if is_regular && RAW_TEXT_ELEMENTS.contains(&name) {
            let content_start = self.pos;
            let closing = format!("</{name}>");
            let Some(len) = self.rest().find(&closing) else {
                return Err(self.error_here(format!("Expected `{closing}`, found end of input")));
            };
            let code = &self.rest()[..len];
            self.pos += len + closing.len();
            let code_span = Span::new(content_start, content_start + len);

            if name == "script" && self.depth == 0 && is_zs_script(&attributes) {
                if self.zs.is_some() {
                    return Err(ParseError::new(
                        self.src,
                        Span::new(start, self.pos),
                        "A component can only have one top-level <script lang=\"zs\"> element",
                    ));
                }
                let body = parse_script(self.src, code_span)?;
                self.zs = Some(Spanned::new(ZsScript { body }, Span::new(start, self.pos)));
                return Ok(Parsed::Hoisted);
            }

            if name == "style" && self.depth == 0 {
                if self.css.is_some() {
                    return Err(ParseError::new(
                        self.src,
                        Span::new(start, self.pos),
                        "A component can only have one top-level <style> element",
                    ));
                }
                self.css = Some(Spanned::new(
                    Style {
                        attributes,
                        code: code.to_string(),
                        code_span,
                    },
                    Span::new(start, self.pos),
                ));
                return Ok(Parsed::Hoisted);
            }

            if !code.is_empty() {
                fragment
                    .nodes
                    .push(Spanned::new(NodeKind::Text(code.to_string()), code_span));
            }
        } else {
            let in_head = self.in_head;
            self.in_head = kind == ElementKind::SpecialHead;
            let children = self.parse_fragment(&[], Some(name));
            self.in_head = in_head;
            fragment = children?;

            let close_start = self.pos;
            self.expect("</")?;
            let close_name = self.parse_tag_name();
            self.skip_whitespace();
            if close_name != name || !self.eat(">") {
                return Err(ParseError::new(
                    self.src,
                    Span::new(close_start, self.pos),
                    format!("Expected `</{name}>`"),
                ));
            }
        }

        Ok(Parsed::Node(Spanned::new(
            NodeKind::Element(Element {
                kind,
                name: name.to_string(),
                attributes,
                fragment,
            }),
            Span::new(start, self.pos),
        )))
    }

    // -- Attributes --------------------------------------------------------

    fn parse_attribute(&mut self) -> Result<Attribute, ParseError> {
        let start = self.pos;

        if self.at("{{") {
            let mut p = self.expr_parser(start + 2)?;
            if p.eat_punct("...")? {
                let expression = p.parse_expression()?;
                self.pos = p.expect_mustache_close()?;
                return Ok(Spanned::new(
                    AttributeKind::Spread(expression),
                    Span::new(start, self.pos),
                ));
            }

            let tag = self.parse_expression_tag()?;
            let Some(name) = tag.node.expression.node.as_identifier() else {
                return Err(ParseError::new(
                    self.src,
                    tag.span,
                    "Expected an identifier or a spread",
                ));
            };
            let name = name.to_string();
            return Ok(Spanned::new(
                AttributeKind::Plain(PlainAttribute {
                    name,
                    value: AttributeValue::Parts(vec![AttributeValuePart::ExpressionTag(tag)]),
                    double_quotes: true,
                }),
                Span::new(start, self.pos),
            ));
        }

        let rest = self.rest();
        let len = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '=' | '>' | '/' | '"' | '\''))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error_here("Expected an attribute name"));
        }
        let name = &rest[..len];
        self.pos += len;
        let name_end = self.pos;

        self.skip_whitespace();
        let (value, double_quotes) = if self.eat("=") {
            self.skip_whitespace();
            self.parse_attribute_value()?
        } else {
            self.pos = name_end;
            (AttributeValue::True, true)
        };
        let span = Span::new(start, self.pos);

        if let Some(directive) = self.parse_directive(name, &value, Span::new(start, name_end))? {
            return Ok(Spanned::new(AttributeKind::Directive(directive), span));
        }

        Ok(Spanned::new(
            AttributeKind::Plain(PlainAttribute {
                name: name.to_string(),
                value,
                double_quotes,
            }),
            span,
        ))
    }

    fn parse_attribute_value(&mut self) -> Result<(AttributeValue, bool), ParseError> {
        if self.at("{{") {
            let tag = self.parse_expression_tag()?;
            return Ok((
                AttributeValue::Parts(vec![AttributeValuePart::ExpressionTag(tag)]),
                true,
            ));
        }

        let Some(quote) = self.rest().chars().next().filter(|c| *c == '"' || *c == '\'') else {
            let rest = self.rest();
            let len = unquoted_value_len(rest);
            if len == 0 {
                return Err(self.error_here("Expected an attribute value"));
            }
            self.pos += len;
            return Ok((
                AttributeValue::Parts(vec![AttributeValuePart::Text(rest[..len].to_string())]),
                true,
            ));
        };

        let open = self.pos;
        self.pos += 1;
        let mut parts = Vec::new();
        let mut text_start = self.pos;
        loop {
            if self.pos >= self.src.len() {
                return Err(ParseError::new(
                    self.src,
                    Span::new(open, self.pos),
                    "Unterminated attribute value",
                ));
            }
            if self.at("{{") {
                if text_start < self.pos {
                    parts.push(AttributeValuePart::Text(
                        self.src[text_start..self.pos].to_string(),
                    ));
                }
                parts.push(AttributeValuePart::ExpressionTag(
                    self.parse_expression_tag()?,
                ));
                text_start = self.pos;
                continue;
            }
            if self.rest().starts_with(quote) {
                if text_start < self.pos || parts.is_empty() {
                    parts.push(AttributeValuePart::Text(
                        self.src[text_start..self.pos].to_string(),
                    ));
                }
                self.pos += 1;
                break;
            }
            self.pos += self.rest().chars().next().map_or(1, char::len_utf8);
        }

        Ok((AttributeValue::Parts(parts), quote == '"'))
    }

    /// Turn `prefix:name|modifier` attributes into directives.
    fn parse_directive(
        &self,
        name: &str,
        value: &AttributeValue,
        name_span: Span,
    ) -> Result<Option<Directive>, ParseError> {
        let Some((prefix, rest)) = name.split_once(':') else {
            return Ok(None);
        };
        let kind = match prefix {
            "class" => DirectiveKind::Class,
            "on" => DirectiveKind::On,
            "use" => DirectiveKind::Use,
            "bind" => DirectiveKind::Bind,
            "transition" => DirectiveKind::Transition(TransitionDirection::Both),
            "in" => DirectiveKind::Transition(TransitionDirection::In),
            "out" => DirectiveKind::Transition(TransitionDirection::Out),
            _ => return Ok(None),
        };

        let mut segments = rest.split('|');
        let directive_name = segments.next().unwrap_or_default().to_string();
        let modifiers = segments.map(str::to_string).collect();

        let expression = match value {
            AttributeValue::True => match kind {
                DirectiveKind::Class | DirectiveKind::Bind => Some(Spanned::new(
                    ExprKind::Identifier(directive_name.clone()),
                    name_span,
                )),
                _ => None,
            },
            AttributeValue::Parts(parts) => match parts.as_slice() {
                [AttributeValuePart::ExpressionTag(tag)] => Some(tag.node.expression.clone()),
                _ => {
                    return Err(ParseError::new(
                        self.src,
                        name_span,
                        "Directive value must be a single expression tag",
                    ));
                }
            },
        };

        Ok(Some(Directive {
            kind,
            name: directive_name,
            modifiers,
            expression,
        }))
    }
}

fn is_zs_script(attributes: &[Attribute]) -> bool {
    attributes.iter().any(|attribute| match &attribute.node {
        AttributeKind::Plain(PlainAttribute {
            name,
            value: AttributeValue::Parts(parts),
            ..
        }) if name == "lang" => {
            matches!(parts.as_slice(), [AttributeValuePart::Text(lang)] if lang == "zs")
        }
        _ => false,
    })
}

fn unquoted_value_len(rest: &str) -> usize {
    for (i, ch) in rest.char_indices() {
        if ch.is_whitespace() || ch == '>' || rest[i..].starts_with("/>") {
            return i;
        }
    }
    rest.len()
}

/// Append `node`, merging it into a preceding text node. Adjacent texts
/// appear when a hoisted construct sat between them.
fn push_node(nodes: &mut Vec<Node>, node: Node) {
    if let (Some(last), NodeKind::Text(data)) = (nodes.last_mut(), &node.node)
        && let NodeKind::Text(previous) = &mut last.node
    {
        previous.push_str(data);
        last.span = last.span.merge(node.span);
        return;
    }
    nodes.push(node);
}
