//! Expression parser.
//!
//! A precedence-climbing parser over [`Lexer`] tokens. Binary operator
//! binding strength comes from the same tier table the formatter uses to
//! decide parenthesization, so printing and re-parsing always agree.
//!
//! The parser is also used by the template parser to read the keyword
//! structure of `{% ... %}` tags, which is why it exposes token-level
//! helpers (`eat_punct`, `expect_keyword`, ...).

use crate::ast::{
    AssignmentOperator, BinaryOperator, Expr, ExprKind, LogicalOperator, Property, Span, Spanned,
    Statement, StatementKind, UnaryOperator, UpdateOperator,
};
use crate::error::ParseError;
use crate::formatter::grouping::Operator;

use super::lexer::{Lexer, Token, TokenKind, unquote};

const KEYWORDS: &[&str] = &["and", "or", "not", "in", "is", "true", "false", "null"];

pub(crate) struct ExprParser<'s> {
    src: &'s str,
    lexer: Lexer<'s>,
    current: Token,
    last_end: usize,
}

impl<'s> ExprParser<'s> {
    pub fn new(src: &'s str, pos: usize) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(src, pos);
        let current = lexer.next_token()?;
        Ok(Self {
            src,
            lexer,
            current,
            last_end: pos,
        })
    }

    // -- Token helpers -----------------------------------------------------

    pub fn current(&self) -> Token {
        self.current
    }

    pub fn text(&self, token: Token) -> &'s str {
        &self.src[token.span.start..token.span.end]
    }

    fn advance(&mut self) -> Result<Token, ParseError> {
        let token = self.current;
        self.last_end = token.span.end;
        self.current = self.lexer.next_token()?;
        Ok(token)
    }

    /// Look at the token after the current one without consuming anything.
    fn peek_next(&self) -> Result<Token, ParseError> {
        let mut lookahead = self.lexer;
        lookahead.next_token()
    }

    pub fn at_punct(&self, punct: &str) -> bool {
        self.current.kind == TokenKind::Punct && self.text(self.current) == punct
    }

    pub fn at_keyword(&self, keyword: &str) -> bool {
        self.current.kind == TokenKind::Ident && self.text(self.current) == keyword
    }

    pub fn eat_punct(&mut self, punct: &str) -> Result<bool, ParseError> {
        if self.at_punct(punct) {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn eat_keyword(&mut self, keyword: &str) -> Result<bool, ParseError> {
        if self.at_keyword(keyword) {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn expect_punct(&mut self, punct: &str) -> Result<Token, ParseError> {
        if self.at_punct(punct) {
            return self.advance();
        }
        Err(self.unexpected(&format!("Expected `{punct}`")))
    }

    pub fn expect_keyword(&mut self, keyword: &str) -> Result<Token, ParseError> {
        if self.at_keyword(keyword) {
            return self.advance();
        }
        Err(self.unexpected(&format!("Expected `{keyword}`")))
    }

    /// Consume any identifier, keywords included.
    pub fn expect_name(&mut self) -> Result<(String, Span), ParseError> {
        if self.current.kind == TokenKind::Ident {
            let token = self.advance()?;
            return Ok((self.text(token).to_string(), token.span));
        }
        Err(self.unexpected("Expected an identifier"))
    }

    /// Consume an identifier that is not a reserved word.
    pub fn parse_identifier(&mut self) -> Result<Expr, ParseError> {
        if self.current.kind == TokenKind::Ident && !KEYWORDS.contains(&self.text(self.current)) {
            let token = self.advance()?;
            return Ok(Spanned::new(
                ExprKind::Identifier(self.text(token).to_string()),
                token.span,
            ));
        }
        Err(self.unexpected("Expected an identifier"))
    }

    /// Check for the `}}` closing an expression tag and return the offset
    /// right after it. Both braces must be adjacent; `} }` is an object
    /// literal closing followed by a brace.
    ///
    /// The closing token is never consumed: lexing past it would tokenize
    /// template text.
    pub fn expect_mustache_close(&mut self) -> Result<usize, ParseError> {
        if !self.at_punct("}") {
            return Err(self.unexpected("Expected `}}`"));
        }
        let first = self.current.span;
        if self.src[first.end..].starts_with('}') {
            return Ok(first.end + 1);
        }
        Err(self.unexpected("Expected `}}`"))
    }

    /// Check for the `%}` closing a block tag and return the offset right
    /// after it, without consuming it.
    pub fn expect_tag_close(&self) -> Result<usize, ParseError> {
        if self.at_punct("%}") {
            return Ok(self.current.span.end);
        }
        Err(self.unexpected("Expected `%}`"))
    }

    /// Parse a quoted string and return its decoded value.
    pub fn parse_string(&mut self) -> Result<String, ParseError> {
        if self.current.kind == TokenKind::String {
            let token = self.advance()?;
            return Ok(unquote(self.text(token)));
        }
        Err(self.unexpected("Expected a string"))
    }

    pub fn unexpected(&self, message: &str) -> ParseError {
        let found = match self.current.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("`{}`", self.text(self.current)),
        };
        ParseError::new(self.src, self.current.span, format!("{message}, found {found}"))
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.last_end)
    }

    // -- Expressions -------------------------------------------------------

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        if self.at_arrow_function()? {
            return self.parse_arrow_function();
        }

        let left = self.parse_conditional()?;
        let Some(operator) = self.assignment_operator() else {
            return Ok(left);
        };
        if !matches!(left.node, ExprKind::Identifier(_) | ExprKind::Member { .. }) {
            return Err(ParseError::new(
                self.src,
                left.span,
                "Invalid assignment target",
            ));
        }
        self.advance()?;
        let right = self.parse_assignment()?;
        let span = left.span.merge(right.span);
        Ok(Spanned::new(
            ExprKind::Assignment {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        ))
    }

    fn assignment_operator(&self) -> Option<AssignmentOperator> {
        if self.current.kind != TokenKind::Punct {
            return None;
        }
        Some(match self.text(self.current) {
            "=" => AssignmentOperator::Assign,
            "+=" => AssignmentOperator::AddAssign,
            "-=" => AssignmentOperator::SubAssign,
            "*=" => AssignmentOperator::MulAssign,
            "/=" => AssignmentOperator::DivAssign,
            "~=" => AssignmentOperator::ConcatAssign,
            _ => return None,
        })
    }

    /// `x => ...`, `() => ...` or `(a, b) => ...`
    fn at_arrow_function(&self) -> Result<bool, ParseError> {
        let mut lookahead = self.lexer;
        if self.current.kind == TokenKind::Ident {
            let next = lookahead.next_token()?;
            return Ok(next.kind == TokenKind::Punct && self.text(next) == "=>");
        }
        if !self.at_punct("(") {
            return Ok(false);
        }

        let mut expect_param = true;
        loop {
            let token = lookahead.next_token()?;
            let text = self.text(token);
            match token.kind {
                TokenKind::Ident if expect_param && !KEYWORDS.contains(&text) => {
                    expect_param = false;
                }
                TokenKind::Punct if text == "," && !expect_param => expect_param = true,
                TokenKind::Punct if text == ")" => break,
                _ => return Ok(false),
            }
        }
        let next = lookahead.next_token()?;
        Ok(next.kind == TokenKind::Punct && self.text(next) == "=>")
    }

    fn parse_arrow_function(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span.start;
        let mut params = Vec::new();
        if self.eat_punct("(")? {
            while !self.at_punct(")") {
                params.push(self.parse_identifier()?);
                if !self.eat_punct(",")? {
                    break;
                }
            }
            self.expect_punct(")")?;
        } else {
            params.push(self.parse_identifier()?);
        }
        self.expect_punct("=>")?;
        let body = self.parse_assignment()?;
        Ok(Spanned::new(
            ExprKind::ArrowFunction {
                params,
                body: Box::new(body),
            },
            self.span_from(start),
        ))
    }

    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let test = self.parse_binary(0)?;
        if !self.eat_punct("?")? {
            return Ok(test);
        }
        let consequent = self.parse_assignment()?;
        self.expect_punct(":")?;
        let alternate = self.parse_assignment()?;
        let span = test.span.merge(alternate.span);
        Ok(Spanned::new(
            ExprKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            span,
        ))
    }

    /// The binary-position operator at the cursor, with the number of
    /// tokens it spans (`not in` and `is not` are two).
    fn binary_operator(&self) -> Result<Option<Operator>, ParseError> {
        let text = self.text(self.current);
        let operator = match self.current.kind {
            TokenKind::Ident => match text {
                "or" => Operator::Logical(LogicalOperator::Or),
                "and" => Operator::Logical(LogicalOperator::And),
                "in" => Operator::In,
                "is" => Operator::Is,
                "not" => {
                    let next = self.peek_next()?;
                    if next.kind == TokenKind::Ident && self.text(next) == "in" {
                        Operator::In
                    } else {
                        return Ok(None);
                    }
                }
                _ => return Ok(None),
            },
            TokenKind::Punct => match text {
                "||" => Operator::Logical(LogicalOperator::PipePipe),
                "&&" => Operator::Logical(LogicalOperator::AmpAmp),
                "??" => Operator::Logical(LogicalOperator::Nullish),
                "==" => Operator::Binary(BinaryOperator::Eq),
                "!=" => Operator::Binary(BinaryOperator::NotEq),
                "<" => Operator::Binary(BinaryOperator::Lt),
                ">" => Operator::Binary(BinaryOperator::Gt),
                "<=" => Operator::Binary(BinaryOperator::LtEq),
                ">=" => Operator::Binary(BinaryOperator::GtEq),
                ".." => Operator::Range,
                "~" => Operator::Binary(BinaryOperator::Concat),
                "+" => Operator::Binary(BinaryOperator::Add),
                "-" => Operator::Binary(BinaryOperator::Sub),
                "*" => Operator::Binary(BinaryOperator::Mul),
                "/" => Operator::Binary(BinaryOperator::Div),
                "%" => Operator::Binary(BinaryOperator::Rem),
                _ => return Ok(None),
            },
            _ => return Ok(None),
        };
        Ok(Some(operator))
    }

    fn parse_binary(&mut self, min_tier: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        while let Some(operator) = self.binary_operator()? {
            let tier = operator.tier();
            if tier < min_tier {
                break;
            }

            let mut not = self.eat_keyword("not")?;
            self.advance()?;
            if operator == Operator::Is {
                not = self.eat_keyword("not")?;
            }

            let right = self.parse_binary(tier + 1)?;
            let span = left.span.merge(right.span);
            let (left_box, right_box) = (Box::new(left), Box::new(right));
            let kind = match operator {
                Operator::Binary(operator) => ExprKind::Binary {
                    operator,
                    left: left_box,
                    right: right_box,
                },
                Operator::Logical(operator) => ExprKind::Logical {
                    operator,
                    left: left_box,
                    right: right_box,
                },
                Operator::Is => ExprKind::Is {
                    left: left_box,
                    not,
                    right: right_box,
                },
                Operator::In => ExprKind::In {
                    left: left_box,
                    not,
                    right: right_box,
                },
                Operator::Range => ExprKind::Range {
                    from: left_box,
                    to: right_box,
                },
            };
            left = Spanned::new(kind, span);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span.start;

        let operator = if self.at_keyword("not") {
            Some(UnaryOperator::Not)
        } else if self.at_punct("-") {
            Some(UnaryOperator::Minus)
        } else if self.at_punct("+") {
            Some(UnaryOperator::Plus)
        } else {
            None
        };
        if let Some(operator) = operator {
            self.advance()?;
            let argument = self.parse_unary()?;
            return Ok(Spanned::new(
                ExprKind::Unary {
                    operator,
                    argument: Box::new(argument),
                },
                self.span_from(start),
            ));
        }

        if let Some(operator) = self.update_operator() {
            self.advance()?;
            let argument = self.parse_postfix()?;
            return Ok(Spanned::new(
                ExprKind::Update {
                    operator,
                    prefix: true,
                    argument: Box::new(argument),
                },
                self.span_from(start),
            ));
        }

        self.parse_postfix()
    }

    fn update_operator(&self) -> Option<UpdateOperator> {
        if self.at_punct("++") {
            Some(UpdateOperator::Increment)
        } else if self.at_punct("--") {
            Some(UpdateOperator::Decrement)
        } else {
            None
        }
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span.start;
        let mut expr = self.parse_primary()?;

        loop {
            let kind = if self.eat_punct(".")? {
                let property = self.parse_property_name()?;
                ExprKind::Member {
                    object: Box::new(expr),
                    property: Box::new(property),
                    computed: false,
                    optional: false,
                }
            } else if self.eat_punct("?.")? {
                if self.eat_punct("(")? {
                    let arguments = self.parse_arguments()?;
                    ExprKind::Call {
                        callee: Box::new(expr),
                        arguments,
                        optional: true,
                    }
                } else if self.eat_punct("[")? {
                    let property = self.parse_expression()?;
                    self.expect_punct("]")?;
                    ExprKind::Member {
                        object: Box::new(expr),
                        property: Box::new(property),
                        computed: true,
                        optional: true,
                    }
                } else {
                    let property = self.parse_property_name()?;
                    ExprKind::Member {
                        object: Box::new(expr),
                        property: Box::new(property),
                        computed: false,
                        optional: true,
                    }
                }
            } else if self.eat_punct("[")? {
                let property = self.parse_expression()?;
                self.expect_punct("]")?;
                ExprKind::Member {
                    object: Box::new(expr),
                    property: Box::new(property),
                    computed: true,
                    optional: false,
                }
            } else if self.eat_punct("(")? {
                let arguments = self.parse_arguments()?;
                ExprKind::Call {
                    callee: Box::new(expr),
                    arguments,
                    optional: false,
                }
            } else if self.eat_punct("|")? {
                let (name, _) = self.expect_name()?;
                let arguments = if self.eat_punct("(")? {
                    self.parse_arguments()?
                } else {
                    Vec::new()
                };
                ExprKind::Filter {
                    subject: Box::new(expr),
                    name,
                    arguments,
                }
            } else if let Some(operator) = self.update_operator() {
                self.advance()?;
                let kind = ExprKind::Update {
                    operator,
                    prefix: false,
                    argument: Box::new(expr),
                };
                return Ok(Spanned::new(kind, self.span_from(start)));
            } else {
                break;
            };
            expr = Spanned::new(kind, self.span_from(start));
        }

        Ok(expr)
    }

    /// Dotted member names may be reserved words: `loop.index`, `a.is`.
    fn parse_property_name(&mut self) -> Result<Expr, ParseError> {
        let (name, span) = self.expect_name()?;
        Ok(Spanned::new(ExprKind::Identifier(name), span))
    }

    /// Arguments after an already consumed `(`, up to and including `)`.
    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut arguments = Vec::new();
        while !self.at_punct(")") {
            arguments.push(self.parse_expression()?);
            if !self.eat_punct(",")? {
                break;
            }
        }
        self.expect_punct(")")?;
        Ok(arguments)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.current;
        let text = self.text(token);

        match token.kind {
            TokenKind::Number => {
                self.advance()?;
                let value = text.parse::<f64>().map_err(|_| {
                    ParseError::new(self.src, token.span, format!("Invalid number `{text}`"))
                })?;
                Ok(Spanned::new(
                    ExprKind::NumericLiteral {
                        value,
                        raw: text.to_string(),
                    },
                    token.span,
                ))
            }
            TokenKind::String => {
                self.advance()?;
                Ok(Spanned::new(
                    ExprKind::StringLiteral {
                        value: unquote(text),
                        raw: text.to_string(),
                    },
                    token.span,
                ))
            }
            TokenKind::Ident => match text {
                "true" | "false" => {
                    self.advance()?;
                    Ok(Spanned::new(
                        ExprKind::BooleanLiteral(text == "true"),
                        token.span,
                    ))
                }
                "null" => {
                    self.advance()?;
                    Ok(Spanned::new(ExprKind::NullLiteral, token.span))
                }
                _ => self.parse_identifier(),
            },
            TokenKind::Punct => match text {
                "(" => {
                    self.advance()?;
                    let expr = self.parse_expression()?;
                    self.expect_punct(")")?;
                    Ok(expr)
                }
                "[" => self.parse_array(),
                "{" => self.parse_object(),
                _ => Err(self.unexpected("Expected an expression")),
            },
            TokenKind::Eof => Err(self.unexpected("Expected an expression")),
        }
    }

    // -- Statements --------------------------------------------------------

    /// Statements up to the end of input, or up to the `}` closing a block
    /// when `nested`. Stray semicolons are skipped.
    fn parse_statements(&mut self, nested: bool) -> Result<Vec<Statement>, ParseError> {
        let mut body = Vec::new();
        loop {
            if self.current.kind == TokenKind::Eof {
                if nested {
                    return Err(self.unexpected("Expected `}`"));
                }
                break;
            }
            if nested && self.at_punct("}") {
                break;
            }
            if self.eat_punct(";")? {
                continue;
            }
            body.push(self.parse_statement()?);
        }
        Ok(body)
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.current.span.start;

        if self.eat_punct("{")? {
            let body = self.parse_statements(true)?;
            self.expect_punct("}")?;
            return Ok(Spanned::new(
                StatementKind::Block(body),
                self.span_from(start),
            ));
        }

        let expression = self.parse_expression()?;
        // the semicolon may only be left out before `}` or the end
        if !self.eat_punct(";")? && !self.at_punct("}") && self.current.kind != TokenKind::Eof {
            return Err(self.unexpected("Expected `;`"));
        }
        Ok(Spanned::new(
            StatementKind::Expression(expression),
            self.span_from(start),
        ))
    }

    fn parse_array(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect_punct("[")?.span.start;
        let mut elements = Vec::new();
        while !self.at_punct("]") {
            elements.push(self.parse_expression()?);
            if !self.eat_punct(",")? {
                break;
            }
        }
        self.expect_punct("]")?;
        Ok(Spanned::new(ExprKind::Array(elements), self.span_from(start)))
    }

    fn parse_object(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect_punct("{")?.span.start;
        let mut properties = Vec::new();
        while !self.at_punct("}") {
            let key = match self.current.kind {
                TokenKind::Ident => {
                    let (name, span) = self.expect_name()?;
                    Spanned::new(ExprKind::Identifier(name), span)
                }
                TokenKind::String | TokenKind::Number => self.parse_primary()?,
                _ => return Err(self.unexpected("Expected a property name")),
            };
            self.expect_punct(":")?;
            let value = self.parse_expression()?;
            properties.push(Property { key, value });
            if !self.eat_punct(",")? {
                break;
            }
        }
        self.expect_punct("}")?;
        Ok(Spanned::new(
            ExprKind::Object(properties),
            self.span_from(start),
        ))
    }
}

/// Parse the statements of a script body found at `span` in `source`.
///
/// Offsets in the result, and in errors, are document offsets.
pub fn parse_script(source: &str, span: Span) -> Result<Vec<Statement>, ParseError> {
    let mut parser = ExprParser::new(&source[..span.end], span.start)?;
    parser.parse_statements(false)
}

/// Parse a standalone expression; the whole input must be consumed.
pub fn parse_expression(source: &str) -> Result<Expr, ParseError> {
    let mut parser = ExprParser::new(source, 0)?;
    let expr = parser.parse_expression()?;
    if parser.current().kind != TokenKind::Eof {
        return Err(parser.unexpected("Unexpected token after expression"));
    }
    Ok(expr)
}
