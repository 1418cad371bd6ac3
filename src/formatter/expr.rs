//! Renderers for expressions.

use crate::ast::{Expr, ExprKind, Property, Statement, StatementKind, UnaryOperator};
use crate::parser::lexer::is_identifier;

use super::grouping::needs_parens;
use super::visit::{Formatter, NodeRef};

impl<'a> Formatter<'a> {
    pub(super) fn expression(&mut self, expr: &'a Expr) {
        let group = matches!(self.parent(), Some(NodeRef::Expr(parent)) if needs_parens(expr, parent));

        if group {
            self.state.add("(");
        }
        self.expression_kind(expr);
        if group {
            self.state.add(")");
        }
    }

    fn expression_kind(&mut self, expr: &'a Expr) {
        match &expr.node {
            ExprKind::Identifier(name) => self.state.add(name),
            ExprKind::StringLiteral { raw, .. } => self.state.add(raw),
            ExprKind::NumericLiteral { value, .. } => self.state.add(&format_number(*value)),
            ExprKind::BooleanLiteral(value) => self.state.add(if *value { "true" } else { "false" }),
            ExprKind::NullLiteral => self.state.add("null"),
            ExprKind::Unary { operator, argument } => {
                self.state.add(operator.as_str());
                if *operator == UnaryOperator::Not {
                    self.state.add(" ");
                }
                self.visit(NodeRef::Expr(argument));
            }
            ExprKind::Binary {
                operator,
                left,
                right,
            } => self.infix(left, operator.as_str(), right),
            ExprKind::Logical {
                operator,
                left,
                right,
            } => self.infix(left, operator.as_str(), right),
            ExprKind::Is { left, not, right } => {
                self.infix(left, if *not { "is not" } else { "is" }, right)
            }
            ExprKind::In { left, not, right } => {
                self.infix(left, if *not { "not in" } else { "in" }, right)
            }
            ExprKind::Assignment {
                operator,
                left,
                right,
            } => self.infix(left, operator.as_str(), right),
            ExprKind::Range { from, to } => {
                self.visit(NodeRef::Expr(from));
                self.state.add("..");
                self.visit(NodeRef::Expr(to));
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => self.conditional(test, consequent, alternate),
            ExprKind::Member {
                object,
                property,
                computed,
                optional,
            } => {
                self.visit(NodeRef::Expr(object));
                if *optional {
                    self.state.add("?.");
                }
                if *computed {
                    self.state.add("[");
                    self.visit(NodeRef::Expr(property));
                    self.state.add("]");
                } else {
                    if !*optional {
                        self.state.add(".");
                    }
                    self.visit(NodeRef::Expr(property));
                }
            }
            ExprKind::Call {
                callee,
                arguments,
                optional,
            } => {
                self.visit(NodeRef::Expr(callee));
                if *optional {
                    self.state.add("?.");
                }
                self.state.add("(");
                self.comma_separated(arguments);
                self.state.add(")");
            }
            ExprKind::Filter {
                subject,
                name,
                arguments,
            } => {
                self.visit(NodeRef::Expr(subject));
                self.state.add("|");
                self.state.add(name);
                if !arguments.is_empty() {
                    self.state.add("(");
                    self.comma_separated(arguments);
                    self.state.add(")");
                }
            }
            ExprKind::ArrowFunction { params, body } => {
                self.state.add("(");
                self.comma_separated(params);
                self.state.add(") => ");
                self.visit(NodeRef::Expr(body));
            }
            ExprKind::Update {
                operator,
                prefix,
                argument,
            } => {
                if *prefix {
                    self.state.add(operator.as_str());
                }
                self.visit(NodeRef::Expr(argument));
                if !*prefix {
                    self.state.add(operator.as_str());
                }
            }
            ExprKind::Array(elements) => {
                let items = elements
                    .iter()
                    .map(|element| (element.start(), NodeRef::Expr(element)))
                    .collect();
                self.collection(expr.start(), items, "[", "]", false);
            }
            ExprKind::Object(properties) => {
                let items = properties
                    .iter()
                    .map(|property| (property.key.start(), NodeRef::Property(property)))
                    .collect();
                self.collection(expr.start(), items, "{", "}", true);
            }
        }
    }

    fn infix(&mut self, left: &'a Expr, operator: &str, right: &'a Expr) {
        self.visit(NodeRef::Expr(left));
        self.state.add(" ");
        self.state.add(operator);
        self.state.add(" ");
        self.visit(NodeRef::Expr(right));
    }

    /// Ternaries stay multi-line when the source breaks between the test
    /// and the consequent.
    fn conditional(&mut self, test: &'a Expr, consequent: &'a Expr, alternate: &'a Expr) {
        let multiline = self.state.has_nl(test.end(), consequent.start());

        self.visit(NodeRef::Expr(test));
        if multiline {
            self.state.indent();
            self.state.nl();
        } else {
            self.state.add(" ");
        }
        self.state.add("? ");
        self.visit(NodeRef::Expr(consequent));

        if multiline {
            self.state.nl();
        } else {
            self.state.add(" ");
        }
        self.state.add(": ");
        self.visit(NodeRef::Expr(alternate));
        if multiline {
            self.state.dedent();
        }
    }

    /// Arrays and objects: one entry per line with trailing commas when the
    /// source breaks after the opening bracket, otherwise on one line.
    fn collection(
        &mut self,
        start: usize,
        items: Vec<(usize, NodeRef<'a>)>,
        open: &str,
        close: &str,
        padded: bool,
    ) {
        let Some((first_start, _)) = items.first() else {
            self.state.add(open);
            self.state.add(close);
            return;
        };

        if self.state.has_nl(start + 1, *first_start) {
            self.state.add(open);
            self.state.indent();
            for (_, item) in items {
                self.state.nl();
                self.visit(item);
                self.state.add(",");
            }
            self.state.dedent();
            self.state.nl();
            self.state.add(close);
            return;
        }

        self.state.add(open);
        if padded {
            self.state.add(" ");
        }
        for (i, (_, item)) in items.into_iter().enumerate() {
            if i > 0 {
                self.state.add(", ");
            }
            self.visit(item);
        }
        if padded {
            self.state.add(" ");
        }
        self.state.add(close);
    }

    pub(super) fn property(&mut self, property: &'a Property) {
        match &property.key.node {
            ExprKind::StringLiteral { value, .. } if is_identifier(value) => self.state.add(value),
            ExprKind::StringLiteral { raw, .. } => self.state.add(raw),
            ExprKind::NumericLiteral { value, .. } => self.state.add(&format_number(*value)),
            ExprKind::Identifier(name) => self.state.add(name),
            _ => self.visit(NodeRef::Expr(&property.key)),
        }
        self.state.add(": ");
        self.visit(NodeRef::Expr(&property.value));
    }

    /// A root script statement: `expression;` or a `{ ... }` block with one
    /// statement per line.
    pub(super) fn statement(&mut self, statement: &'a Statement) {
        match &statement.node {
            StatementKind::Expression(expression) => {
                self.visit(NodeRef::Expr(expression));
                self.state.add(";");
            }
            StatementKind::Block(body) => {
                self.state.add("{");
                if !body.is_empty() {
                    self.state.indent();
                    for statement in body {
                        self.state.nl();
                        self.visit(NodeRef::Statement(statement));
                    }
                    self.state.dedent();
                    self.state.nl();
                }
                self.state.add("}");
            }
        }
    }
}

/// Canonical decimal form: integral values print without a fraction.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::format_number;

    #[test]
    fn numbers_print_canonically() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1.50), "1.5");
        assert_eq!(format_number(100.0), "100");
    }
}
