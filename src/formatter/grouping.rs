//! Expression grouping policy.
//!
//! The tree has no parenthesized-expression node: parentheses are
//! reconstructed at print time from the shape of the tree. A child is
//! wrapped when printing it bare would make the parser build a different
//! tree. The tier table below is also what the expression parser climbs,
//! so the two cannot drift apart.

use crate::ast::{BinaryOperator, Expr, ExprKind, LogicalOperator, UnaryOperator};

/// An operator in binary position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Binary(BinaryOperator),
    Logical(LogicalOperator),
    Is,
    In,
    Range,
}

impl Operator {
    /// Binding strength, lowest first. All tiers are left-associative.
    pub fn tier(self) -> u8 {
        use BinaryOperator::*;

        match self {
            Operator::Logical(LogicalOperator::Or)
            | Operator::Logical(LogicalOperator::PipePipe)
            | Operator::Logical(LogicalOperator::Nullish) => 0,
            Operator::Logical(LogicalOperator::And)
            | Operator::Logical(LogicalOperator::AmpAmp) => 1,
            Operator::Binary(Eq | NotEq | Lt | Gt | LtEq | GtEq) | Operator::Is | Operator::In => 2,
            Operator::Range => 3,
            Operator::Binary(Concat) => 4,
            Operator::Binary(Add | Sub) => 5,
            Operator::Binary(Mul | Div | Rem) => 6,
        }
    }

    /// The binary-position operator of an expression, if it has one.
    pub fn of(kind: &ExprKind) -> Option<Operator> {
        match kind {
            ExprKind::Binary { operator, .. } => Some(Operator::Binary(*operator)),
            ExprKind::Logical { operator, .. } => Some(Operator::Logical(*operator)),
            ExprKind::Is { .. } => Some(Operator::Is),
            ExprKind::In { .. } => Some(Operator::In),
            ExprKind::Range { .. } => Some(Operator::Range),
            _ => None,
        }
    }
}

/// Where a child sits inside its parent expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Left,
    Right,
    Test,
    /// Callee, member object, filter subject or update argument.
    Postfix,
    UnaryArgument,
    ArrowBody,
    /// Anything delimited by brackets, commas or keywords.
    Delimited,
}

fn position_of(child: &Expr, parent: &Expr) -> Position {
    let is = |candidate: &Expr| std::ptr::eq(candidate, child);

    match &parent.node {
        ExprKind::Binary { left, .. }
        | ExprKind::Logical { left, .. }
        | ExprKind::Is { left, .. }
        | ExprKind::In { left, .. } => {
            if is(left) {
                Position::Left
            } else {
                Position::Right
            }
        }
        ExprKind::Range { from, .. } => {
            if is(from) {
                Position::Left
            } else {
                Position::Right
            }
        }
        ExprKind::Conditional { test, .. } if is(test) => Position::Test,
        ExprKind::Member { object, .. } if is(object) => Position::Postfix,
        ExprKind::Call { callee, .. } if is(callee) => Position::Postfix,
        ExprKind::Filter { subject, .. } if is(subject) => Position::Postfix,
        ExprKind::Update { .. } => Position::Postfix,
        ExprKind::Unary { .. } => Position::UnaryArgument,
        ExprKind::ArrowFunction { body, .. } if is(body) => Position::ArrowBody,
        _ => Position::Delimited,
    }
}

/// Whether `child` must be wrapped in parentheses when printed inside
/// `parent`.
pub fn needs_parens(child: &Expr, parent: &Expr) -> bool {
    use ExprKind::*;

    let kind = &child.node;
    match position_of(child, parent) {
        Position::Delimited => false,
        Position::ArrowBody => matches!(kind, Object(_)),
        Position::Test => matches!(kind, Conditional { .. } | Assignment { .. } | ArrowFunction { .. }),
        Position::Postfix => matches!(
            kind,
            Unary { .. }
                | Binary { .. }
                | Logical { .. }
                | Is { .. }
                | In { .. }
                | Range { .. }
                | Conditional { .. }
                | ArrowFunction { .. }
                | Assignment { .. }
                | Update { .. }
        ),
        Position::UnaryArgument => match kind {
            Binary { .. }
            | Logical { .. }
            | Is { .. }
            | In { .. }
            | Range { .. }
            | Conditional { .. }
            | Assignment { .. }
            | ArrowFunction { .. } => true,
            // `- -a` must not print as the decrement `--a`
            Unary {
                operator: UnaryOperator::Minus | UnaryOperator::Plus,
                ..
            }
            | Update { prefix: true, .. } => matches!(
                parent.node,
                Unary {
                    operator: UnaryOperator::Minus | UnaryOperator::Plus,
                    ..
                }
            ),
            _ => false,
        },
        position @ (Position::Left | Position::Right) => {
            if matches!(kind, Conditional { .. } | Assignment { .. } | ArrowFunction { .. }) {
                return true;
            }
            if matches!(kind, Update { .. }) {
                return position == Position::Left;
            }
            let (Some(inner), Some(outer)) = (Operator::of(kind), Operator::of(&parent.node))
            else {
                return false;
            };
            if position == Position::Left {
                inner.tier() < outer.tier()
            } else {
                inner.tier() <= outer.tier()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;

    /// Walks `expr` and collects every child that would be wrapped, printed
    /// through its Debug kind name.
    fn wrapped(src: &str) -> Vec<&'static str> {
        fn name(kind: &ExprKind) -> &'static str {
            match kind {
                ExprKind::Binary { .. } => "binary",
                ExprKind::Logical { .. } => "logical",
                ExprKind::Conditional { .. } => "conditional",
                ExprKind::Unary { .. } => "unary",
                ExprKind::Update { .. } => "update",
                ExprKind::Object(_) => "object",
                ExprKind::Range { .. } => "range",
                _ => "other",
            }
        }

        fn walk(expr: &Expr, out: &mut Vec<&'static str>) {
            let children: Vec<&Expr> = match &expr.node {
                ExprKind::Binary { left, right, .. }
                | ExprKind::Logical { left, right, .. }
                | ExprKind::Is { left, right, .. }
                | ExprKind::In { left, right, .. } => vec![&**left, &**right],
                ExprKind::Range { from, to } => vec![&**from, &**to],
                ExprKind::Unary { argument, .. } | ExprKind::Update { argument, .. } => {
                    vec![&**argument]
                }
                ExprKind::Conditional {
                    test,
                    consequent,
                    alternate,
                } => vec![&**test, &**consequent, &**alternate],
                ExprKind::Member { object, .. } => vec![&**object],
                ExprKind::Call { callee, .. } => vec![&**callee],
                ExprKind::Filter { subject, .. } => vec![&**subject],
                ExprKind::ArrowFunction { body, .. } => vec![&**body],
                _ => vec![],
            };
            for child in children {
                if needs_parens(child, expr) {
                    out.push(name(&child.node));
                }
                walk(child, out);
            }
        }

        let expr = parse_expression(src).unwrap();
        let mut out = Vec::new();
        walk(&expr, &mut out);
        out
    }

    #[test]
    fn tiers_are_ordered() {
        let or = Operator::Logical(LogicalOperator::Or).tier();
        let and = Operator::Logical(LogicalOperator::And).tier();
        let eq = Operator::Binary(BinaryOperator::Eq).tier();
        let range = Operator::Range.tier();
        let concat = Operator::Binary(BinaryOperator::Concat).tier();
        let add = Operator::Binary(BinaryOperator::Add).tier();
        let mul = Operator::Binary(BinaryOperator::Mul).tier();
        assert!(or < and && and < eq && eq < range && range < concat);
        assert!(concat < add && add < mul);
        assert_eq!(Operator::Is.tier(), eq);
        assert_eq!(Operator::In.tier(), eq);
    }

    #[test]
    fn higher_tier_children_are_bare() {
        assert!(wrapped("a + b * c").is_empty());
        assert!(wrapped("a or b and c").is_empty());
        assert!(wrapped("a ~ b + c").is_empty());
    }

    #[test]
    fn lower_tier_children_are_wrapped() {
        assert_eq!(wrapped("(a + b) * c"), vec!["binary"]);
        assert_eq!(wrapped("(a or b) and c"), vec!["logical"]);
        assert_eq!(wrapped("a * (b - c)"), vec!["binary"]);
    }

    #[test]
    fn equal_tier_right_operands_are_wrapped() {
        assert!(wrapped("a - b - c").is_empty());
        assert_eq!(wrapped("a - (b - c)"), vec!["binary"]);
        assert_eq!(wrapped("a - (b + c)"), vec!["binary"]);
    }

    #[test]
    fn postfix_positions() {
        assert_eq!(wrapped("(a + b).c"), vec!["binary"]);
        assert_eq!(wrapped("(-a)|abs"), vec!["unary"]);
        assert!(wrapped("-a|abs").is_empty());
        assert!(wrapped("a.b.c()").is_empty());
    }

    #[test]
    fn conditionals() {
        assert_eq!(wrapped("(a ? b : c) ? d : e"), vec!["conditional"]);
        assert!(wrapped("a ? b : c ? d : e").is_empty());
        assert_eq!(wrapped("'x' ~ (a ? b : c)"), vec!["conditional"]);
    }

    #[test]
    fn unary_arguments() {
        assert_eq!(wrapped("not (a and b)"), vec!["logical"]);
        assert_eq!(wrapped("-(-a)"), vec!["unary"]);
        assert!(wrapped("not not a").is_empty());
    }

    #[test]
    fn object_arrow_body() {
        assert_eq!(wrapped("x => ({ a: x })"), vec!["object"]);
    }

    #[test]
    fn update_as_left_operand() {
        assert_eq!(wrapped("(i++) + 1"), vec!["update"]);
        assert!(wrapped("1 + i++").is_empty());
    }
}
