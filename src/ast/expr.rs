use super::span::Spanned;

pub type Expr = Spanned<ExprKind>;

pub type Statement = Spanned<StatementKind>;

/// A statement of a root-level `<script lang="zs">` block.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// `expression;`
    Expression(Expr),
    /// `{ ... }`
    Block(Vec<Statement>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Bare name: `foo`
    Identifier(String),

    /// `"hello"` or `'hello'`. `raw` keeps the original quotes and escapes.
    StringLiteral { value: String, raw: String },

    /// `42`, `1.5`
    NumericLiteral { value: f64, raw: String },

    BooleanLiteral(bool),

    NullLiteral,

    /// `not a`, `-a`, `+a`
    Unary {
        operator: UnaryOperator,
        argument: Box<Expr>,
    },

    /// Arithmetic, concatenation and comparison: `a + b`, `a ~ b`, `a == b`
    Binary {
        operator: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// `a or b`, `a and b`, `a ?? b`
    Logical {
        operator: LogicalOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Type test: `a is null`, `a is not empty`
    Is {
        left: Box<Expr>,
        not: bool,
        right: Box<Expr>,
    },

    /// Membership test: `a in b`, `a not in b`
    In {
        left: Box<Expr>,
        not: bool,
        right: Box<Expr>,
    },

    /// `test ? consequent : alternate`
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },

    /// `a.b`, `a?.b`, `a[b]`, `a?.[b]`
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
        computed: bool,
        optional: bool,
    },

    /// `f(a, b)`, `f?.(a)`
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
        optional: bool,
    },

    /// Pipe-style call: `subject|name(args)`. The subject is passed to the
    /// filter as its first argument.
    Filter {
        subject: Box<Expr>,
        name: String,
        arguments: Vec<Expr>,
    },

    /// `(a, b) => body`
    ArrowFunction { params: Vec<Expr>, body: Box<Expr> },

    /// `a = b`, `a += b`
    Assignment {
        operator: AssignmentOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// `++a`, `a--`
    Update {
        operator: UpdateOperator,
        prefix: bool,
        argument: Box<Expr>,
    },

    Array(Vec<Expr>),

    Object(Vec<Property>),

    /// `from..to`
    Range { from: Box<Expr>, to: Box<Expr> },
}

impl ExprKind {
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            ExprKind::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

/// A `key: value` entry of an object literal. The key is an identifier,
/// string literal or numeric literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: Expr,
    pub value: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Minus,
    Plus,
}

impl UnaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOperator::Not => "not",
            UnaryOperator::Minus => "-",
            UnaryOperator::Plus => "+",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Comparison
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,

    // Concatenation
    Concat,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperator::Eq => "==",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Gt => ">",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::Concat => "~",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Rem => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    Or,
    And,
    /// `??`
    Nullish,
    /// `||`
    PipePipe,
    /// `&&`
    AmpAmp,
}

impl LogicalOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOperator::Or => "or",
            LogicalOperator::And => "and",
            LogicalOperator::Nullish => "??",
            LogicalOperator::PipePipe => "||",
            LogicalOperator::AmpAmp => "&&",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ConcatAssign,
}

impl AssignmentOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentOperator::Assign => "=",
            AssignmentOperator::AddAssign => "+=",
            AssignmentOperator::SubAssign => "-=",
            AssignmentOperator::MulAssign => "*=",
            AssignmentOperator::DivAssign => "/=",
            AssignmentOperator::ConcatAssign => "~=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOperator {
    Increment,
    Decrement,
}

impl UpdateOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateOperator::Increment => "++",
            UpdateOperator::Decrement => "--",
        }
    }
}
