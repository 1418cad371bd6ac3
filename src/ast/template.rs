use super::expr::{Expr, Statement};
use super::span::{Span, Spanned};

/// The parsed document.
///
/// Import tags are lifted out of the top-level fragment so they can be
/// printed as a header. A root-level `<script lang="zs">` block is parsed
/// into statements, and a root-level `<style>` block is kept aside as raw
/// code for the style renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Root {
    pub imports: Vec<Spanned<ImportTag>>,
    pub zs: Option<Spanned<ZsScript>>,
    pub fragment: Fragment,
    pub css: Option<Spanned<Style>>,
}

/// An ordered sequence of sibling nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    pub nodes: Vec<Node>,
}

impl Fragment {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }
}

pub type Node = Spanned<NodeKind>;

/// The kinds of content that can appear in a fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Raw text between tags, whitespace included.
    Text(String),

    /// `<!-- data -->`
    Comment(String),

    /// Regular elements, components and special `zvelte:*` elements.
    Element(Element),

    /// `{{ expression }}`
    ExpressionTag(ExpressionTag),

    /// `{{ @html expression }}`
    HtmlTag(Expr),

    /// `{{ @render snippet(args) }}`
    RenderTag(Expr),

    /// `{% set name = value %}`; holds the assignment expression.
    VariableTag(Expr),

    IfBlock(IfBlock),

    ForBlock(ForBlock),

    KeyBlock(KeyBlock),

    SnippetBlock(SnippetBlock),

    AwaitBlock(AwaitBlock),
}

impl NodeKind {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            NodeKind::Text(data) => Some(data),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionTag {
    pub expression: Expr,
}

/// `{% import Name from "source" %}`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportTag {
    pub specifier: String,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Lowercase HTML element.
    Regular,
    /// `<title>` inside the special head element.
    Title,
    /// Capitalized component reference.
    Component,
    /// `<zvelte:self>`
    SpecialSelf,
    /// `<zvelte:head>`
    SpecialHead,
    /// `<zvelte:element this={{ tag }}>`
    SpecialElement,
    /// `<zvelte:component this={{ component }}>`
    SpecialComponent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub kind: ElementKind,
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub fragment: Fragment,
}

pub type Attribute = Spanned<AttributeKind>;

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeKind {
    /// `name`, `name="value"`, `name={{ expr }}` or the `{{ name }}` shorthand.
    Plain(PlainAttribute),
    /// `{{ ...expr }}`
    Spread(Expr),
    Directive(Directive),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlainAttribute {
    pub name: String,
    pub value: AttributeValue,
    /// Quote style used in the source; `true` for double quotes or no quotes.
    pub double_quotes: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Boolean presence: `disabled`
    True,
    Parts(Vec<AttributeValuePart>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValuePart {
    Text(String),
    ExpressionTag(Spanned<ExpressionTag>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub kind: DirectiveKind,
    pub name: String,
    pub modifiers: Vec<String>,
    pub expression: Option<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    Class,
    On,
    Use,
    Bind,
    Transition(TransitionDirection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDirection {
    /// `transition:`
    Both,
    /// `in:`
    In,
    /// `out:`
    Out,
}

/// `{% if %}` with an optional alternate. An `{% elseif %}` is represented
/// as an alternate fragment holding exactly one `IfBlock` with `elseif` set.
#[derive(Debug, Clone, PartialEq)]
pub struct IfBlock {
    pub elseif: bool,
    pub test: Expr,
    pub consequent: Fragment,
    pub alternate: Option<Fragment>,
}

/// `{% for index, context in expression #(key) %}body{% else %}fallback{% endfor %}`
#[derive(Debug, Clone, PartialEq)]
pub struct ForBlock {
    pub index: Option<Expr>,
    pub context: Expr,
    pub expression: Expr,
    pub key: Option<Expr>,
    pub body: Fragment,
    pub fallback: Option<Fragment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyBlock {
    pub expression: Expr,
    pub fragment: Fragment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnippetBlock {
    pub name: String,
    pub parameters: Vec<Expr>,
    pub body: Fragment,
}

/// `{% await expression %}` with any combination of pending, then and catch
/// branches.
#[derive(Debug, Clone, PartialEq)]
pub struct AwaitBlock {
    pub expression: Expr,
    pub value: Option<Expr>,
    pub error: Option<Expr>,
    pub pending: Option<Fragment>,
    pub then: Option<Fragment>,
    pub catch: Option<Fragment>,
}

/// Root-level `<script lang="zs">` block.
#[derive(Debug, Clone, PartialEq)]
pub struct ZsScript {
    pub body: Vec<Statement>,
}

/// Root-level `<style>` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub attributes: Vec<Attribute>,
    pub code: String,
    /// Location of `code` in the source.
    pub code_span: Span,
}
