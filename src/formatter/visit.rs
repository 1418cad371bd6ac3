use crate::ast::{
    Attribute, Expr, Fragment, ImportTag, Node, Property, Root, Spanned, Statement, StyleSheet,
};

use super::script::ScriptFormatter;
use super::state::State;
use super::whitespace::{Cleaned, PaddedText};

/// Everything the formatter can visit.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Root(&'a Root),
    Import(&'a Spanned<ImportTag>),
    Fragment(&'a Fragment),
    Text(PaddedText<'a>),
    Node(&'a Node),
    Attribute(&'a Attribute),
    Expr(&'a Expr),
    Property(&'a Property),
    Statement(&'a Statement),
}

impl<'a> From<Cleaned<'a>> for NodeRef<'a> {
    fn from(cleaned: Cleaned<'a>) -> Self {
        match cleaned {
            Cleaned::Text(text) => NodeRef::Text(text),
            Cleaned::Node(node) => NodeRef::Node(node),
        }
    }
}

/// Walks the tree, rendering into a [`State`].
///
/// The ancestor path is kept so renderers can look at the node they are
/// printed inside of; expression grouping depends on it.
pub struct Formatter<'a> {
    pub(super) state: State<'a>,
    pub(super) script: &'a dyn ScriptFormatter,
    pub(super) stylesheet: Option<&'a StyleSheet>,
    path: Vec<NodeRef<'a>>,
}

impl<'a> Formatter<'a> {
    pub fn new(
        state: State<'a>,
        script: &'a dyn ScriptFormatter,
        stylesheet: Option<&'a StyleSheet>,
    ) -> Self {
        Self {
            state,
            script,
            stylesheet,
            path: Vec::new(),
        }
    }

    pub fn visit(&mut self, node: NodeRef<'a>) {
        self.path.push(node);
        match node {
            NodeRef::Root(root) => self.root(root),
            NodeRef::Import(import) => self.import(&import.node),
            NodeRef::Fragment(fragment) => self.fragment(fragment),
            NodeRef::Text(text) => self.text(text),
            NodeRef::Node(node) => self.node(node),
            NodeRef::Attribute(attribute) => self.attribute(attribute),
            NodeRef::Expr(expr) => self.expression(expr),
            NodeRef::Property(property) => self.property(property),
            NodeRef::Statement(statement) => self.statement(statement),
        }
        self.path.pop();
    }

    pub fn visit_all(&mut self, nodes: impl IntoIterator<Item = impl Into<NodeRef<'a>>>) {
        for node in nodes {
            self.visit(node.into());
        }
    }

    /// The node enclosing the one being rendered.
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        let len = self.path.len();
        len.checked_sub(2).map(|i| self.path[i])
    }

    pub fn finish(self) -> String {
        debug_assert!(self.path.is_empty());
        self.state.finish()
    }
}
