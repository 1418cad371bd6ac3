/// Parsed contents of a root-level `<style>` block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleSheet {
    pub nodes: Vec<StyleNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StyleNode {
    /// `a, b { ... }`
    Rule(StyleRule),
    /// `color: red !important;`
    Declaration(Declaration),
    /// `@media screen { ... }` or `@import "x";`
    AtRule(AtRule),
    Comment(StyleComment),
}

impl StyleNode {
    /// Nodes of the same kind are laid out without a blank line between
    /// them (except rules, which are always separated).
    pub fn same_kind(&self, other: &StyleNode) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub selectors: Vec<String>,
    pub nodes: Vec<StyleNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub prop: String,
    pub value: String,
    pub important: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    pub name: String,
    pub params: String,
    /// `None` for statement at-rules ending in `;`.
    pub nodes: Option<Vec<StyleNode>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleComment {
    pub text: String,
    /// `// text` rather than `/* text */`.
    pub inline: bool,
}
