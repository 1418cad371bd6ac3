//! Renderers for template nodes.

use tracing::trace;

use crate::ast::{
    Attribute, AttributeKind, AttributeValue, AttributeValuePart, AwaitBlock, Directive,
    DirectiveKind, Element, ElementKind, Expr, ExpressionTag, ForBlock, Fragment, IfBlock,
    ImportTag, Node, NodeKind, PlainAttribute, Root, Spanned, Style, TransitionDirection, ZsScript,
};
use crate::parser::VOID_ELEMENTS;

use super::style::render_stylesheet;
use super::visit::{Formatter, NodeRef};
use super::whitespace::{PaddedText, clean_nodes};

impl<'a> Formatter<'a> {
    pub(super) fn root(&mut self, root: &'a Root) {
        for import in &root.imports {
            self.visit(NodeRef::Import(import));
            self.state.nl();
        }

        let cleaned = clean_nodes(&root.fragment.nodes, true);

        if let Some(zs) = &root.zs {
            self.zs_script(&zs.node);
            if !cleaned.is_empty() {
                self.state.nls(2);
            }
        }

        if !cleaned.is_empty() {
            if !root.imports.is_empty() && root.zs.is_none() {
                self.state.nl();
            }
            self.visit_all(cleaned.iter().copied());
        }

        if let Some(css) = &root.css {
            if !cleaned.is_empty() || root.zs.is_some() {
                self.state.nls(2);
            } else if !root.imports.is_empty() {
                self.state.nl();
            }
            self.style(&css.node);
        }
    }

    /// `<script lang="zs">` with one statement per line.
    fn zs_script(&mut self, script: &'a ZsScript) {
        self.state.add("<script lang=\"zs\">");
        if !script.body.is_empty() {
            self.state.indent();
            for statement in &script.body {
                self.state.nl();
                self.visit(NodeRef::Statement(statement));
            }
            self.state.dedent();
            self.state.nl();
        }
        self.state.add("</script>");
    }

    fn style(&mut self, style: &'a Style) {
        self.state.add("<style");
        for attribute in &style.attributes {
            self.state.add(" ");
            self.visit(NodeRef::Attribute(attribute));
        }
        self.state.add(">");

        if let Some(sheet) = self.stylesheet
            && !sheet.nodes.is_empty()
        {
            trace!(nodes = sheet.nodes.len(), "rendering stylesheet");
            self.state.nl();
            self.state.indent();
            render_stylesheet(&mut self.state, sheet);
            self.state.dedent();
            self.state.nl();
        }

        self.state.add("</style>");
    }

    pub(super) fn import(&mut self, import: &ImportTag) {
        let source = import.source.replace('"', "\\\"");
        self.state.add(&format!(
            "{{% import {} from \"{source}\" %}}",
            import.specifier
        ));
    }

    pub(super) fn fragment(&mut self, fragment: &'a Fragment) {
        let cleaned = clean_nodes(&fragment.nodes, false);
        if cleaned.is_empty() {
            return;
        }

        self.state.indent();
        self.visit_all(cleaned);
        self.state.dedent();
    }

    pub(super) fn text(&mut self, text: PaddedText<'a>) {
        self.state.add(text.leading.as_str());
        self.state.add(text.data);
        self.state.add(text.trailing.as_str());
    }

    pub(super) fn node(&mut self, node: &'a Node) {
        match &node.node {
            NodeKind::Text(data) => self.state.add(data),
            NodeKind::Comment(data) => {
                self.state.add(&format!("<!-- {} -->", data.trim()));
            }
            NodeKind::Element(element) => match element.kind {
                ElementKind::Regular => self.regular_element(node.start(), element),
                ElementKind::Title => self.title_element(node.start(), element),
                ElementKind::Component
                | ElementKind::SpecialSelf
                | ElementKind::SpecialHead
                | ElementKind::SpecialElement
                | ElementKind::SpecialComponent => self.element_like(node.start(), element),
            },
            NodeKind::ExpressionTag(tag) => self.expression_tag(node.start(), tag),
            NodeKind::HtmlTag(expression) => {
                self.state.add("{{ @html ");
                self.visit(NodeRef::Expr(expression));
                self.state.add(" }}");
            }
            NodeKind::RenderTag(expression) => {
                self.state.add("{{ @render ");
                self.visit(NodeRef::Expr(expression));
                self.state.add(" }}");
            }
            NodeKind::VariableTag(assignment) => {
                self.state.add("{% set ");
                self.visit(NodeRef::Expr(assignment));
                self.state.add(" %}");
            }
            NodeKind::IfBlock(block) => self.if_block(block),
            NodeKind::ForBlock(block) => self.for_block(block),
            NodeKind::KeyBlock(block) => {
                self.state.add("{% key ");
                self.visit(NodeRef::Expr(&block.expression));
                self.state.add(" %}");
                self.visit(NodeRef::Fragment(&block.fragment));
                self.state.add("{% endkey %}");
            }
            NodeKind::SnippetBlock(block) => {
                self.state.add(&format!("{{% snippet {}(", block.name));
                self.comma_separated(&block.parameters);
                self.state.add(") %}");
                self.visit(NodeRef::Fragment(&block.body));
                self.state.add("{% endsnippet %}");
            }
            NodeKind::AwaitBlock(block) => self.await_block(block),
        }
    }

    /// `{{ expression }}`, kept multi-line when the source breaks the line
    /// right after the opening braces.
    pub(super) fn expression_tag(&mut self, start: usize, tag: &'a ExpressionTag) {
        let multiline = self.state.has_nl(start + 2, tag.expression.start());

        self.state.add("{{");
        if multiline {
            self.state.nl();
            self.state.indent();
        } else {
            self.state.add(" ");
        }

        self.visit(NodeRef::Expr(&tag.expression));

        if multiline {
            self.state.dedent();
            self.state.nl();
        } else {
            self.state.add(" ");
        }
        self.state.add("}}");
    }

    pub(super) fn comma_separated(&mut self, expressions: &'a [Expr]) {
        for (i, expression) in expressions.iter().enumerate() {
            if i > 0 {
                self.state.add(", ");
            }
            self.visit(NodeRef::Expr(expression));
        }
    }

    // -- Elements ------------------------------------------------------------

    fn regular_element(&mut self, start: usize, element: &'a Element) {
        self.state.add(&format!("<{}", element.name));
        let wrapped = self.attributes(start, element);

        if VOID_ELEMENTS.contains(element.name.to_ascii_lowercase().as_str()) {
            if !wrapped {
                self.state.add(" ");
            }
            self.state.add("/>");
            return;
        }

        self.state.add(">");

        match element.fragment.nodes.first() {
            Some(Spanned {
                node: NodeKind::Text(code),
                ..
            }) if element.name == "script" => self.script_body(code),
            _ => self.visit(NodeRef::Fragment(&element.fragment)),
        }

        self.state.add(&format!("</{}>", element.name));
    }

    fn script_body(&mut self, code: &str) {
        if code.trim().is_empty() {
            return;
        }

        let formatted = self.script.format(code);
        trace!(lines = formatted.lines().count(), "re-indenting script");

        self.state.nl();
        self.state.indent();
        for line in formatted.lines() {
            self.state.add(line);
            self.state.nl();
        }
        self.state.dedent();
    }

    fn title_element(&mut self, start: usize, element: &'a Element) {
        self.state.add("<title");
        self.attributes(start, element);
        self.state.add(">");
        self.visit(NodeRef::Fragment(&element.fragment));
        self.state.add("</title>");
    }

    /// Components and special elements self-close when they have no
    /// content.
    fn element_like(&mut self, start: usize, element: &'a Element) {
        self.state.add(&format!("<{}", element.name));
        let wrapped = self.attributes(start, element);

        let cleaned = clean_nodes(&element.fragment.nodes, false);
        if cleaned.is_empty() {
            if !wrapped {
                self.state.add(" ");
            }
            self.state.add("/>");
            return;
        }

        self.state.add(">");
        self.state.indent();
        self.visit_all(cleaned);
        self.state.dedent();
        self.state.add(&format!("</{}>", element.name));
    }

    /// Render the attribute list, one per line if the source put a line
    /// break before the first attribute. Returns whether it wrapped.
    fn attributes(&mut self, start: usize, element: &'a Element) -> bool {
        let Some(first) = element.attributes.first() else {
            return false;
        };

        let wrap = self
            .state
            .has_nl(start + element.name.len() + 1, first.start());
        if wrap {
            self.state.indent();
        }

        let mut previous: Option<&Attribute> = None;
        for attribute in &element.attributes {
            if wrap {
                let blank = previous
                    .is_some_and(|prev| self.state.has_nls(prev.end(), attribute.start(), 2));
                self.state.nls(if blank { 2 } else { 1 });
            } else {
                self.state.add(" ");
            }
            self.visit(NodeRef::Attribute(attribute));
            previous = Some(attribute);
        }

        if wrap {
            self.state.dedent();
            self.state.nl();
        }
        wrap
    }

    pub(super) fn attribute(&mut self, attribute: &'a Attribute) {
        match &attribute.node {
            AttributeKind::Plain(plain) => self.plain_attribute(plain),
            AttributeKind::Spread(expression) => {
                self.state.add("{{ ...");
                self.visit(NodeRef::Expr(expression));
                self.state.add(" }}");
            }
            AttributeKind::Directive(directive) => self.directive(directive),
        }
    }

    fn plain_attribute(&mut self, attribute: &'a PlainAttribute) {
        let AttributeValue::Parts(parts) = &attribute.value else {
            self.state.add(&attribute.name);
            return;
        };

        if let [AttributeValuePart::ExpressionTag(tag)] = parts.as_slice()
            && tag.node.expression.node.as_identifier() == Some(attribute.name.as_str())
        {
            self.state.add(&format!("{{{{ {} }}}}", attribute.name));
            return;
        }

        self.state.add(&attribute.name);
        self.state.add("=");

        let quoted = !matches!(parts.as_slice(), [AttributeValuePart::ExpressionTag(_)]);
        let text_contains = |c: char| {
            parts
                .iter()
                .any(|part| matches!(part, AttributeValuePart::Text(data) if data.contains(c)))
        };
        // unquoted source values may hold `"`
        let quote = match parts.as_slice() {
            _ if text_contains('"') && !text_contains('\'') => "'",
            _ if attribute.double_quotes => "\"",
            [AttributeValuePart::Text(data)] if !data.contains('"') => "\"",
            _ => "'",
        };

        if quoted {
            self.state.add(quote);
        }
        for part in parts {
            match part {
                AttributeValuePart::Text(data) => self.state.add(data),
                AttributeValuePart::ExpressionTag(tag) => {
                    self.expression_tag(tag.start(), &tag.node)
                }
            }
        }
        if quoted {
            self.state.add(quote);
        }
    }

    fn directive(&mut self, directive: &'a Directive) {
        let prefix = match directive.kind {
            DirectiveKind::Class => "class:",
            DirectiveKind::On => "on:",
            DirectiveKind::Use => "use:",
            DirectiveKind::Bind => "bind:",
            DirectiveKind::Transition(TransitionDirection::Both) => "transition:",
            DirectiveKind::Transition(TransitionDirection::In) => "in:",
            DirectiveKind::Transition(TransitionDirection::Out) => "out:",
        };
        self.state.add(prefix);
        self.state.add(&directive.name);
        for modifier in &directive.modifiers {
            self.state.add("|");
            self.state.add(modifier);
        }

        let Some(expression) = &directive.expression else {
            return;
        };
        let implicit = matches!(directive.kind, DirectiveKind::Class | DirectiveKind::Bind)
            && expression.node.as_identifier() == Some(directive.name.as_str());
        if !implicit {
            self.state.add("={{ ");
            self.visit(NodeRef::Expr(expression));
            self.state.add(" }}");
        }
    }

    // -- Blocks --------------------------------------------------------------

    fn if_block(&mut self, block: &'a IfBlock) {
        self.state.add(if block.elseif { "{% elseif " } else { "{% if " });
        self.visit(NodeRef::Expr(&block.test));
        self.state.add(" %}");
        self.visit(NodeRef::Fragment(&block.consequent));

        if let Some(alternate) = &block.alternate {
            match alternate.nodes.as_slice() {
                [
                    nested @ Spanned {
                        node: NodeKind::IfBlock(IfBlock { elseif: true, .. }),
                        ..
                    },
                ] => self.visit(NodeRef::Node(nested)),
                _ => {
                    self.state.add("{% else %}");
                    self.visit(NodeRef::Fragment(alternate));
                }
            }
        }

        if !block.elseif {
            self.state.add("{% endif %}");
        }
    }

    fn for_block(&mut self, block: &'a ForBlock) {
        self.state.add("{% for ");
        if let Some(index) = &block.index {
            self.visit(NodeRef::Expr(index));
            self.state.add(", ");
        }
        self.visit(NodeRef::Expr(&block.context));
        self.state.add(" in ");
        self.visit(NodeRef::Expr(&block.expression));
        if let Some(key) = &block.key {
            self.state.add(" #(");
            self.visit(NodeRef::Expr(key));
            self.state.add(")");
        }
        self.state.add(" %}");

        self.visit(NodeRef::Fragment(&block.body));

        if let Some(fallback) = &block.fallback {
            self.state.add("{% else %}");
            self.visit(NodeRef::Fragment(fallback));
        }

        self.state.add("{% endfor %}");
    }

    fn await_block(&mut self, block: &'a AwaitBlock) {
        self.state.add("{% await ");
        self.visit(NodeRef::Expr(&block.expression));

        let Some(pending) = &block.pending else {
            // short form: the first branch lives in the opening tag
            if let Some(then) = &block.then {
                self.await_branch_head(" then", block.value.as_ref());
                self.visit(NodeRef::Fragment(then));
                if let Some(catch) = &block.catch {
                    self.await_branch("{% catch", block.error.as_ref(), catch);
                }
            } else if let Some(catch) = &block.catch {
                self.await_branch_head(" catch", block.error.as_ref());
                self.visit(NodeRef::Fragment(catch));
            } else {
                self.state.add(" %}");
            }
            self.state.add("{% endawait %}");
            return;
        };

        self.state.add(" %}");
        self.visit(NodeRef::Fragment(pending));

        if let Some(then) = &block.then {
            self.await_branch("{% then", block.value.as_ref(), then);
        }
        if let Some(catch) = &block.catch {
            self.await_branch("{% catch", block.error.as_ref(), catch);
        }

        self.state.add("{% endawait %}");
    }

    fn await_branch_head(&mut self, keyword: &str, binding: Option<&'a Expr>) {
        self.state.add(keyword);
        if let Some(binding) = binding {
            self.state.add(" ");
            self.visit(NodeRef::Expr(binding));
        }
        self.state.add(" %}");
    }

    /// A `{% then %}` or `{% catch %}` branch, omitted when it has no
    /// content.
    fn await_branch(&mut self, keyword: &str, binding: Option<&'a Expr>, fragment: &'a Fragment) {
        if clean_nodes(&fragment.nodes, false).is_empty() {
            return;
        }
        self.await_branch_head(keyword, binding);
        self.visit(NodeRef::Fragment(fragment));
    }
}
