//! Renderer for root-level stylesheets.
//!
//! Stylesheets do not need the template visitor's ancestor path, so they
//! are rendered by plain recursion over the same [`State`].

use crate::ast::{AtRule, StyleNode, StyleRule, StyleSheet};

use super::state::State;

pub(crate) fn render_stylesheet(state: &mut State<'_>, sheet: &StyleSheet) {
    for (i, node) in sheet.nodes.iter().enumerate() {
        if i > 0 {
            state.nl();
            if wants_blank_line(&sheet.nodes[i - 1], node) {
                state.nl();
            }
        }
        render_node(state, node);
    }
}

/// A blank line goes before every rule and wherever the node kind changes.
fn wants_blank_line(previous: &StyleNode, next: &StyleNode) -> bool {
    matches!(next, StyleNode::Rule(_)) || !next.same_kind(previous)
}

fn render_node(state: &mut State<'_>, node: &StyleNode) {
    match node {
        StyleNode::Rule(rule) => render_rule(state, rule),
        StyleNode::Declaration(declaration) => {
            state.add(&format!("{}: {}", declaration.prop, declaration.value));
            if declaration.important {
                state.add(" !important");
            }
            state.add(";");
        }
        StyleNode::AtRule(at_rule) => render_at_rule(state, at_rule),
        StyleNode::Comment(comment) if comment.inline => {
            state.add(&format!("// {}", comment.text));
        }
        StyleNode::Comment(comment) => state.add(&format!("/* {} */", comment.text)),
    }
}

fn render_rule(state: &mut State<'_>, rule: &StyleRule) {
    for (i, selector) in rule.selectors.iter().enumerate() {
        if i > 0 {
            state.add(",");
            state.nl();
        }
        state.add(selector);
    }
    render_block(state, &rule.nodes);
}

fn render_at_rule(state: &mut State<'_>, at_rule: &AtRule) {
    state.add("@");
    state.add(&at_rule.name);
    if !at_rule.params.is_empty() {
        state.add(" ");
        state.add(&at_rule.params);
    }

    match &at_rule.nodes {
        Some(nodes) => render_block(state, nodes),
        None => state.add(";"),
    }
}

fn render_block(state: &mut State<'_>, nodes: &[StyleNode]) {
    state.add(" {");
    state.nl();
    state.indent();
    render_nodes(state, nodes);
    state.dedent();
    state.add("}");
}

/// Children of a block, each on its own line.
fn render_nodes(state: &mut State<'_>, nodes: &[StyleNode]) {
    for (i, node) in nodes.iter().enumerate() {
        render_node(state, node);
        state.nl();

        if let Some(next) = nodes.get(i + 1)
            && wants_blank_line(node, next)
        {
            state.nl();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Span;
    use crate::parser::parse_stylesheet;

    fn render(code: &str) -> String {
        let sheet = parse_stylesheet(code, Span::new(0, code.len())).unwrap();
        let mut state = State::new(code, "\t");
        render_stylesheet(&mut state, &sheet);
        state.finish()
    }

    #[test]
    fn rules_are_separated_by_blank_lines() {
        assert_eq!(
            render("a{color:red;margin:0}b,c{x:y !important}"),
            "a {\n\tcolor: red;\n\tmargin: 0;\n}\n\nb,\nc {\n\tx: y !important;\n}"
        );
    }

    #[test]
    fn nested_blocks_separate_kinds() {
        assert_eq!(
            render("@media print { /* hide */ a { display: none } .b { c: d } }"),
            "@media print {\n\t/* hide */\n\n\ta {\n\t\tdisplay: none;\n\t}\n\n\t.b {\n\t\tc: d;\n\t}\n}"
        );
    }

    #[test]
    fn statement_at_rules_end_with_a_semicolon() {
        assert_eq!(
            render("@import 'a.css';\n// note\n"),
            "@import 'a.css';\n\n// note"
        );
    }

    #[test]
    fn top_level_statements_of_one_kind_stay_together() {
        assert_eq!(
            render("@import 'a';@import 'b';\n\n\n@charset 'utf-8';"),
            "@import 'a';\n@import 'b';\n@charset 'utf-8';"
        );
        assert_eq!(
            render("@import 'a'; a { b: c } d { e: f }"),
            "@import 'a';\n\na {\n\tb: c;\n}\n\nd {\n\te: f;\n}"
        );
    }
}
