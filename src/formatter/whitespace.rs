//! Whitespace reconciliation.
//!
//! Text nodes keep their whitespace verbatim in the tree. Before a sibling
//! sequence is printed, every text node is reduced to its trimmed content
//! plus a [`Padding`] class on each side, which is all of the original
//! layout the formatter preserves.

use crate::ast::{Node, NodeKind};

/// Whitespace kept around a text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Padding {
    #[default]
    None,
    Space,
    Newline,
    /// Any run of two or more newlines.
    Blank,
}

impl Padding {
    pub fn as_str(self) -> &'static str {
        match self {
            Padding::None => "",
            Padding::Space => " ",
            Padding::Newline => "\n",
            Padding::Blank => "\n\n",
        }
    }
}

/// A text node after reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddedText<'a> {
    pub data: &'a str,
    pub leading: Padding,
    pub trailing: Padding,
}

#[derive(Debug, Clone, Copy)]
pub enum Cleaned<'a> {
    Text(PaddedText<'a>),
    Node(&'a Node),
}

fn is_blank_text(node: &Node) -> bool {
    node.node.as_text().is_some_and(|data| data.trim().is_empty())
}

fn newlines(whitespace: &str) -> usize {
    whitespace.bytes().filter(|b| *b == b'\n').count()
}

/// Reconcile a sibling sequence. With `trim`, whitespace at both ends of
/// the sequence is discarded entirely (document level).
pub fn clean_nodes(nodes: &[Node], trim: bool) -> Vec<Cleaned<'_>> {
    if nodes.iter().all(is_blank_text) {
        return Vec::new();
    }

    let nodes = if trim {
        let start = nodes.iter().position(|n| !is_blank_text(n)).unwrap_or(0);
        let end = nodes
            .iter()
            .rposition(|n| !is_blank_text(n))
            .map_or(nodes.len(), |i| i + 1);
        &nodes[start..end]
    } else {
        nodes
    };

    let count = nodes.len();
    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let Some(raw) = node.node.as_text() else {
                return Cleaned::Node(node);
            };
            let first = i == 0;
            let last = i + 1 == count;

            let mut raw = raw;
            if trim && first {
                raw = raw.trim_start();
            }
            if trim && last {
                raw = raw.trim_end();
            }

            Cleaned::Text(pad(raw, first, last))
        })
        .collect()
}

fn pad(raw: &str, first: bool, last: bool) -> PaddedText<'_> {
    let data = raw.trim();
    let before = &raw[..raw.len() - raw.trim_start().len()];
    let after = &raw[raw.trim_end().len()..];

    let leading = match newlines(before) {
        n if n >= 2 && !(data.is_empty() && last) => Padding::Blank,
        n if n >= 1 => Padding::Newline,
        _ if !before.is_empty() && !first => Padding::Space,
        _ => Padding::None,
    };

    let trailing = if data.is_empty() {
        Padding::None
    } else {
        match newlines(after) {
            n if n >= 2 && !last => Padding::Blank,
            n if n >= 1 => Padding::Newline,
            _ if !after.is_empty() && !last => Padding::Space,
            _ => Padding::None,
        }
    };

    PaddedText {
        data,
        leading,
        trailing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Span, Spanned};

    fn text(data: &str) -> Node {
        Spanned::new(NodeKind::Text(data.to_string()), Span::default())
    }

    fn comment() -> Node {
        Spanned::new(NodeKind::Comment("c".into()), Span::default())
    }

    fn texts(cleaned: &[Cleaned<'_>]) -> Vec<(Padding, String, Padding)> {
        cleaned
            .iter()
            .filter_map(|c| match c {
                Cleaned::Text(t) => Some((t.leading, t.data.to_string(), t.trailing)),
                Cleaned::Node(_) => None,
            })
            .collect()
    }

    #[test]
    fn whitespace_only_sequences_vanish() {
        assert!(clean_nodes(&[], false).is_empty());
        assert!(clean_nodes(&[text("  \n\n ")], false).is_empty());
    }

    #[test]
    fn inline_spaces_between_siblings() {
        let nodes = [comment(), text("  hello  "), comment()];
        assert_eq!(
            texts(&clean_nodes(&nodes, false)),
            vec![(Padding::Space, "hello".into(), Padding::Space)]
        );
    }

    #[test]
    fn spaces_at_the_edges_are_dropped() {
        let nodes = [text(" a "), comment(), text(" b ")];
        assert_eq!(
            texts(&clean_nodes(&nodes, false)),
            vec![
                (Padding::None, "a".into(), Padding::Space),
                (Padding::Space, "b".into(), Padding::None),
            ]
        );
    }

    #[test]
    fn newline_runs_collapse_to_two_classes() {
        let nodes = [comment(), text("\n\n\n\n  a\n"), comment(), text("\n")];
        assert_eq!(
            texts(&clean_nodes(&nodes, false)),
            vec![
                (Padding::Blank, "a".into(), Padding::Newline),
                (Padding::Newline, String::new(), Padding::None),
            ]
        );
    }

    #[test]
    fn trailing_blank_line_before_closing_tag_is_dropped() {
        let nodes = [comment(), text("\n\n\n")];
        assert_eq!(
            texts(&clean_nodes(&nodes, false)),
            vec![(Padding::Newline, String::new(), Padding::None)]
        );
        let nodes = [comment(), text("x\n\n")];
        assert_eq!(
            texts(&clean_nodes(&nodes, false)),
            vec![(Padding::None, "x".into(), Padding::Newline)]
        );
    }

    #[test]
    fn trim_drops_document_edges() {
        let nodes = [text("\n\n"), comment(), text("\n\n  x  \n\n"), text(" \n ")];
        let cleaned = clean_nodes(&nodes, true);
        assert_eq!(cleaned.len(), 2);
        assert!(matches!(cleaned[0], Cleaned::Node(_)));
        assert_eq!(
            texts(&cleaned),
            vec![(Padding::Blank, "x".into(), Padding::None)]
        );
    }
}
