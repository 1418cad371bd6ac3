//! Core formatting engine for Zvelte templates
//!
//! The formatter parses a document, reconciles the whitespace of every
//! sibling sequence and walks the tree, rendering each node kind with its
//! own rule. Only a few layout decisions of the original source survive:
//! blank lines between nodes, wrapped attribute lists, multi-line
//! collections, ternaries and expression tags, and attribute quote style.
//!
//! # Example
//!
//! ```rust
//! use zvelte_fmt::formatter::{FormatOptions, format_source};
//!
//! let unformatted = "<div   class = \"x\"   >\n\n\n  {{   foo   }}\n</div>\n";
//!
//! let formatted = format_source(unformatted, &FormatOptions::default()).unwrap();
//! assert_eq!(formatted, "<div class=\"x\">\n\n\t{{ foo }}\n</div>\n");
//! ```

pub mod grouping;
pub mod script;
pub mod whitespace;

mod expr;
mod nodes;
mod state;
mod style;
mod visit;

use tracing::debug;

use crate::error::{ParseError, Range};
use crate::parser::{ParseOptions, parse, parse_stylesheet};

pub use script::{Reindent, ScriptFormatter};
pub use state::State;

use visit::{Formatter, NodeRef};

/// Output mode for the formatter
///
/// Determines how the formatted code should be handled after processing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Print formatted code to stdout
    #[default]
    Stdout,
    /// Write formatted code back to source files
    Write,
    /// Check if formatting would change the code (used for CI/validation)
    Check,
}

/// Configuration options for the formatter
///
/// # Example
///
/// ```rust
/// use zvelte_fmt::formatter::{FormatOptions, Mode};
///
/// let opts = FormatOptions {
///     use_tabs: false,
///     indent_width: 2,
///     mode: Mode::Write,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Indent with tabs; when false, `indent_width` spaces are used
    pub use_tabs: bool,
    /// Number of spaces per indentation level when not using tabs
    pub indent_width: usize,
    /// Prefix of special elements (`zvelte` when unset)
    pub special_tag: Option<String>,
    /// End the output with a newline
    pub final_newline: bool,
    /// How to handle the formatted output
    pub mode: Mode,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            use_tabs: true,
            indent_width: 4,
            special_tag: None,
            final_newline: true,
            mode: Mode::Stdout,
        }
    }
}

impl FormatOptions {
    pub fn indent_unit(&self) -> String {
        if self.use_tabs {
            "\t".to_string()
        } else {
            " ".repeat(self.indent_width)
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            special_tag: self.special_tag.clone(),
        }
    }
}

/// A whole-document replacement, as sent back to an editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Range of the original document.
    pub range: Range,
    pub new_text: String,
}

/// Format `source` with tab indentation and no trailing newline.
pub fn format(source: &str, options: &ParseOptions) -> Result<String, ParseError> {
    format_with(source, options, "\t", &Reindent)
}

/// Format with an explicit indent unit and script formatter.
pub fn format_with(
    source: &str,
    options: &ParseOptions,
    indent_unit: &str,
    script: &dyn ScriptFormatter,
) -> Result<String, ParseError> {
    debug!(
        len = source.len(),
        special = options.special_prefix(),
        "formatting document"
    );

    let root = parse(source, options)?;
    let stylesheet = root
        .css
        .as_ref()
        .map(|css| parse_stylesheet(source, css.node.code_span))
        .transpose()?;

    let mut formatter = Formatter::new(
        State::new(source, indent_unit),
        script,
        stylesheet.as_ref(),
    );
    formatter.visit(NodeRef::Root(&root));
    Ok(formatter.finish())
}

/// Format a whole file according to `opts`.
pub fn format_source(input: &str, opts: &FormatOptions) -> Result<String, ParseError> {
    let mut output = format_with(
        input,
        &opts.parse_options(),
        &opts.indent_unit(),
        &Reindent,
    )?;
    if opts.final_newline && !output.is_empty() {
        output.push('\n');
    }
    Ok(output)
}

/// Format a document and describe the result as a single edit replacing
/// the whole original text.
pub fn format_document(source: &str, opts: &FormatOptions) -> Result<TextEdit, ParseError> {
    let new_text = format_source(source, opts)?;
    Ok(TextEdit {
        range: Range::of_document(source),
        new_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(source: &str) -> String {
        format(source, &ParseOptions::default()).unwrap()
    }

    #[test]
    fn document_edges_are_trimmed() {
        assert_eq!(fmt("\n\n  <p>hi</p>  \n\n"), "<p>hi</p>");
    }

    #[test]
    fn indent_unit_follows_options() {
        let opts = FormatOptions {
            use_tabs: false,
            indent_width: 2,
            ..Default::default()
        };
        assert_eq!(
            format_source("<ul>\n<li>a</li>\n</ul>", &opts).unwrap(),
            "<ul>\n  <li>a</li>\n</ul>\n"
        );
    }

    #[test]
    fn empty_document_has_no_final_newline() {
        assert_eq!(
            format_source("  \n ", &FormatOptions::default()).unwrap(),
            ""
        );
    }

    #[test]
    fn document_edit_covers_the_original() {
        let edit = format_document("<br>\n\n", &FormatOptions::default()).unwrap();
        assert_eq!(edit.new_text, "<br />\n");
        assert_eq!(edit.range.end.ln, 2);
        assert_eq!(edit.range.end.col, 0);
    }

    #[test]
    fn style_errors_are_parse_errors() {
        let err = format("<style>a { color red }</style>", &ParseOptions::default()).unwrap_err();
        assert_eq!(err.text, "Expected `:` in declaration");
    }
}
