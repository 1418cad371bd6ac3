//! # zvelte-fmt - Zvelte Template Formatter
//!
//! zvelte-fmt is a code formatter for Zvelte component templates: HTML
//! extended with `{{ expression }}` tags, `{% block %}` tags, directives and
//! an optional root-level `<style>` block. It parses a document into a
//! positioned syntax tree and prints it back in a canonical layout.
//!
//! Most whitespace is normalized, but a few decisions of the author are
//! kept because they cannot be recovered from the tree alone: blank lines
//! between nodes, attribute lists written one per line, multi-line
//! collections and ternaries, and single-quoted attribute values.
//!
//! ## Usage
//!
//! ### As a Library
//!
//! ```rust
//! use zvelte_fmt::formatter::{FormatOptions, format_source};
//!
//! let source = r#"<ul>
//! {% for item in items %}
//! <li class = "item">{{item.name|upper}}</li>
//! {% endfor %}
//! </ul>"#;
//!
//! let formatted = format_source(source, &FormatOptions::default()).unwrap();
//! println!("{}", formatted);
//! ```
//!
//! ### As a CLI Tool
//!
//! The `zvelte-fmt` binary formats `.zvelte` and `.twig` files; see
//! `zvelte-fmt --help`.
//!
//! ## Modules
//!
//! - [`ast`] - Positioned syntax tree
//! - [`parser`] - Template, expression and stylesheet parsing
//! - [`formatter`] - Core formatting logic and public API
//! - [`error`] - Parse errors with line/column ranges

pub mod ast;

pub mod error;

/// Template, expression and stylesheet parsers
pub mod parser;

/// Core formatting engine and public API
pub mod formatter;

pub use error::{ParseError, Position, Range};
pub use formatter::{FormatOptions, Mode, TextEdit, format, format_document, format_source};
pub use parser::{ParseOptions, parse};
