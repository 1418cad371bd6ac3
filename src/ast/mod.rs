//! Positioned syntax tree for Zvelte templates.
//!
//! The tree has three layers:
//!
//! - **Template layer** ([`template`]): the document root, fragments of
//!   sibling nodes, elements, attributes and control blocks.
//! - **Expression layer** ([`expr`]): everything that appears inside
//!   `{{ ... }}`, `{% ... %}` and directive values.
//! - **Style layer** ([`style`]): the rule tree of a root-level `<style>`
//!   block.
//!
//! Every node carries a [`Span`] into the original source. The formatter
//! reads the source between spans to recover layout decisions that the
//! tree itself does not record.

pub mod expr;
pub mod span;
pub mod style;
pub mod template;

pub use expr::*;
pub use span::{Span, Spanned};
pub use style::*;
pub use template::*;
