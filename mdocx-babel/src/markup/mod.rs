//! Markdown to a renderable node tree
//!
//! Two steps: comrak renders the preprocessed markdown to HTML
//! ([`markdown::to_html`]), then html5ever parses that HTML back into an
//! owned tree of [`SemanticNode`]s ([`dom::parse_fragment`]). The renderer
//! only ever sees the node tree.

pub mod dom;
pub mod markdown;
pub mod node;

pub use dom::parse_fragment;
pub use markdown::to_html;
pub use node::{Element, SemanticNode};

use crate::error::MarkupError;

/// Markdown straight to the top-level body nodes.
pub fn parse_markdown(markdown: &str) -> Result<Vec<SemanticNode>, MarkupError> {
    parse_fragment(&to_html(markdown))
}
