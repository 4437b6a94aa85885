//! Classification of top-level nodes
//!
//! The renderer never dispatches on tag strings directly. Each top-level node
//! is mapped once onto a [`BlockKind`] and the renderer matches on that, so
//! adding a kind forces every match to handle it.

use crate::markup::SemanticNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
}

/// The closed set of node kinds the renderer knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// `h1`..`h6`, carrying the zero-based heading level (clamped to 3).
    Heading(u8),
    /// A paragraph with emphasis anywhere inside it.
    EmphasisParagraph,
    Rule,
    /// A paragraph holding an image.
    Image,
    Paragraph,
    CodeBlock,
    Table,
    List(ListKind),
    Blockquote,
    Strong,
    /// Bare text between blocks.
    Text,
    Unhandled,
}

const RULE_MARKER: &str = "<hr/>";
const DEEPEST_HEADING: u8 = 3;

impl BlockKind {
    /// Classify one top-level node.
    ///
    /// The emphasis check comes first, so a paragraph with both emphasis and an
    /// image is written as text.
    pub fn classify(node: &SemanticNode) -> BlockKind {
        let element = match node {
            SemanticNode::Text(text) if text.trim().is_empty() => return BlockKind::Unhandled,
            SemanticNode::Text(_) => return BlockKind::Text,
            SemanticNode::Element(element) => element,
        };

        if element.tag == "p" && element.contains("em") {
            return BlockKind::EmphasisParagraph;
        }
        if node.outer_html().starts_with(RULE_MARKER) {
            return BlockKind::Rule;
        }

        match element.tag.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = element.tag[1..].parse::<u8>().unwrap_or(1) - 1;
                BlockKind::Heading(level.min(DEEPEST_HEADING))
            }
            "p" if element.contains("img") => BlockKind::Image,
            "p" => BlockKind::Paragraph,
            "pre" => BlockKind::CodeBlock,
            "table" => BlockKind::Table,
            "ul" => BlockKind::List(ListKind::Unordered),
            "ol" => BlockKind::List(ListKind::Ordered),
            "blockquote" => BlockKind::Blockquote,
            "strong" => BlockKind::Strong,
            _ => BlockKind::Unhandled,
        }
    }
}
