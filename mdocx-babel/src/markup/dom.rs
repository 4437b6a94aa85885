//! HTML → SemanticNode
//!
//! The HTML produced by the markdown pass is parsed with html5ever into an
//! RcDom and the children of `<body>` are copied into owned
//! [`SemanticNode`]s. Comments, doctypes and processing instructions are
//! dropped, which is also how the comment carrying the macro block vanishes
//! from the rendered document.

use super::node::{Element, SemanticNode};
use crate::error::MarkupError;
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parse an HTML fragment and return the top-level nodes of its body.
pub fn parse_fragment(html: &str) -> Result<Vec<SemanticNode>, MarkupError> {
    let dom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(MarkupError::Html)?;

    let body = find_element(&dom.document, "body").ok_or(MarkupError::MissingBody)?;
    let nodes = body
        .children
        .borrow()
        .iter()
        .filter_map(convert)
        .collect();
    Ok(nodes)
}

fn find_element(handle: &Handle, name: &str) -> Option<Handle> {
    if let NodeData::Element { name: qual, .. } = &handle.data {
        if &*qual.local == name {
            return Some(handle.clone());
        }
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, name))
}

fn convert(handle: &Handle) -> Option<SemanticNode> {
    match &handle.data {
        NodeData::Text { contents } => Some(SemanticNode::Text(contents.borrow().to_string())),
        NodeData::Element { name, attrs, .. } => {
            let attrs = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect();
            let children = handle.children.borrow().iter().filter_map(convert).collect();
            Some(SemanticNode::Element(Element {
                tag: name.local.to_string(),
                attrs,
                children,
            }))
        }
        _ => None,
    }
}
