//! List flattening
//!
//! A `ul`/`ol` subtree is turned into a flat stream of [`ListEvent`]s and then
//! walked with a depth counter. Depth starts at -1 and every list open takes it
//! one level deeper, so the outermost list's items sit at depth 0.
//!
//! Inline text inside an item is gathered until the next structural event
//! (a nested list opening, a list closing, or the end of an item or
//! paragraph), then emitted as one item. An item at a depth covered by the
//! style table gets that style; deeper items are written as indented plain
//! text with the table's fallback glyph.

use crate::docx::model::Block;
use crate::markup::SemanticNode;
use crate::style::ListStyleTable;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent<'a> {
    Open,
    Close,
    Text(&'a str),
    Break,
}

/// Flatten a list subtree into events, in document order.
pub fn list_events(node: &SemanticNode) -> Vec<ListEvent<'_>> {
    let mut events = Vec::new();
    collect_events(node, &mut events);
    events
}

fn collect_events<'a>(node: &'a SemanticNode, events: &mut Vec<ListEvent<'a>>) {
    match node {
        SemanticNode::Text(text) => events.push(ListEvent::Text(text)),
        SemanticNode::Element(element) => match element.tag.as_str() {
            "ul" | "ol" => {
                events.push(ListEvent::Open);
                for child in &element.children {
                    collect_events(child, events);
                }
                events.push(ListEvent::Close);
            }
            "li" | "p" => {
                for child in &element.children {
                    collect_events(child, events);
                }
                events.push(ListEvent::Break);
            }
            "br" => events.push(ListEvent::Break),
            _ => {
                for child in &element.children {
                    collect_events(child, events);
                }
            }
        },
    }
}

/// Walks list events against one style table.
pub struct ListWalker<'s> {
    table: &'s ListStyleTable,
    depth: isize,
    pending: String,
    blocks: Vec<Block>,
}

impl<'s> ListWalker<'s> {
    pub fn new(table: &'s ListStyleTable) -> Self {
        Self {
            table,
            depth: -1,
            pending: String::new(),
            blocks: Vec::new(),
        }
    }

    /// Current nesting depth; -1 outside any list.
    pub fn depth(&self) -> isize {
        self.depth
    }

    pub fn walk(mut self, node: &SemanticNode) -> Vec<Block> {
        for event in list_events(node) {
            self.apply(event);
        }
        self.flush();
        self.blocks
    }

    pub fn apply(&mut self, event: ListEvent<'_>) {
        match event {
            ListEvent::Open => {
                self.flush();
                self.depth += 1;
            }
            ListEvent::Close => {
                self.flush();
                self.depth -= 1;
            }
            ListEvent::Text(text) => self.pending.push_str(text),
            ListEvent::Break => self.flush(),
        }
    }

    fn flush(&mut self) {
        let text = self.pending.split_whitespace().collect::<Vec<_>>().join(" ");
        self.pending.clear();
        if text.is_empty() {
            return;
        }
        let depth = self.depth.max(0) as usize;
        let block = match self.table.style_for(depth) {
            Some(style) => Block::ListItem {
                text,
                style: Some(style.to_string()),
                depth,
            },
            None => {
                trace!(depth, "list depth past style table, using fallback glyph");
                Block::ListItem {
                    text: self.table.fallback_text(depth, &text),
                    style: None,
                    depth,
                }
            }
        };
        self.blocks.push(block);
    }
}
