//! Owned markup tree handed to the renderer.

/// A node of the parsed HTML fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticNode {
    Element(Element),
    Text(String),
}

/// An element with its attributes in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<SemanticNode>,
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

impl SemanticNode {
    pub fn element(tag: &str, attrs: &[(&str, &str)], children: Vec<SemanticNode>) -> Self {
        SemanticNode::Element(Element {
            tag: tag.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            children,
        })
    }

    pub fn text(text: &str) -> Self {
        SemanticNode::Text(text.to_string())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            SemanticNode::Element(element) => Some(element),
            SemanticNode::Text(_) => None,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        self.as_element().map(|element| element.tag.as_str())
    }

    /// Whitespace-only text, as left between block elements.
    pub fn is_blank_text(&self) -> bool {
        matches!(self, SemanticNode::Text(text) if text.trim().is_empty())
    }

    /// Concatenated text of the node and all its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            SemanticNode::Text(text) => out.push_str(text),
            SemanticNode::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Markup rendering of the node, void elements written as `<hr/>`.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            SemanticNode::Text(text) => out.push_str(&html_escape::encode_text(text)),
            SemanticNode::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&html_escape::encode_double_quoted_attribute(value));
                    out.push('"');
                }
                if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                for child in &element.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
        }
    }
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First descendant element with `tag`, depth first.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        for child in &self.children {
            if let SemanticNode::Element(element) = child {
                if element.tag == tag {
                    return Some(element);
                }
                if let Some(found) = element.find(tag) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// All descendant elements with `tag`, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        collect_elements(&self.children, tag, &mut found);
        found
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.find(tag).is_some()
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }
}

/// All elements with `tag` in `nodes` and below, in document order.
pub fn find_all<'a>(nodes: &'a [SemanticNode], tag: &str) -> Vec<&'a Element> {
    let mut found = Vec::new();
    collect_elements(nodes, tag, &mut found);
    found
}

fn collect_elements<'a>(nodes: &'a [SemanticNode], tag: &str, found: &mut Vec<&'a Element>) {
    for node in nodes {
        if let SemanticNode::Element(element) = node {
            if element.tag == tag {
                found.push(element);
            }
            collect_elements(&element.children, tag, found);
        }
    }
}
