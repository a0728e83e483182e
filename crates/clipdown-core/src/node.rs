//! Source node tree for Markdown conversion.
//!
//! A detached, owned copy of the DOM nodes a selection covers. Hosts build it
//! from whatever parser or browser bridge they have; the engine only ever reads
//! it (the sanitizer produces a new tree rather than editing this one).

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

static HIDDEN_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|;)\s*display\s*:\s*none\b").expect("valid regex"));

/// Node types matching DOM nodeType values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Element node (nodeType = 1)
    Element = 1,
    /// Text node (nodeType = 3)
    Text = 3,
    /// Comment node (nodeType = 8)
    Comment = 8,
    /// Document fragment node (nodeType = 11)
    DocumentFragment = 11,
}

/// A node of the source tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub node_type: NodeType,

    /// Lowercase tag name for elements, `#text`, `#comment` or
    /// `#document-fragment` otherwise
    pub name: String,

    /// Character data for text and comment nodes
    pub value: Option<String>,

    /// Attributes in source order, keyed by lowercase name
    pub attributes: IndexMap<String, String>,

    pub children: Vec<Node>,
}

impl Node {
    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self {
            node_type: NodeType::Element,
            name: tag_name.to_ascii_lowercase(),
            value: None,
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let mut node = Self::element(tag_name);
        for (name, value) in attrs {
            node.set_attr(name, value);
        }
        node
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self {
            node_type: NodeType::Text,
            name: "#text".to_string(),
            value: Some(content.to_string()),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Create a new comment node
    pub fn comment(content: &str) -> Self {
        Self {
            node_type: NodeType::Comment,
            name: "#comment".to_string(),
            value: Some(content.to_string()),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Create an empty document fragment
    pub fn fragment() -> Self {
        Self {
            node_type: NodeType::DocumentFragment,
            name: "#document-fragment".to_string(),
            value: None,
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Append a child and return the node, for building trees inline
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Tag name for elements, empty for every other node type
    pub fn tag_name(&self) -> &str {
        if self.is_element() {
            &self.name
        } else {
            ""
        }
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Set an attribute, replacing any previous value in place
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter()
    }

    /// Get only element children
    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().filter(|n| n.is_element())
    }

    /// Concatenated character data of this node and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self.node_type {
            NodeType::Text => out.push_str(self.value.as_deref().unwrap_or("")),
            NodeType::Comment => {}
            _ => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Follow a path of child indices down from this node
    pub fn descendant(&self, path: &[usize]) -> Option<&Node> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }

    /// Copy of the node without its children
    pub fn shallow_clone(&self) -> Self {
        Self {
            node_type: self.node_type,
            name: self.name.clone(),
            value: self.value.clone(),
            attributes: self.attributes.clone(),
            children: Vec::new(),
        }
    }

    /// True when the element is hidden by the `hidden` attribute or an
    /// inline `display: none`
    pub fn is_hidden(&self) -> bool {
        if !self.is_element() {
            return false;
        }
        self.has_attr("hidden")
            || self
                .attr("style")
                .is_some_and(|style| HIDDEN_STYLE.is_match(style))
    }
}
