//! HTML parsing support.
//!
//! Turns an HTML string (typically the serialized contents of a selection)
//! into the owned node tree the engine converts.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::Node;

/// Parse an HTML snippet into a document fragment.
///
/// The parser's synthetic `<html>` wrapper is left out: the children of the
/// returned fragment are the top-level nodes of `html`. Comments are kept so
/// the sanitizer sees the same tree a browser clone would produce.
///
/// # Example
///
/// ```rust
/// use clipdown::{parse_html, ClipService};
///
/// let fragment = parse_html("<h1>Hello <em>World</em></h1>");
/// let markdown = ClipService::new().markdown(&fragment, None);
/// assert_eq!(markdown, "# Hello *World*");
/// ```
pub fn parse_html(html: &str) -> Node {
    let document = Html::parse_fragment(html);
    let mut fragment = Node::fragment();
    append_children(&mut fragment, document.root_element());
    fragment
}

fn append_children(parent: &mut Node, element: ElementRef) {
    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => parent.add_child(Node::text(&text.text)),
            ScraperNode::Comment(comment) => parent.add_child(Node::comment(&comment.comment)),
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    parent.add_child(convert_element(child_element));
                }
            }
            _ => {}
        }
    }
}

fn convert_element(element: ElementRef) -> Node {
    let attrs: Vec<(&str, &str)> = element.value().attrs().collect();
    let mut node = Node::element_with_attrs(element.value().name(), attrs);
    append_children(&mut node, element);
    node
}
