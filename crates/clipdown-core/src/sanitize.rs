//! Fragment sanitizer.
//!
//! Produces a cleaned copy of a detached fragment: non-content nodes removed,
//! `<picture>` wrappers unwrapped, and link/image URLs made absolute. Rendering
//! assumes its input went through here first.

use url::Url;

use crate::node::{Node, NodeType};

/// Attributes that carry a single image URL, in lookup priority order
pub const IMAGE_SOURCE_ATTRIBUTES: &[&str] = &[
    "src",
    "data-src",
    "data-original",
    "data-lazy-src",
    "data-actualsrc",
    "data-url",
    "data-hi-res-src",
];

/// Attributes that carry a `srcset`-style candidate list
pub const IMAGE_SRCSET_ATTRIBUTES: &[&str] = &["srcset", "data-srcset", "data-lazy-srcset"];

const DROPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Return a sanitized copy of `root`, resolving URLs against `base` when given.
pub fn sanitize(root: &Node, base: Option<&Url>) -> Node {
    let mut clean = sanitize_element(root, base);
    clean.children = sanitize_children(root, base);
    clean
}

fn sanitize_children(node: &Node, base: Option<&Url>) -> Vec<Node> {
    let mut children = Vec::with_capacity(node.children.len());

    for child in node.children() {
        match child.node_type {
            NodeType::Comment => {}
            NodeType::Text => children.push(child.clone()),
            NodeType::DocumentFragment => children.extend(sanitize_children(child, base)),
            NodeType::Element => {
                let tag = child.tag_name();
                if DROPPED_ELEMENTS.contains(&tag) || child.is_hidden() {
                    tracing::trace!(tag, "dropping non-content element");
                    continue;
                }
                if tag == "picture" {
                    if let Some(img) = first_image(child) {
                        children.push(sanitize(img, base));
                    }
                    continue;
                }
                children.push(sanitize(child, base));
            }
        }
    }

    children
}

/// Shallow copy of `node` with its URL-bearing attributes resolved
fn sanitize_element(node: &Node, base: Option<&Url>) -> Node {
    let mut clean = node.shallow_clone();
    let Some(base) = base else {
        return clean;
    };

    match node.tag_name() {
        "a" | "area" => {
            if let Some(href) = node.attr("href") {
                clean.set_attr("href", &resolve_url(href, base));
            }
        }
        "img" => {
            for &name in IMAGE_SOURCE_ATTRIBUTES {
                if let Some(value) = node.attr(name) {
                    clean.set_attr(name, &resolve_url(value, base));
                }
            }
            for &name in IMAGE_SRCSET_ATTRIBUTES {
                if let Some(value) = node.attr(name) {
                    clean.set_attr(name, &resolve_srcset(value, base));
                }
            }
        }
        _ => {}
    }

    clean
}

fn first_image(node: &Node) -> Option<&Node> {
    node.element_children().find_map(|child| {
        if child.tag_name() == "img" {
            Some(child)
        } else {
            first_image(child)
        }
    })
}

/// Resolve `raw` against `base`. Empty values, `data:` URIs and values that
/// fail to resolve come back unchanged.
pub fn resolve_url(raw: &str, base: &Url) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || is_data_uri(trimmed) {
        return raw.to_string();
    }
    match base.join(trimmed) {
        Ok(url) => url.to_string(),
        Err(err) => {
            tracing::debug!(url = trimmed, error = %err, "leaving unresolvable URL as is");
            raw.to_string()
        }
    }
}

/// Resolve every candidate URL of a `srcset` list, keeping descriptors
fn resolve_srcset(value: &str, base: &Url) -> String {
    if is_data_uri(value.trim()) {
        return value.to_string();
    }
    value
        .split(',')
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .map(|candidate| match candidate.split_once(char::is_whitespace) {
            Some((url, descriptor)) => format!("{} {}", resolve_url(url, base), descriptor.trim()),
            None => resolve_url(candidate, base),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// First URL of a `srcset`-style candidate list
pub fn first_srcset_url(value: &str) -> Option<&str> {
    let value = value.trim();
    let first = if is_data_uri(value) {
        value
    } else {
        value.split(',').next()?
    };
    first.split_whitespace().next()
}

pub fn is_data_uri(value: &str) -> bool {
    value
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base() -> Url {
        Url::parse("https://example.com/articles/post.html").unwrap()
    }

    #[test]
    fn test_drops_non_content_nodes() {
        let root = Node::fragment()
            .with_child(Node::element("script").with_child(Node::text("alert(1)")))
            .with_child(Node::element("style").with_child(Node::text("p {}")))
            .with_child(Node::element("noscript").with_child(Node::text("enable js")))
            .with_child(Node::comment("note"))
            .with_child(Node::element_with_attrs("div", vec![("hidden", "")]).with_child(Node::text("x")))
            .with_child(Node::element("p").with_child(Node::text("kept")));

        let clean = sanitize(&root, None);
        assert_eq!(clean.children.len(), 1);
        assert_eq!(clean.children[0].tag_name(), "p");
        assert_eq!(clean.text_content(), "kept");
    }

    #[test]
    fn test_unwraps_picture() {
        let picture = Node::element("picture")
            .with_child(Node::element_with_attrs("source", vec![("srcset", "a.webp")]))
            .with_child(Node::element_with_attrs("img", vec![("src", "a.jpg")]));
        let empty_picture = Node::element("picture")
            .with_child(Node::element_with_attrs("source", vec![("srcset", "b.webp")]));
        let root = Node::fragment().with_child(picture).with_child(empty_picture);

        let clean = sanitize(&root, Some(&base()));
        assert_eq!(clean.children.len(), 1);
        assert_eq!(clean.children[0].tag_name(), "img");
        assert_eq!(clean.children[0].attr("src"), Some("https://example.com/articles/a.jpg"));
    }

    #[test]
    fn test_resolves_links_and_images() {
        let root = Node::fragment()
            .with_child(Node::element_with_attrs("a", vec![("href", "../about")]))
            .with_child(Node::element_with_attrs(
                "img",
                vec![
                    ("data-src", "/img/lazy.png"),
                    ("srcset", "small.png 1x, /large.png 2x"),
                ],
            ));

        let clean = sanitize(&root, Some(&base()));
        assert_eq!(clean.children[0].attr("href"), Some("https://example.com/about"));
        assert_eq!(clean.children[1].attr("data-src"), Some("https://example.com/img/lazy.png"));
        assert_eq!(
            clean.children[1].attr("srcset"),
            Some("https://example.com/articles/small.png 1x, https://example.com/large.png 2x")
        );
    }

    #[test]
    fn test_leaves_data_uris_and_failures_alone() {
        let data = "data:image/png;base64,iVBORw0KGgo=";
        assert_eq!(resolve_url(data, &base()), data);
        assert_eq!(resolve_url("", &base()), "");
        assert_eq!(resolve_url("http://[::1", &base()), "http://[::1");
    }

    #[test]
    fn test_without_base_keeps_relative_urls() {
        let root = Node::fragment().with_child(Node::element_with_attrs("a", vec![("href", "/x")]));
        let clean = sanitize(&root, None);
        assert_eq!(clean.children[0].attr("href"), Some("/x"));
    }

    #[test]
    fn test_first_srcset_url() {
        assert_eq!(first_srcset_url(" a.png 1x, b.png 2x"), Some("a.png"));
        assert_eq!(first_srcset_url("data:image/gif;base64,R0lG 1x"), Some("data:image/gif;base64,R0lG"));
        assert_eq!(first_srcset_url("  "), None);
    }
}
