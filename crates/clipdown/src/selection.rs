//! Selections over a document tree.
//!
//! [`Selection`] is what the context builder needs from a host selection:
//! the cloned contents, the plain text, and the nearest link. Browser bridges
//! implement it over the live DOM; [`TreeSelection`] implements it over an
//! owned [`Node`] tree with DOM range semantics.

use std::cmp::Ordering;

use url::Url;

use crate::context::LinkDescriptor;
use crate::{ClipError, Node, NodeType, Result};

/// A host selection
pub trait Selection {
    /// Whether the selection has a range at all
    fn has_range(&self) -> bool;

    /// Detached copy of the selected nodes as a document fragment
    fn clone_contents(&self) -> Option<Node>;

    /// Plain text of the selection
    fn text(&self) -> String;

    /// Link enclosing or next to the selection. `base` resolves relative
    /// hrefs; link text is cut to `text_limit` characters.
    fn nearest_link(&self, base: Option<&Url>, text_limit: usize) -> Option<LinkDescriptor>;
}

/// A range endpoint: a node addressed by child indices from the document
/// root, and an offset into it (characters for text, children otherwise)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Boundary {
    pub path: Vec<usize>,
    pub offset: usize,
}

impl Boundary {
    pub fn new(path: Vec<usize>, offset: usize) -> Self {
        Self { path, offset }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Range {
    pub start: Boundary,
    pub end: Boundary,
}

impl Range {
    pub fn new(start: Boundary, end: Boundary) -> Self {
        Self { start, end }
    }

    /// Path of the deepest node containing both boundaries
    fn common_ancestor(&self) -> Vec<usize> {
        self.start
            .path
            .iter()
            .zip(&self.end.path)
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| *a)
            .collect()
    }
}

/// Boundary relative to the node currently being cloned
#[derive(Clone, Copy)]
struct Edge<'p> {
    path: &'p [usize],
    offset: usize,
}

impl<'p> Edge<'p> {
    fn of(boundary: &'p Boundary, depth: usize) -> Self {
        Self {
            path: &boundary.path[depth..],
            offset: boundary.offset,
        }
    }

    /// Same boundary seen from the child it descends into
    fn descend(self) -> Self {
        Self {
            path: &self.path[1..],
            offset: self.offset,
        }
    }
}

/// A selection over an owned document tree
#[derive(Debug, Clone)]
pub struct TreeSelection<'a> {
    document: &'a Node,
    range: Option<Range>,
}

impl<'a> TreeSelection<'a> {
    /// Select `range` within `document`; `None` is a selection without a
    /// range. Boundaries must address existing nodes, offsets must fit their
    /// node, and the start must not come after the end.
    pub fn new(document: &'a Node, range: Option<Range>) -> Result<Self> {
        if let Some(range) = &range {
            validate(document, &range.start)?;
            validate(document, &range.end)?;
            if compare(&range.start, &range.end) == Ordering::Greater {
                return Err(ClipError::InvalidInput(
                    "range start comes after its end".to_string(),
                ));
            }
        }
        Ok(Self { document, range })
    }

    /// Select every child of `document`
    pub fn whole(document: &'a Node) -> Self {
        let range = Range::new(Boundary::default(), Boundary::new(Vec::new(), document.children.len()));
        Self {
            document,
            range: Some(range),
        }
    }

    pub fn range(&self) -> Option<&Range> {
        self.range.as_ref()
    }

    /// Closest `a[href]` at or above the node at `path`
    fn closest_anchor(&self, path: &[usize]) -> Option<&'a Node> {
        (0..=path.len())
            .rev()
            .filter_map(|len| self.document.descendant(&path[..len]))
            .find(|node| is_link(node))
    }

    /// Path of the nearest element containing the common ancestor
    fn common_container(&self, range: &Range) -> Vec<usize> {
        let mut path = range.common_ancestor();
        let is_element = self
            .document
            .descendant(&path)
            .is_some_and(|node| node.node_type != NodeType::Text);
        if !is_element {
            path.pop();
        }
        path
    }
}

impl Selection for TreeSelection<'_> {
    fn has_range(&self) -> bool {
        self.range.is_some()
    }

    fn clone_contents(&self) -> Option<Node> {
        let range = self.range.as_ref()?;
        let common = range.common_ancestor();
        let root = self.document.descendant(&common)?;
        let start = Edge::of(&range.start, common.len());
        let end = Edge::of(&range.end, common.len());

        let mut fragment = Node::fragment();
        if start.path.is_empty() && end.path.is_empty() && is_character_data(root) {
            fragment.add_child(slice_text(root, start.offset, end.offset));
        } else {
            fragment.children = clone_between(root, Some(start), Some(end));
        }
        Some(fragment)
    }

    fn text(&self) -> String {
        self.clone_contents()
            .map(|fragment| fragment.text_content())
            .unwrap_or_default()
    }

    fn nearest_link(&self, base: Option<&Url>, text_limit: usize) -> Option<LinkDescriptor> {
        let range = self.range.as_ref()?;

        let enclosing = [
            range.start.path.clone(),
            range.end.path.clone(),
            range.common_ancestor(),
        ]
        .iter()
        .find_map(|path| self.closest_anchor(path));

        let anchor = enclosing.or_else(|| {
            let container_path = self.common_container(range);
            let container = self.document.descendant(&container_path)?;
            first_link(container).or_else(|| {
                let parent_path = container_path.split_last().map(|(_, parent)| parent)?;
                self.document.descendant(parent_path).and_then(first_link)
            })
        })?;

        LinkDescriptor::from_anchor(anchor, base, text_limit)
    }
}

/// Children of `node` between `start` and `end`; `None` means unbounded
fn clone_between(node: &Node, start: Option<Edge>, end: Option<Edge>) -> Vec<Node> {
    let count = node.children.len();
    let (first, partial_start) = match start {
        None => (0, None),
        Some(edge) if edge.path.is_empty() => (edge.offset, None),
        Some(edge) => (edge.path[0], Some(edge)),
    };
    let (last, partial_end) = match end {
        None => (count, None),
        Some(edge) if edge.path.is_empty() => (edge.offset, None),
        Some(edge) => (edge.path[0] + 1, Some(edge)),
    };

    let mut cloned = Vec::new();
    for (index, child) in node.children.iter().enumerate().take(last.min(count)).skip(first) {
        let start_here = partial_start.filter(|edge| edge.path[0] == index).map(Edge::descend);
        let end_here = partial_end.filter(|edge| edge.path[0] == index).map(Edge::descend);
        if start_here.is_none() && end_here.is_none() {
            cloned.push(child.clone());
        } else {
            cloned.push(clone_partial(child, start_here, end_here));
        }
    }
    cloned
}

/// Clone a node the range only partly covers
fn clone_partial(node: &Node, start: Option<Edge>, end: Option<Edge>) -> Node {
    if is_character_data(node) {
        let from = start.map_or(0, |edge| edge.offset);
        let to = end.map_or(usize::MAX, |edge| edge.offset);
        return slice_text(node, from, to);
    }
    let mut clone = node.shallow_clone();
    clone.children = clone_between(node, start, end);
    clone
}

fn slice_text(node: &Node, from: usize, to: usize) -> Node {
    let mut clone = node.shallow_clone();
    let value = node.value.as_deref().unwrap_or("");
    let sliced: String = value.chars().take(to).skip(from).collect();
    clone.value = Some(sliced);
    clone
}

fn is_character_data(node: &Node) -> bool {
    matches!(node.node_type, NodeType::Text | NodeType::Comment)
}

fn is_link(node: &Node) -> bool {
    node.tag_name() == "a" && node.attr("href").is_some_and(|href| !href.trim().is_empty())
}

/// First `a[href]` below `node` in document order
fn first_link(node: &Node) -> Option<&Node> {
    node.element_children()
        .find_map(|child| if is_link(child) { Some(child) } else { first_link(child) })
}

fn validate(document: &Node, boundary: &Boundary) -> Result<()> {
    let node = document.descendant(&boundary.path).ok_or_else(|| {
        ClipError::InvalidInput(format!("no node at path {:?}", boundary.path))
    })?;
    let limit = if is_character_data(node) {
        node.value.as_deref().unwrap_or("").chars().count()
    } else {
        node.children.len()
    };
    if boundary.offset > limit {
        return Err(ClipError::InvalidInput(format!(
            "offset {} exceeds length {} at path {:?}",
            boundary.offset, limit, boundary.path
        )));
    }
    Ok(())
}

/// Document order of two boundaries
fn compare(a: &Boundary, b: &Boundary) -> Ordering {
    for (x, y) in a.path.iter().zip(&b.path) {
        if x != y {
            return x.cmp(y);
        }
    }
    match a.path.len().cmp(&b.path.len()) {
        Ordering::Equal => a.offset.cmp(&b.offset),
        // `a` sits in an ancestor of `b`'s node, before or after the child
        // `b` descends into
        Ordering::Less => {
            if a.offset <= b.path[a.path.len()] {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
        Ordering::Greater => compare(b, a).reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// `<p>Hello <b>bold</b> world</p><p><a href="/x">link</a> tail</p>`
    fn document() -> Node {
        Node::fragment()
            .with_child(
                Node::element("p")
                    .with_child(Node::text("Hello "))
                    .with_child(Node::element("b").with_child(Node::text("bold")))
                    .with_child(Node::text(" world")),
            )
            .with_child(
                Node::element("p")
                    .with_child(
                        Node::element_with_attrs("a", vec![("href", "/x")]).with_child(Node::text("link")),
                    )
                    .with_child(Node::text(" tail")),
            )
    }

    fn select(doc: &Node, start: (Vec<usize>, usize), end: (Vec<usize>, usize)) -> TreeSelection<'_> {
        let range = Range::new(Boundary::new(start.0, start.1), Boundary::new(end.0, end.1));
        TreeSelection::new(doc, Some(range)).unwrap()
    }

    #[test]
    fn test_within_one_text_node() {
        let doc = document();
        let selection = select(&doc, (vec![0, 0], 1), (vec![0, 0], 4));
        let fragment = selection.clone_contents().unwrap();
        assert_eq!(fragment.children, vec![Node::text("ell")]);
        assert_eq!(selection.text(), "ell");
    }

    #[test]
    fn test_partial_element_is_shallow_cloned() {
        let doc = document();
        let selection = select(&doc, (vec![0, 1, 0], 2), (vec![0, 2], 3));
        let fragment = selection.clone_contents().unwrap();
        let expected = vec![
            Node::element("b").with_child(Node::text("ld")),
            Node::text(" wo"),
        ];
        assert_eq!(fragment.children, expected);
    }

    #[test]
    fn test_across_paragraphs() {
        let doc = document();
        let selection = select(&doc, (vec![0, 2], 1), (vec![1, 0, 0], 2));
        let fragment = selection.clone_contents().unwrap();
        assert_eq!(fragment.children.len(), 2);
        assert_eq!(fragment.children[0].text_content(), "world");
        assert_eq!(fragment.children[1].text_content(), "li");
        assert_eq!(fragment.children[1].children[0].attr("href"), Some("/x"));
    }

    #[test]
    fn test_element_offsets() {
        let doc = document();
        let selection = select(&doc, (vec![], 1), (vec![], 2));
        let fragment = selection.clone_contents().unwrap();
        assert_eq!(fragment.children, vec![doc.children[1].clone()]);
    }

    #[test]
    fn test_whole_document() {
        let doc = document();
        let selection = TreeSelection::whole(&doc);
        assert_eq!(selection.text(), "Hello bold worldlink tail");
    }

    #[test]
    fn test_without_range() {
        let doc = document();
        let selection = TreeSelection::new(&doc, None).unwrap();
        assert!(!selection.has_range());
        assert_eq!(selection.clone_contents(), None);
        assert_eq!(selection.text(), "");
        assert_eq!(selection.nearest_link(None, 120), None);
    }

    #[test]
    fn test_invalid_ranges() {
        let doc = document();
        let bad_path = Range::new(Boundary::new(vec![5], 0), Boundary::new(vec![0], 0));
        assert!(matches!(
            TreeSelection::new(&doc, Some(bad_path)),
            Err(ClipError::InvalidInput(_))
        ));

        let bad_offset = Range::new(Boundary::new(vec![0, 0], 0), Boundary::new(vec![0, 0], 99));
        assert!(TreeSelection::new(&doc, Some(bad_offset)).is_err());

        let reversed = Range::new(Boundary::new(vec![1], 0), Boundary::new(vec![0, 0], 1));
        assert!(TreeSelection::new(&doc, Some(reversed)).is_err());
    }

    #[test]
    fn test_boundary_order() {
        let parent = Boundary::new(vec![0], 1);
        assert_eq!(compare(&parent, &Boundary::new(vec![0, 1, 0], 0)), Ordering::Less);
        assert_eq!(compare(&parent, &Boundary::new(vec![0, 0], 3)), Ordering::Greater);
        assert_eq!(compare(&Boundary::new(vec![0, 2], 0), &parent), Ordering::Greater);
    }

    #[test]
    fn test_link_enclosing_selection() {
        let doc = document();
        let base = Url::parse("https://example.com/docs/").unwrap();
        let selection = select(&doc, (vec![1, 0, 0], 0), (vec![1, 0, 0], 2));
        let link = selection.nearest_link(Some(&base), 120).unwrap();
        assert_eq!(link.href, "https://example.com/x");
        assert_eq!(link.text, "link");
    }

    #[test]
    fn test_link_inside_common_container() {
        let doc = document();
        let selection = select(&doc, (vec![1, 1], 1), (vec![1, 1], 3));
        let link = selection.nearest_link(None, 120).unwrap();
        assert_eq!(link.href, "/x");
    }

    #[test]
    fn test_link_in_parent_of_container() {
        let doc = document();
        let selection = select(&doc, (vec![0, 0], 0), (vec![0, 2], 2));
        assert_eq!(selection.nearest_link(None, 2).unwrap().text, "li");
    }

    #[test]
    fn test_no_link_anywhere() {
        let doc = Node::fragment().with_child(Node::element("p").with_child(Node::text("plain")));
        let selection = select(&doc, (vec![0, 0], 0), (vec![0, 0], 5));
        assert_eq!(selection.nearest_link(None, 120), None);
    }
}
