//! Render a sanitized node tree to Markdown.
//!
//! One dispatcher ([`Renderer::render_node`]) maps each element to a [`Tag`]
//! category and hands it to the matching handler. Handlers live in the
//! submodules and call back into the dispatcher for their children.

mod block;
mod inline;
mod list;
mod table;

use crate::align::AlignmentResolver;
use crate::escape::collapse_blank_lines;
use crate::node::{Node, NodeType};
use crate::options::Options;
use crate::tag::Tag;

/// Nesting depths threaded through recursive rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderState {
    pub list_depth: usize,
    /// Column where the text of the enclosing list item starts
    pub list_indent: usize,
    pub blockquote_depth: usize,
}

impl RenderState {
    /// State for the content of a list item whose text starts at `column`
    pub fn nested_list(self, column: usize) -> Self {
        Self {
            list_depth: self.list_depth + 1,
            list_indent: column,
            ..self
        }
    }

    /// State for the content of a blockquote
    pub fn nested_quote(self) -> Self {
        Self {
            list_indent: 0,
            blockquote_depth: self.blockquote_depth + 1,
            ..self
        }
    }
}

/// Whether text is laid out as a single line run or keeps its line structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Inline,
    Block,
}

/// Markdown renderer over the source node tree
pub struct Renderer<'a> {
    options: &'a Options,
    aligner: &'a dyn AlignmentResolver,
}

impl<'a> Renderer<'a> {
    pub fn new(options: &'a Options, aligner: &'a dyn AlignmentResolver) -> Self {
        Self { options, aligner }
    }

    /// Render the children of a fragment root as a complete Markdown document
    pub fn render_fragment(&self, root: &Node) -> String {
        let output = self.render_children(root, RenderState::default(), Flow::Block);
        collapse_blank_lines(&output).trim().to_string()
    }

    /// Render a node as inline Markdown
    pub fn render_inline(&self, node: &Node, state: RenderState) -> String {
        self.render_node(node, state, Flow::Inline)
    }

    /// Render a node as block Markdown. Non-empty block output ends in a
    /// blank line.
    pub fn render_block(&self, node: &Node, state: RenderState) -> String {
        self.render_node(node, state, Flow::Block)
    }

    pub(crate) fn render_children(&self, parent: &Node, state: RenderState, flow: Flow) -> String {
        self.render_child_list(parent.children(), state, flow)
    }

    /// Concatenate rendered siblings, keeping block output on its own lines
    pub(crate) fn render_child_list<'n>(
        &self,
        children: impl Iterator<Item = &'n Node>,
        state: RenderState,
        flow: Flow,
    ) -> String {
        let mut output = String::new();
        let mut previous = None;

        for child in children {
            let part = self.render_node(child, state, flow);
            if part.is_empty() {
                continue;
            }

            let tag = child.is_element().then(|| Tag::of(child.tag_name()));
            let follows_item = previous == Some(Tag::ListItem);
            if !part.trim().is_empty() {
                previous = tag;
            }
            match tag {
                // consecutive orphan items stay one tight list
                Some(Tag::ListItem) if follows_item => {
                    let kept = output.trim_end().len();
                    output.truncate(kept);
                    output.push('\n');
                    output.push_str(&part);
                }
                Some(tag) if tag.is_block() => {
                    start_block(&mut output, block_separator(tag, state));
                    output.push_str(&part);
                }
                _ if output.ends_with('\n') => {
                    output.push_str(part.trim_start_matches([' ', '\t']));
                }
                _ if output.ends_with(' ') => output.push_str(part.trim_start_matches(' ')),
                _ => output.push_str(&part),
            }
        }

        match flow {
            Flow::Inline => output,
            Flow::Block => collapse_blank_lines(&output),
        }
    }

    pub(crate) fn render_node(&self, node: &Node, state: RenderState, flow: Flow) -> String {
        match node.node_type {
            NodeType::Text => return self.render_text(node, flow),
            NodeType::Comment => return String::new(),
            NodeType::DocumentFragment => return self.render_children(node, state, flow),
            NodeType::Element => {}
        }

        match Tag::of(node.tag_name()) {
            Tag::LineBreak => "\n".to_string(),
            Tag::Container | Tag::Summary => {
                let content = self.render_children(node, state, Flow::Inline);
                paragraph(content.trim())
            }
            Tag::Heading(level) => self.render_heading(node, level, state),
            Tag::Strong => {
                let delimiter = &self.options.strong_delimiter;
                self.render_delimited(node, state, delimiter)
            }
            Tag::Emphasis => {
                let delimiter = self.options.em_delimiter.to_string();
                self.render_delimited(node, state, &delimiter)
            }
            Tag::Strikethrough => self.render_delimited(node, state, "~~"),
            Tag::Highlight => self.render_delimited(node, state, "=="),
            Tag::Underline => self.render_delimited(node, state, "++"),
            Tag::Superscript => self.render_delimited(node, state, "^"),
            Tag::Subscript => self.render_delimited(node, state, "~"),
            Tag::Code => self.render_code_span(node),
            Tag::Preformatted => self.render_code_block(node),
            Tag::Anchor => self.render_link(node, state),
            Tag::Image => self.render_image(node),
            Tag::List { ordered } => self.render_list(node, state, ordered),
            Tag::ListItem => self.render_orphan_item(node, state),
            Tag::Blockquote => self.render_blockquote(node, state),
            Tag::Details => self.render_details(node, state),
            Tag::Figure => self.render_figure(node, state),
            Tag::Table | Tag::TableSection => self.render_table(node, state),
            Tag::Rule => format!("{}\n\n", self.options.hr),
            Tag::Input | Tag::Dropped => String::new(),
            Tag::Span => self.render_children(node, state, flow),
            Tag::Block => {
                let content = self.render_children(node, state, Flow::Block);
                paragraph(content.trim())
            }
            Tag::Inline => self.render_children(node, state, Flow::Inline),
        }
    }
}

/// Terminate non-empty block content with a blank line
pub(crate) fn paragraph(content: &str) -> String {
    if content.is_empty() {
        String::new()
    } else {
        format!("{content}\n\n")
    }
}

/// Newlines that must precede a block of the given kind
fn block_separator(tag: Tag, state: RenderState) -> &'static str {
    match tag {
        Tag::List { .. } if state.list_depth > 0 => "\n",
        _ => "\n\n",
    }
}

/// Make sure `output` ends with `separator` unless it is empty
fn start_block(output: &mut String, separator: &str) {
    let kept = output.trim_end_matches([' ', '\t']).len();
    output.truncate(kept);
    if output.is_empty() {
        return;
    }
    let wanted = separator.len();
    let present = output.len() - output.trim_end_matches('\n').len();
    for _ in present..wanted {
        output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::DeclaredAlignment;
    use pretty_assertions::assert_eq;

    fn render(root: &Node) -> String {
        let options = Options::default();
        Renderer::new(&options, &DeclaredAlignment).render_fragment(root)
    }

    fn el(tag: &str, children: Vec<Node>) -> Node {
        children
            .into_iter()
            .fold(Node::element(tag), |node, child| node.with_child(child))
    }

    #[test]
    fn test_state_nesting() {
        let state = RenderState::default();
        assert_eq!(state.nested_list(2).nested_list(4).list_depth, 2);
        assert_eq!(state.nested_list(2).nested_list(4).list_indent, 4);
        assert_eq!(state.nested_list(2).blockquote_depth, 0);
        assert_eq!(state.nested_quote().blockquote_depth, 1);
        assert_eq!(state.nested_list(3).nested_quote().list_indent, 0);
    }

    #[test]
    fn test_plain_text_fragment() {
        let root = Node::fragment().with_child(Node::text("  Price  *not*\tfinal  "));
        assert_eq!(render(&root), "Price \\*not\\* final");
    }

    #[test]
    fn test_paragraph_then_list() {
        let root = Node::fragment()
            .with_child(el("p", vec![Node::text("Hello "), el("strong", vec![Node::text("World")])]))
            .with_child(el(
                "ul",
                vec![el("li", vec![Node::text("One")]), el("li", vec![Node::text("Two")])],
            ));
        assert_eq!(render(&root), "Hello **World**\n\n- One\n- Two");
    }

    #[test]
    fn test_text_before_block_is_separated() {
        let root = Node::fragment().with_child(el(
            "div",
            vec![Node::text("Intro "), el("ul", vec![el("li", vec![Node::text("A")])])],
        ));
        assert_eq!(render(&root), "Intro\n\n- A");
    }

    #[test]
    fn test_empty_blocks_leave_no_gaps() {
        let root = Node::fragment()
            .with_child(el("p", vec![Node::text("a")]))
            .with_child(el("div", vec![Node::text("   ")]))
            .with_child(el("h2", vec![]))
            .with_child(el("p", vec![Node::text("b")]));
        assert_eq!(render(&root), "a\n\nb");
    }

    #[test]
    fn test_blank_line_runs_collapse() {
        let root = Node::fragment()
            .with_child(Node::text("a\n\n\n\n\nb"))
            .with_child(el("p", vec![Node::text("c")]));
        let output = render(&root);
        assert_eq!(output, "a\n\nb\n\nc");
        assert!(!output.contains("\n\n\n"));
    }

    #[test]
    fn test_unknown_elements_are_transparent() {
        let root = Node::fragment().with_child(el(
            "p",
            vec![el("abbr", vec![Node::text("HTML")]), Node::text(" rocks")],
        ));
        assert_eq!(render(&root), "HTML rocks");
    }

    #[test]
    fn test_unknown_block_element() {
        let root = Node::fragment()
            .with_child(el("dl", vec![el("dt", vec![Node::text("Term")])]))
            .with_child(Node::text("after"));
        assert_eq!(render(&root), "Term\n\nafter");
    }

    #[test]
    fn test_render_block_contract() {
        let options = Options::default();
        let renderer = Renderer::new(&options, &DeclaredAlignment);
        let p = el("p", vec![Node::text("text")]);
        assert_eq!(renderer.render_block(&p, RenderState::default()), "text\n\n");
        assert_eq!(renderer.render_block(&el("p", vec![]), RenderState::default()), "");
        assert_eq!(renderer.render_block(&Node::element("hr"), RenderState::default()), "---\n\n");
    }

    #[test]
    fn test_emphasis_edge_spaces_stay_outside() {
        let root = Node::fragment()
            .with_child(el("p", vec![Node::text("Hello"), el("strong", vec![Node::text(" World")])]))
            .with_child(el(
                "p",
                vec![
                    Node::text("a "),
                    el("em", vec![Node::text(" b ")]),
                    Node::text(" c"),
                ],
            ));
        assert_eq!(render(&root), "Hello **World**\n\na *b* c");
    }

    #[test]
    fn test_orphan_item_before_text() {
        let root = Node::fragment()
            .with_child(el("li", vec![Node::text("a")]))
            .with_child(Node::text("tail"));
        assert_eq!(render(&root), "- a\n\ntail");
    }

    #[test]
    fn test_line_break() {
        let root = Node::fragment().with_child(el(
            "p",
            vec![Node::text("one"), Node::element("br"), Node::text(" two")],
        ));
        assert_eq!(render(&root), "one\ntwo");
    }
}
