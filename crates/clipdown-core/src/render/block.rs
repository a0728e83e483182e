//! Block handlers: headings, code blocks, blockquotes, details, figures.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{paragraph, Flow, RenderState, Renderer};
use crate::escape::backtick_fence;
use crate::node::Node;

static LANGUAGE_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|\s)(?:language|lang)-([\w+#-]+)").expect("valid regex"));

impl Renderer<'_> {
    pub(crate) fn render_heading(&self, node: &Node, level: u8, state: RenderState) -> String {
        let content = self.render_children(node, state, Flow::Inline);
        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }
        let hashes = "#".repeat(usize::from(level.clamp(1, 6)));
        format!("{hashes} {content}\n\n")
    }

    /// Fenced code block from the raw text of a `<pre>` (or its `<code>`)
    pub(crate) fn render_code_block(&self, node: &Node) -> String {
        let code_node = node
            .element_children()
            .next()
            .filter(|child| child.tag_name() == "code");

        let raw = code_node.unwrap_or(node).text_content();
        let code = raw.replace('\u{a0}', " ").replace("\r\n", "\n");
        let code = code.trim_end();
        if code.trim().is_empty() {
            return String::new();
        }

        let language = code_node
            .and_then(code_language)
            .or_else(|| code_language(node))
            .unwrap_or_default();
        let fence = backtick_fence(code, 3);

        format!("{fence}{language}\n{code}\n{fence}\n\n")
    }

    pub(crate) fn render_blockquote(&self, node: &Node, state: RenderState) -> String {
        let inner = state.nested_quote();
        let content = self.render_children(node, inner, Flow::Block);
        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }
        let prefix = ">".repeat(inner.blockquote_depth);
        format!("{}\n\n", quote_lines(content, &prefix))
    }

    /// `<details>` as a `[!details]` callout titled by its `<summary>`
    pub(crate) fn render_details(&self, node: &Node, state: RenderState) -> String {
        let summary = node
            .element_children()
            .find(|child| child.tag_name() == "summary")
            .map(|summary| self.render_children(summary, state, Flow::Inline))
            .unwrap_or_default();
        let summary = summary.trim();

        let body = self.render_child_list(
            node.children().filter(|child| child.tag_name() != "summary"),
            state.nested_quote(),
            Flow::Block,
        );
        let body = body.trim();

        if summary.is_empty() && body.is_empty() {
            return String::new();
        }

        let mut output = String::from("> [!details]");
        if !summary.is_empty() {
            output.push(' ');
            output.push_str(summary);
        }
        if !body.is_empty() {
            output.push('\n');
            output.push_str(&quote_lines(body, ">"));
        }
        output.push_str("\n\n");
        output
    }

    /// Figure content followed by its caption, each as its own paragraph
    pub(crate) fn render_figure(&self, node: &Node, state: RenderState) -> String {
        let caption = node
            .element_children()
            .find(|child| child.tag_name() == "figcaption")
            .map(|caption| self.render_children(caption, state, Flow::Inline))
            .unwrap_or_default();

        let content = self.render_child_list(
            node.children().filter(|child| child.tag_name() != "figcaption"),
            state,
            Flow::Block,
        );

        let parts: Vec<&str> = [content.trim(), caption.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect();
        paragraph(&parts.join("\n\n"))
    }
}

/// Prefix every line, blank ones included, with `prefix`
fn quote_lines(content: &str, prefix: &str) -> String {
    content
        .split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                prefix.to_string()
            } else {
                format!("{prefix} {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Language hint from a `language-xxx` class or a `data-language`/`data-lang`
/// attribute
fn code_language(node: &Node) -> Option<String> {
    if let Some(caps) = node.attr("class").and_then(|class| LANGUAGE_CLASS.captures(class)) {
        return Some(caps[1].to_string());
    }
    node.attr("data-language")
        .or_else(|| node.attr("data-lang"))
        .map(str::trim)
        .filter(|lang| !lang.is_empty() && !lang.contains(char::is_whitespace))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::NoAlignment;
    use crate::options::Options;
    use pretty_assertions::assert_eq;

    fn render(root: &Node) -> String {
        let options = Options::default();
        Renderer::new(&options, &NoAlignment).render_fragment(root)
    }

    fn wrap(tag: &str, text: &str) -> Node {
        Node::element(tag).with_child(Node::text(text))
    }

    #[test]
    fn test_headings() {
        assert_eq!(render(&Node::fragment().with_child(wrap("h1", "Title"))), "# Title");
        assert_eq!(render(&Node::fragment().with_child(wrap("h6", " Deep "))), "###### Deep");
        assert_eq!(render(&Node::fragment().with_child(wrap("h3", "  "))), "");
    }

    #[test]
    fn test_code_block_with_language() {
        let pre = Node::element("pre").with_child(
            Node::element_with_attrs("code", vec![("class", "hljs language-rust")])
                .with_child(Node::text("fn main() {\r\n    let x = *y;\r\n}\n\n  ")),
        );
        assert_eq!(
            render(&Node::fragment().with_child(pre)),
            "```rust\nfn main() {\n    let x = *y;\n}\n```"
        );
    }

    #[test]
    fn test_code_block_data_language() {
        let pre = Node::element_with_attrs("pre", vec![("data-lang", "python")])
            .with_child(Node::text("print('hi')"));
        assert_eq!(render(&Node::fragment().with_child(pre)), "```python\nprint('hi')\n```");
    }

    #[test]
    fn test_code_block_fence_negotiation() {
        let pre = Node::element("pre").with_child(wrap("code", "```\nnested\n```"));
        assert_eq!(
            render(&Node::fragment().with_child(pre)),
            "````\n```\nnested\n```\n````"
        );
    }

    #[test]
    fn test_empty_code_block() {
        let pre = Node::element("pre").with_child(wrap("code", " \n "));
        assert_eq!(render(&Node::fragment().with_child(pre)), "");
    }

    #[test]
    fn test_blockquote() {
        let quote = Node::element("blockquote")
            .with_child(wrap("p", "First"))
            .with_child(wrap("p", "Second"));
        assert_eq!(
            render(&Node::fragment().with_child(quote)),
            "> First\n>\n> Second"
        );
    }

    #[test]
    fn test_nested_blockquote_depth_prefix() {
        let quote = Node::element("blockquote")
            .with_child(wrap("p", "outer"))
            .with_child(Node::element("blockquote").with_child(wrap("p", "inner")));
        assert_eq!(
            render(&Node::fragment().with_child(quote)),
            "> outer\n>\n> >> inner"
        );
    }

    #[test]
    fn test_details() {
        let details = Node::element("details")
            .with_child(wrap("summary", "More info"))
            .with_child(wrap("p", "Line one"))
            .with_child(wrap("p", "Line two"));
        assert_eq!(
            render(&Node::fragment().with_child(details)),
            "> [!details] More info\n> Line one\n>\n> Line two"
        );
    }

    #[test]
    fn test_details_without_summary() {
        let details = Node::element("details").with_child(wrap("p", "Body"));
        assert_eq!(render(&Node::fragment().with_child(details)), "> [!details]\n> Body");
    }

    #[test]
    fn test_figure() {
        let figure = Node::element("figure")
            .with_child(Node::element_with_attrs("img", vec![("src", "/cat.png"), ("alt", "Cat")]))
            .with_child(wrap("figcaption", "A cat"));
        assert_eq!(
            render(&Node::fragment().with_child(figure)),
            "![Cat](/cat.png)\n\nA cat"
        );
    }

    #[test]
    fn test_figure_caption_only() {
        let figure = Node::element("figure").with_child(wrap("figcaption", "Only caption"));
        assert_eq!(render(&Node::fragment().with_child(figure)), "Only caption");
    }
}
