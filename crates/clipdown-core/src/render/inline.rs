//! Inline handlers: text, emphasis-style spans, code spans, links, images.

use super::{Flow, RenderState, Renderer};
use crate::escape::{
    backtick_fence, collapse_whitespace, escape_markdown, escape_title, link_destination,
    normalize_block_text,
};
use crate::node::Node;
use crate::sanitize::{first_srcset_url, is_data_uri, IMAGE_SOURCE_ATTRIBUTES, IMAGE_SRCSET_ATTRIBUTES};

impl Renderer<'_> {
    pub(crate) fn render_text(&self, node: &Node, flow: Flow) -> String {
        let text = node.value.as_deref().unwrap_or("");
        if text.is_empty() {
            return String::new();
        }
        let normalized = match flow {
            Flow::Inline => collapse_whitespace(text),
            Flow::Block => normalize_block_text(text),
        };
        escape_markdown(&normalized)
    }

    /// Wrap trimmed inline content in `delimiter`; nothing for empty content
    pub(crate) fn render_delimited(&self, node: &Node, state: RenderState, delimiter: &str) -> String {
        let content = self.render_children(node, state, Flow::Inline);
        let inner = content.trim();
        if inner.is_empty() {
            return String::new();
        }
        // edge whitespace moves outside so the delimiters stay flanking
        let lead = if content.starts_with(char::is_whitespace) { " " } else { "" };
        let trail = if content.ends_with(char::is_whitespace) { " " } else { "" };
        format!("{lead}{delimiter}{inner}{delimiter}{trail}")
    }

    pub(crate) fn render_code_span(&self, node: &Node) -> String {
        let text = node.text_content();
        if text.is_empty() {
            return String::new();
        }
        let code = collapse_whitespace(&text);
        let fence = backtick_fence(&code, 1);
        if code.starts_with('`') || code.ends_with('`') {
            format!("{fence} {code} {fence}")
        } else {
            format!("{fence}{code}{fence}")
        }
    }

    pub(crate) fn render_link(&self, node: &Node, state: RenderState) -> String {
        let content = self.render_children(node, state, Flow::Inline);
        let label = content.trim();
        if label.is_empty() {
            return String::new();
        }

        let href = node.attr("href").map(str::trim).unwrap_or("");
        if href.is_empty() {
            return label.to_string();
        }

        format!(
            "[{}]({}{})",
            label,
            link_destination(href),
            title_segment(node)
        )
    }

    pub(crate) fn render_image(&self, node: &Node) -> String {
        let Some(src) = self.image_source(node) else {
            return String::new();
        };

        let alt = node
            .attr("alt")
            .or_else(|| node.attr("title"))
            .or_else(|| node.attr("aria-label"))
            .unwrap_or("");

        format!(
            "![{}]({}{})",
            escape_markdown(&collapse_whitespace(alt)),
            link_destination(src),
            title_segment(node)
        )
    }

    /// First usable source among the direct, lazy-load and srcset attributes
    fn image_source<'n>(&self, node: &'n Node) -> Option<&'n str> {
        let direct = IMAGE_SOURCE_ATTRIBUTES
            .iter()
            .filter_map(|&name| node.attr(name));
        let listed = IMAGE_SRCSET_ATTRIBUTES
            .iter()
            .filter_map(|&name| node.attr(name).and_then(first_srcset_url));

        direct
            .chain(listed)
            .map(str::trim)
            .find(|candidate| self.usable_source(candidate))
    }

    fn usable_source(&self, candidate: &str) -> bool {
        if candidate.is_empty() {
            return false;
        }
        match self.options.max_data_uri_len {
            Some(limit) if is_data_uri(candidate) && candidate.len() > limit => {
                tracing::debug!(len = candidate.len(), limit, "skipping oversized data URI");
                false
            }
            _ => true,
        }
    }
}

/// ` "title"` when the element carries a non-empty title
fn title_segment(node: &Node) -> String {
    match node.attr("title").map(str::trim) {
        Some(title) if !title.is_empty() => format!(" \"{}\"", escape_title(title)),
        _ => String::new(),
    }
}
