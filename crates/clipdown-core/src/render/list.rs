//! List layout: markers, numbering, task checkboxes and continuation lines.

use super::{Flow, RenderState, Renderer};
use crate::escape::leading_whitespace;
use crate::node::{Node, NodeType};

/// One rendered `<li>`
struct Item {
    checkbox: Option<bool>,
    content: String,
}

impl Item {
    fn is_usable(&self) -> bool {
        self.checkbox.is_some() || !self.content.is_empty()
    }
}

/// Largest ordinal CommonMark accepts in a list marker (nine digits)
const MAX_ORDINAL: u32 = 999_999_999;

impl Renderer<'_> {
    pub(crate) fn render_list(&self, node: &Node, state: RenderState, ordered: bool) -> String {
        let indent = " ".repeat(state.list_indent);
        let mut ordinal = if ordered { list_start(node) } else { 1 };
        let mut items = Vec::new();

        for li in node.element_children().filter(|child| child.tag_name() == "li") {
            let marker = if ordered {
                format!("{ordinal}. ")
            } else {
                format!("{} ", self.options.bullet_list_marker)
            };
            ordinal = ordinal.saturating_add(1).min(MAX_ORDINAL);
            let item = self.render_item(li, state, indent.len() + marker.len());
            items.push((marker, item));
        }
        if !items.iter().any(|(_, item)| item.is_usable()) {
            return String::new();
        }

        let mut lines = Vec::new();
        for (marker, item) in &items {
            layout_item(&mut lines, &indent, marker, item);
        }

        format!("{}\n\n", lines.join("\n"))
    }

    /// An `<li>` whose list was not part of the selection
    pub(crate) fn render_orphan_item(&self, node: &Node, state: RenderState) -> String {
        let indent = " ".repeat(state.list_indent);
        let marker = format!("{} ", self.options.bullet_list_marker);
        let item = self.render_item(node, state, indent.len() + marker.len());
        if !item.is_usable() {
            return String::new();
        }
        let mut lines = Vec::new();
        layout_item(&mut lines, &indent, &marker, &item);
        format!("{}\n\n", lines.join("\n"))
    }

    /// Render an item whose text starts at `column`
    fn render_item(&self, li: &Node, state: RenderState, column: usize) -> Item {
        let checkbox = task_checkbox(li);
        let content = self.render_children(li, state.nested_list(column), Flow::Block);
        Item {
            checkbox,
            content: content.trim().to_string(),
        }
    }
}

/// `start` attribute clamped to what a list marker can carry
fn list_start(node: &Node) -> u32 {
    let Some(raw) = node.attr("start").map(str::trim) else {
        return 1;
    };
    match raw.parse::<i64>() {
        Ok(start) => u32::try_from(start.clamp(0, i64::from(MAX_ORDINAL))).unwrap_or(MAX_ORDINAL),
        Err(_) if is_integer(raw.strip_prefix('-').unwrap_or("")) => 0,
        Err(_) if is_integer(raw.strip_prefix('+').unwrap_or(raw)) => MAX_ORDINAL,
        Err(_) => 1,
    }
}

fn is_integer(digits: &str) -> bool {
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Append the lines of one item: marker line first, then continuation lines
/// aligned under the item's text column.
fn layout_item(lines: &mut Vec<String>, indent: &str, marker: &str, item: &Item) {
    let task = match item.checkbox {
        Some(true) => "[x] ",
        Some(false) => "[ ] ",
        None => "",
    };

    let mut content_lines = item.content.split('\n');
    let first = content_lines.next().unwrap_or("");
    let head = format!("{indent}{marker}{task}{first}");
    lines.push(head.trim_end().to_string());

    let column = indent.len() + marker.len();
    let mut in_fence = false;

    for line in content_lines {
        if line.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let width = leading_whitespace(line);
        let opens_fence = width < column && is_fence(line);

        if in_fence || opens_fence {
            lines.push(format!("{}{}", " ".repeat(column), line));
            if opens_fence {
                in_fence = !in_fence;
            }
        } else if width >= column {
            lines.push(line.to_string());
        } else {
            lines.push(format!("{}{}", " ".repeat(column - width), line));
        }
    }
}

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// State of a checkbox leading the item, ignoring nested lists
fn task_checkbox(li: &Node) -> Option<bool> {
    for child in li.children() {
        match child.node_type {
            NodeType::Text if child.value.as_deref().unwrap_or("").trim().is_empty() => {}
            NodeType::Text => return None,
            NodeType::Element => {
                return match child.tag_name() {
                    "input" => is_checkbox(child).then(|| child.has_attr("checked")),
                    "ul" | "ol" => None,
                    _ => task_checkbox(child),
                };
            }
            _ => {}
        }
    }
    None
}

fn is_checkbox(input: &Node) -> bool {
    input
        .attr("type")
        .is_some_and(|kind| kind.eq_ignore_ascii_case("checkbox"))
}
