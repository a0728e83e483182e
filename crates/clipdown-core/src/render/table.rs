//! Table layout: header detection, colspan expansion, alignment and column
//! reconciliation.

use super::{Flow, RenderState, Renderer};
use crate::align::Alignment;
use crate::node::Node;

/// Upper bound HTML places on `colspan`
const MAX_COLSPAN: usize = 1000;

/// Stand-in for columns a row does not reach
const PLACEHOLDER_CELL: &str = " ";

impl Renderer<'_> {
    pub(crate) fn render_table(&self, node: &Node, state: RenderState) -> String {
        let mut rows = Vec::new();
        collect_rows(node, &mut rows);

        let rows: Vec<Vec<&Node>> = rows
            .into_iter()
            .map(|tr| tr.element_children().filter(|cell| is_cell(cell)).collect::<Vec<_>>())
            .filter(|cells| !cells.is_empty())
            .collect();
        if rows.is_empty() {
            return String::new();
        }

        let header_index = rows
            .iter()
            .position(|cells| cells.iter().any(|cell| cell.tag_name() == "th"))
            .unwrap_or(0);

        let mut header = Vec::new();
        let mut alignments = Vec::new();
        for cell in &rows[header_index] {
            let content = self.render_cell(cell, state);
            let alignment = self.aligner.resolve_alignment(cell);
            for _ in 0..colspan(cell) {
                header.push(content.clone());
                alignments.push(alignment);
            }
        }

        let body: Vec<Vec<String>> = rows
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != header_index)
            .map(|(_, cells)| self.expand_row(cells, state))
            .collect();

        let width = body
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);
        alignments.resize(width, Alignment::None);

        let mut lines = Vec::with_capacity(body.len() + 2);
        lines.push(table_row(header, width));
        lines.push(format!(
            "| {} |",
            alignments
                .iter()
                .map(|alignment| alignment.delimiter())
                .collect::<Vec<_>>()
                .join(" | ")
        ));
        for row in body {
            lines.push(table_row(row, width));
        }

        format!("{}\n\n", lines.join("\n"))
    }

    fn expand_row(&self, cells: &[&Node], state: RenderState) -> Vec<String> {
        let mut row = Vec::with_capacity(cells.len());
        for cell in cells {
            let content = self.render_cell(cell, state);
            row.extend(std::iter::repeat(content).take(colspan(cell)));
        }
        row
    }

    /// Cell content flattened onto one line
    fn render_cell(&self, cell: &Node, state: RenderState) -> String {
        let content = self.render_children(cell, state, Flow::Inline);
        escape_pipes(&content.trim().replace('\n', "<br>"))
    }
}

/// Backslash every `|` that is not already escaped, code spans included
fn escape_pipes(cell: &str) -> String {
    let mut out = String::with_capacity(cell.len());
    let mut backslashes = 0;
    for c in cell.chars() {
        if c == '|' && backslashes % 2 == 0 {
            out.push('\\');
        }
        backslashes = if c == '\\' { backslashes + 1 } else { 0 };
        out.push(c);
    }
    out
}

/// `<tr>` rows of this table in document order, skipping nested tables
fn collect_rows<'n>(node: &'n Node, rows: &mut Vec<&'n Node>) {
    for child in node.element_children() {
        match child.tag_name() {
            "tr" => rows.push(child),
            "table" => {}
            _ => collect_rows(child, rows),
        }
    }
}

fn is_cell(node: &Node) -> bool {
    matches!(node.tag_name(), "td" | "th")
}

fn colspan(cell: &Node) -> usize {
    cell.attr("colspan")
        .and_then(|span| span.trim().parse::<usize>().ok())
        .filter(|&span| span > 0)
        .unwrap_or(1)
        .min(MAX_COLSPAN)
}

fn table_row(mut cells: Vec<String>, width: usize) -> String {
    cells.resize(width, PLACEHOLDER_CELL.to_string());
    format!("| {} |", cells.join(" | "))
}
