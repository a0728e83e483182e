//! Table column alignment.
//!
//! Alignment can depend on computed styles only a live rendering engine knows,
//! so it is an injected capability rather than something the table layout
//! works out on its own.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::node::Node;

static TEXT_ALIGN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|;)\s*text-align\s*:\s*([a-z-]+)").expect("valid regex"));

/// Column alignment of a Markdown table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Map a CSS `text-align` value or an `align` attribute
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "center" | "-webkit-center" => Alignment::Center,
            "right" | "end" | "-webkit-right" => Alignment::Right,
            "left" | "start" | "-webkit-left" => Alignment::Left,
            _ => Alignment::None,
        }
    }

    /// Delimiter cell for the table's alignment row
    pub fn delimiter(self) -> &'static str {
        match self {
            Alignment::None => "---",
            Alignment::Left => ":---",
            Alignment::Center => ":---:",
            Alignment::Right => "---:",
        }
    }
}

/// Decides the alignment of a header cell
pub trait AlignmentResolver {
    fn resolve_alignment(&self, cell: &Node) -> Alignment;
}

impl<F> AlignmentResolver for F
where
    F: Fn(&Node) -> Alignment,
{
    fn resolve_alignment(&self, cell: &Node) -> Alignment {
        self(cell)
    }
}

/// Reads the `align` attribute, then an inline `text-align` style
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredAlignment;

impl AlignmentResolver for DeclaredAlignment {
    fn resolve_alignment(&self, cell: &Node) -> Alignment {
        declared_alignment(cell)
    }
}

/// Headless stub: every column is unaligned
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAlignment;

impl AlignmentResolver for NoAlignment {
    fn resolve_alignment(&self, _cell: &Node) -> Alignment {
        Alignment::None
    }
}

/// Alignment stated in the cell's own markup
pub fn declared_alignment(cell: &Node) -> Alignment {
    if let Some(align) = cell.attr("align") {
        let alignment = Alignment::from_keyword(align);
        if alignment != Alignment::None {
            return alignment;
        }
    }
    cell.attr("style")
        .and_then(|style| TEXT_ALIGN.captures(style))
        .and_then(|caps| caps.get(1))
        .map(|value| Alignment::from_keyword(value.as_str()))
        .unwrap_or_default()
}
