//! Element categories the renderer dispatches on.

/// Block-level HTML elements. Unknown elements outside this set are treated as
/// transparent inline wrappers.
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "dd", "details", "dir", "div", "dl",
    "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hgroup", "hr", "li", "main", "menu", "nav", "ol", "p", "pre", "section",
    "summary", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Check if a tag is a block-level element
pub fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str())
}

/// Normalized element category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    LineBreak,
    /// Paragraph-like container rendered as one inline run
    Container,
    Heading(u8),
    Strong,
    Emphasis,
    Strikethrough,
    Highlight,
    Underline,
    Superscript,
    Subscript,
    Code,
    Preformatted,
    Anchor,
    Image,
    List { ordered: bool },
    ListItem,
    Blockquote,
    Details,
    Summary,
    Figure,
    Table,
    /// `thead`/`tbody`/`tfoot` met outside a table
    TableSection,
    Rule,
    Input,
    Span,
    /// Content that never reaches Markdown
    Dropped,
    /// Any other block-level element
    Block,
    /// Any other element, treated as a transparent wrapper
    Inline,
}

impl Tag {
    pub fn of(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "br" => Tag::LineBreak,
            "p" | "div" | "section" | "article" | "header" | "footer" | "main" | "aside"
            | "nav" | "figcaption" => Tag::Container,
            "h1" => Tag::Heading(1),
            "h2" => Tag::Heading(2),
            "h3" => Tag::Heading(3),
            "h4" => Tag::Heading(4),
            "h5" => Tag::Heading(5),
            "h6" => Tag::Heading(6),
            "strong" | "b" => Tag::Strong,
            "em" | "i" => Tag::Emphasis,
            "del" | "s" => Tag::Strikethrough,
            "mark" => Tag::Highlight,
            "u" | "ins" => Tag::Underline,
            "sup" => Tag::Superscript,
            "sub" => Tag::Subscript,
            "code" => Tag::Code,
            "pre" => Tag::Preformatted,
            "a" => Tag::Anchor,
            "img" => Tag::Image,
            "ul" => Tag::List { ordered: false },
            "ol" => Tag::List { ordered: true },
            "li" => Tag::ListItem,
            "blockquote" => Tag::Blockquote,
            "details" => Tag::Details,
            "summary" => Tag::Summary,
            "figure" => Tag::Figure,
            "table" => Tag::Table,
            "thead" | "tbody" | "tfoot" => Tag::TableSection,
            "hr" => Tag::Rule,
            "input" => Tag::Input,
            "span" => Tag::Span,
            "script" | "style" | "noscript" | "template" => Tag::Dropped,
            other if is_block(other) => Tag::Block,
            _ => Tag::Inline,
        }
    }

    /// Whether the element's output occupies its own block
    pub fn is_block(self) -> bool {
        matches!(
            self,
            Tag::Container
                | Tag::Heading(_)
                | Tag::Preformatted
                | Tag::List { .. }
                | Tag::ListItem
                | Tag::Blockquote
                | Tag::Details
                | Tag::Summary
                | Tag::Figure
                | Tag::Table
                | Tag::TableSection
                | Tag::Rule
                | Tag::Block
        )
    }
}
