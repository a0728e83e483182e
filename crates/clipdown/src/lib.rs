//! # clipdown
//!
//! Turn a browser selection into a Markdown clipping entry.
//!
//! The conversion engine lives in [`clipdown_core`]; this crate wraps it in a
//! [`ClipService`] that owns the render options and the table alignment
//! capability, and adds what a clipper needs around the engine:
//!
//! - **Selection context**: clone a selection, render it, and package the
//!   Markdown with page metadata ([`SelectionContext`]).
//! - **Text fragments**: strip and regenerate `:~:text=` directives.
//! - **Templates**: fill `{{ placeholder }}` entry templates from a context.
//! - **HTML input** (`html` feature): parse HTML strings into the node tree.
//!
//! ## Example (Node-based)
//!
//! ```rust
//! use clipdown::{ClipService, Node};
//!
//! let service = ClipService::new();
//!
//! let mut h1 = Node::element("h1");
//! h1.add_child(Node::text("Hello World"));
//! let fragment = Node::fragment().with_child(h1);
//!
//! assert_eq!(service.markdown(&fragment, None), "# Hello World");
//! ```
//!
//! ## Example (selection context)
//!
//! ```rust
//! use clipdown::{ClipService, Node, PageInfo, TreeSelection};
//!
//! let document = Node::fragment()
//!     .with_child(Node::element("p").with_child(Node::text("Clipped text")));
//! let selection = TreeSelection::whole(&document);
//! let page = PageInfo::new("https://example.com/post", "A post");
//!
//! let context = ClipService::new().collect_context(&selection, &page).unwrap();
//! assert_eq!(context.markdown, "Clipped text");
//! assert_eq!(context.title, "A post");
//! ```

mod context;
mod fragment;
#[cfg(feature = "html")]
pub mod html;
pub mod selection;
mod service;
mod template;

pub use clipdown_core::{
    Alignment, AlignmentResolver, DeclaredAlignment, NoAlignment, Node, NodeType, Options,
};
pub use context::{LinkDescriptor, PageInfo, SelectionContext};
pub use fragment::{strip_text_directive, text_directive, with_text_directive};
#[cfg(feature = "html")]
pub use html::parse_html;
pub use selection::{Boundary, Range, Selection, TreeSelection};
pub use service::{ClipOptions, ClipService};
pub use template::{render_template, TemplateVariables};

/// Error type for clipping operations
#[derive(Debug, thiserror::Error)]
pub enum ClipError {
    #[error("No selection: nothing usable was selected")]
    NoSelection,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClipError>;
