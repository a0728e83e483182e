//! clipdown-core - structural HTML-to-Markdown engine for clippings
//!
//! Takes a detached fragment (the cloned contents of a selection), cleans it
//! and renders it to Markdown in a single recursive pass.
//!
//! # Architecture
//!
//! ```text
//! Fragment ──▶ sanitize ──▶ clean Node tree ──▶ Renderer ──▶ Markdown String
//!                 │                               │
//!            base URL                     AlignmentResolver
//! ```
//!
//! # Example
//!
//! ```rust
//! use clipdown_core::{convert, DeclaredAlignment, Node, Options};
//! use url::Url;
//!
//! let fragment = Node::fragment().with_child(
//!     Node::element("p")
//!         .with_child(Node::text("See "))
//!         .with_child(
//!             Node::element_with_attrs("a", vec![("href", "/docs")])
//!                 .with_child(Node::text("the docs")),
//!         ),
//! );
//!
//! let base = Url::parse("https://example.com/guide/").unwrap();
//! let markdown = convert(&fragment, Some(&base), &Options::default(), &DeclaredAlignment);
//! assert_eq!(markdown, "See [the docs](https://example.com/docs)");
//! ```

mod align;
mod escape;
pub mod node;
mod options;
mod render;
mod sanitize;
mod tag;

use url::Url;

pub use align::{declared_alignment, Alignment, AlignmentResolver, DeclaredAlignment, NoAlignment};
pub use escape::{collapse_whitespace, escape_markdown};
pub use node::{Node, NodeType};
pub use options::Options;
pub use render::{RenderState, Renderer};
pub use sanitize::{resolve_url, sanitize};
pub use tag::{is_block, Tag, BLOCK_ELEMENTS};

/// Sanitize `fragment` against `base` and render it as a Markdown document.
pub fn convert(
    fragment: &Node,
    base: Option<&Url>,
    options: &Options,
    aligner: &dyn AlignmentResolver,
) -> String {
    let clean = sanitize(fragment, base);
    Renderer::new(options, aligner).render_fragment(&clean)
}
