//! ClipService - the main entry point for turning selections into clippings.

use chrono::{DateTime, SecondsFormat, Utc};
use clipdown_core::{convert, escape_markdown, AlignmentResolver, DeclaredAlignment, Node, Options};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::context::{PageInfo, SelectionContext};
use crate::fragment::{strip_text_directive, with_text_directive};
use crate::selection::Selection;
use crate::{ClipError, Result};

/// Options for ClipService
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClipOptions {
    /// Markdown rendering options
    #[serde(flatten)]
    pub render: Options,

    /// Point `textFragmentUrl` at the selected text with a `:~:text=`
    /// directive instead of using the plain page URL
    pub text_fragment_directive: bool,

    /// Longest link text kept in a link descriptor, in characters
    pub link_text_limit: usize,
}

impl Default for ClipOptions {
    fn default() -> Self {
        Self {
            render: Options::default(),
            text_fragment_directive: false,
            link_text_limit: 120,
        }
    }
}

/// The main service for converting selections to Markdown clippings
pub struct ClipService {
    options: ClipOptions,
    aligner: Box<dyn AlignmentResolver + Send + Sync>,
}

impl Default for ClipService {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipService {
    /// Create a new ClipService with default options
    pub fn new() -> Self {
        Self::with_options(ClipOptions::default())
    }

    /// Create a ClipService with custom options
    pub fn with_options(options: ClipOptions) -> Self {
        Self {
            options,
            aligner: Box::new(DeclaredAlignment),
        }
    }

    /// Replace the table alignment capability (e.g. with one that reads
    /// computed styles from a live page)
    pub fn with_alignment_resolver<R>(mut self, resolver: R) -> Self
    where
        R: AlignmentResolver + Send + Sync + 'static,
    {
        self.aligner = Box::new(resolver);
        self
    }

    /// Convert a detached fragment to Markdown, resolving URLs against `base`
    pub fn markdown(&self, fragment: &Node, base: Option<&Url>) -> String {
        convert(fragment, base, &self.options.render, self.aligner.as_ref())
    }

    /// Convert an HTML snippet to Markdown
    #[cfg(feature = "html")]
    pub fn markdown_html(&self, html: &str, base: Option<&Url>) -> String {
        self.markdown(&crate::html::parse_html(html), base)
    }

    /// Build the clipping context for `selection` on `page`, stamped now
    pub fn collect_context<S>(&self, selection: &S, page: &PageInfo) -> Result<SelectionContext>
    where
        S: Selection + ?Sized,
    {
        self.collect_context_at(selection, page, Utc::now())
    }

    /// Build the clipping context for `selection` on `page`, stamped `now`.
    ///
    /// Fails with [`ClipError::NoSelection`] when there is no range or the
    /// range yields neither text nor Markdown, and with
    /// [`ClipError::InvalidInput`] when the page location is not a URL.
    pub fn collect_context_at<S>(
        &self,
        selection: &S,
        page: &PageInfo,
        now: DateTime<Utc>,
    ) -> Result<SelectionContext>
    where
        S: Selection + ?Sized,
    {
        if !selection.has_range() {
            return Err(ClipError::NoSelection);
        }

        let mut source = Url::parse(&page.location)
            .map_err(|err| ClipError::InvalidInput(format!("location {:?}: {err}", page.location)))?;
        let base = document_base(page, &source);

        let markdown = self.selection_markdown(selection, &base);
        let selection_text = selection.text().trim().to_string();
        if selection_text.is_empty() && markdown.is_empty() {
            return Err(ClipError::NoSelection);
        }

        let link = selection.nearest_link(Some(&base), self.options.link_text_limit);

        strip_text_directive(&mut source);
        let text_fragment_url = if self.options.text_fragment_directive {
            with_text_directive(&source, &selection_text).to_string()
        } else {
            source.to_string()
        };

        let markdown = if markdown.is_empty() { selection_text.clone() } else { markdown };
        let selection_text = if selection_text.is_empty() { markdown.clone() } else { selection_text };
        let title = page_title(page, &source);

        tracing::debug!(
            markdown_len = markdown.len(),
            has_link = link.is_some(),
            url = %source,
            "collected selection context"
        );

        Ok(SelectionContext {
            selection_text,
            markdown,
            base_url: source.to_string(),
            title,
            created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            text_fragment_url,
            link,
        })
    }

    /// Escape markdown special characters in a string
    pub fn escape(&self, text: &str) -> String {
        escape_markdown(text)
    }

    /// Get the current options
    pub fn options(&self) -> &ClipOptions {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut ClipOptions {
        &mut self.options
    }

    /// Rendered Markdown of the selection; the plain text when nothing was
    /// cloned
    fn selection_markdown<S>(&self, selection: &S, base: &Url) -> String
    where
        S: Selection + ?Sized,
    {
        match selection.clone_contents() {
            Some(fragment) if !fragment.children.is_empty() => self.markdown(&fragment, Some(base)),
            _ => selection.text().trim().to_string(),
        }
    }
}

/// URL relative links resolve against: the page's base URI when it parses,
/// the location otherwise
fn document_base(page: &PageInfo, location: &Url) -> Url {
    let Some(base_uri) = page.base_uri.as_deref() else {
        return location.clone();
    };
    match location.join(base_uri) {
        Ok(base) => base,
        Err(err) => {
            tracing::debug!(base_uri, error = %err, "ignoring unusable base URI");
            location.clone()
        }
    }
}

fn page_title(page: &PageInfo, location: &Url) -> String {
    let title = page.title.trim();
    if !title.is_empty() {
        return title.to_string();
    }
    match location.host_str() {
        Some(host) if !host.is_empty() => host.to_string(),
        _ => location.to_string(),
    }
}
