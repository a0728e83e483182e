//! Records exchanged with the host: page metadata in, clipping context out.

use clipdown_core::{collapse_whitespace, resolve_url};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Node, Result};

/// What the host page tells us about itself
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Current location (`window.location.href`)
    pub location: String,

    /// Document title, possibly empty
    #[serde(default)]
    pub title: String,

    /// Base URI for resolving relative links when it differs from the
    /// location (e.g. a `<base href>` element)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_uri: Option<String>,
}

impl PageInfo {
    pub fn new(location: &str, title: &str) -> Self {
        Self {
            location: location.to_string(),
            title: title.to_string(),
            base_uri: None,
        }
    }

    pub fn with_base_uri(mut self, base_uri: &str) -> Self {
        self.base_uri = Some(base_uri.to_string());
        self
    }
}

/// Hyperlink found in or next to the selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDescriptor {
    pub href: String,
    pub text: String,
}

impl LinkDescriptor {
    /// Describe an `<a>` element: its href resolved against `base`, and its
    /// collapsed text cut to `text_limit` characters (the href when empty).
    /// Anchors without an href describe nothing.
    pub fn from_anchor(anchor: &Node, base: Option<&Url>, text_limit: usize) -> Option<Self> {
        let raw = anchor.attr("href").map(str::trim).filter(|href| !href.is_empty())?;
        let href = match base {
            Some(base) => resolve_url(raw, base),
            None => raw.to_string(),
        };

        let text: String = collapse_whitespace(&anchor.text_content())
            .trim()
            .chars()
            .take(text_limit)
            .collect();
        let text = if text.is_empty() { href.clone() } else { text };

        Some(Self { href, text })
    }
}

/// One clipping, ready for the persistence layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionContext {
    /// Plain selected text, or the Markdown when the selection had no text
    pub selection_text: String,

    /// Rendered Markdown, or the plain text when rendering produced nothing
    pub markdown: String,

    /// Page URL with any text directive removed
    pub base_url: String,

    pub title: String,

    /// ISO-8601 creation time in UTC
    pub created_at: String,

    pub text_fragment_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkDescriptor>,
}

impl SelectionContext {
    /// Serialize to the camelCase JSON shape hosts exchange
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
