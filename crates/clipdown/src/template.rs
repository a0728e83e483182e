//! Entry templates: `{{ placeholder }}` substitution from a clipping context.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::context::SelectionContext;
use crate::{ClipError, Result};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([a-zA-Z0-9_]+)\s*\}\}").expect("valid regex"));

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Values an entry template may reference, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVariables(IndexMap<String, String>);

impl TemplateVariables {
    /// Variables for one clipping. Local timestamps are rendered in `tz`;
    /// `folder` is the name of the directory the entry is filed under.
    pub fn from_context<Tz>(context: &SelectionContext, tz: &Tz, folder: &str) -> Result<Self>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let created = DateTime::parse_from_rfc3339(&context.created_at)
            .map_err(|err| {
                ClipError::InvalidInput(format!("createdAt {:?}: {err}", context.created_at))
            })?
            .with_timezone(&Utc);

        let local = created.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string();
        let iso = created.to_rfc3339_opts(SecondsFormat::Millis, true);
        let url = if context.text_fragment_url.is_empty() {
            &context.base_url
        } else {
            &context.text_fragment_url
        };

        let mut vars = Self::default();
        for key in ["time", "createdAt", "updatedAt"] {
            vars.insert(key, &local);
        }
        for key in ["isoTime", "isoCreatedAt", "isoUpdatedAt"] {
            vars.insert(key, &iso);
        }
        vars.insert("title", &context.title);
        vars.insert("url", url);
        vars.insert("baseUrl", &context.base_url);
        vars.insert("content", context.markdown.trim());
        vars.insert("folder", folder);
        Ok(vars)
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Replace every `{{ key }}` in `template`; unknown keys become empty.
pub fn render_template(template: &str, vars: &TemplateVariables) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            vars.get(&caps[1]).unwrap_or_default().to_string()
        })
        .into_owned()
}
