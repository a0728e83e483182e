//! Configuration options for Markdown rendering

use serde::{Deserialize, Serialize};

/// Options for Markdown rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Bullet list marker
    pub bullet_list_marker: char,

    /// Emphasis delimiter
    pub em_delimiter: char,

    /// Strong delimiter
    pub strong_delimiter: String,

    /// Horizontal rule string
    pub hr: String,

    /// Longest `data:` URI accepted as an image source. `None` keeps every
    /// embedded image regardless of size.
    pub max_data_uri_len: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            bullet_list_marker: '-',
            em_delimiter: '*',
            strong_delimiter: "**".to_string(),
            hr: "---".to_string(),
            max_data_uri_len: None,
        }
    }
}
