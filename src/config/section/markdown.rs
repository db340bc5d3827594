//! `[markdown]` section configuration.
//!
//! Knobs for the HTML to Markdown translation.
//!
//! # Example
//!
//! ```toml
//! [markdown]
//! highlight = ["csharp", "xml"]              # code classes rendered as highlight blocks
//! image_extensions = ["jpg", "jpeg", "png"]  # links to these become asset references
//! separator_class = "separator"              # div class rendered as a centered block
//! center_directive = "{:.center}"
//! table_class = "{:.table .table-striped}"   # attribute line emitted before tables
//! table_panel = false                        # wrap tables in a panel div
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Language hints (`<code class="...">` inside `<pre>`) that get a
    /// highlight block; other code blocks are indented.
    pub highlight: Vec<String>,

    /// Extensions (without dot, case-insensitive) of linked images.
    pub image_extensions: Vec<String>,

    /// `<div class="...">` rendered as a centered block.
    pub separator_class: String,

    /// Line emitted before the content of a separator div.
    pub center_directive: String,

    /// Block attribute line emitted before a table (empty to disable).
    pub table_class: String,

    /// Wrap tables in a panel `<div>`, with the caption as panel heading.
    pub table_panel: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            highlight: vec!["csharp".into(), "xml".into()],
            image_extensions: vec!["jpg".into(), "jpeg".into(), "png".into()],
            separator_class: "separator".into(),
            center_directive: "{:.center}".into(),
            table_class: "{:.table .table-striped}".into(),
            table_panel: false,
        }
    }
}

impl MarkdownConfig {
    pub const IMAGE_EXTENSIONS: FieldPath = FieldPath::new("markdown.image_extensions");
    pub const HIGHLIGHT: FieldPath = FieldPath::new("markdown.highlight");

    /// Whether a code class hint gets a highlight block.
    pub fn is_highlighted(&self, hint: &str) -> bool {
        self.highlight.iter().any(|h| h == hint)
    }

    /// Whether a link target names an image file.
    pub fn is_image_link(&self, href: &str) -> bool {
        let href = href.to_ascii_lowercase();
        self.image_extensions.iter().any(|ext| {
            href.strip_suffix(&ext.to_ascii_lowercase())
                .is_some_and(|rest| rest.ends_with('.'))
        })
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for ext in &self.image_extensions {
            if ext.starts_with('.') || ext.is_empty() {
                diag.error_with_hint(
                    Self::IMAGE_EXTENSIONS,
                    format!("invalid extension `{ext}`"),
                    "write extensions without the leading dot, e.g. `png`",
                );
            }
        }
        for hint in &self.highlight {
            if hint.trim().is_empty() || hint.contains(char::is_whitespace) {
                diag.error(Self::HIGHLIGHT, format!("invalid language `{hint}`"));
            }
        }
    }
}
