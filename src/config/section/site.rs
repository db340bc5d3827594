//! `[site]` section configuration.
//!
//! Describes the site the posts are imported into: which host counts as
//! "our own" blog, and how internal references are written.
//!
//! # Example
//!
//! ```toml
//! [site]
//! domain = "blog.example.com"              # host of the old blog
//! asset_url = "{{ site_url }}/assets"      # prefix for image references
//! post_link = "{% post_url {slug} %}"      # cross-post reference
//! missing_post_link = "{ % post_url TODO % }"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Placeholder replaced by the post slug in `post_link`.
pub const SLUG_PLACEHOLDER: &str = "{slug}";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Host name of the blog being imported (no scheme, no path).
    ///
    /// Links to this host are rewritten to cross-post references.
    pub domain: String,

    /// Prefix of resolved asset references.
    pub asset_url: String,

    /// Template for a resolved cross-post reference; `{slug}` is replaced
    /// by the destination file stem.
    pub post_link: String,

    /// Target written when a link points at a post that has not been
    /// converted, marking it for manual follow-up.
    pub missing_post_link: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            asset_url: "{{ site_url }}/assets".into(),
            post_link: "{% post_url {slug} %}".into(),
            missing_post_link: "{ % post_url TODO % }".into(),
        }
    }
}

impl SiteConfig {
    pub const DOMAIN: FieldPath = FieldPath::new("site.domain");
    pub const ASSET_URL: FieldPath = FieldPath::new("site.asset_url");
    pub const POST_LINK: FieldPath = FieldPath::new("site.post_link");

    /// Render the cross-post reference for a destination file stem.
    pub fn post_reference(&self, slug: &str) -> String {
        self.post_link.replace(SLUG_PLACEHOLDER, slug)
    }

    /// Render the reference for a local asset file.
    pub fn asset_reference(&self, filename: &str) -> String {
        format!("{}/{}", self.asset_url.trim_end_matches('/'), filename)
    }

    /// Validate site configuration.
    ///
    /// # Checks
    /// - `domain` is a bare host name
    /// - `asset_url` is not empty
    /// - `post_link` contains the `{slug}` placeholder
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.domain.is_empty() {
            diag.warn(
                Self::DOMAIN,
                "not set, links to the old blog are kept as external links",
            );
        } else if self.domain.contains("://") || self.domain.contains('/') {
            diag.error_with_hint(
                Self::DOMAIN,
                format!("`{}` is not a bare host name", self.domain),
                "use only the host, e.g. `blog.example.com`",
            );
        }

        if self.asset_url.trim().is_empty() {
            diag.error(Self::ASSET_URL, "must not be empty");
        }

        if !self.post_link.contains(SLUG_PLACEHOLDER) {
            diag.error_with_hint(
                Self::POST_LINK,
                format!("missing `{SLUG_PLACEHOLDER}` placeholder"),
                "e.g. `{% post_url {slug} %}`",
            );
        }
    }
}
