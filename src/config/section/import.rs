//! `[import]` section configuration.
//!
//! Input and output locations of a conversion run.
//!
//! # Example
//!
//! ```toml
//! [import]
//! feed = "blog.xml"       # Atom export of the old blog (relative to project root)
//! posts = "_posts"        # Output directory for converted posts
//! assets = "_assets"      # Local asset directory referenced by images
//! log = "log.txt"         # Diagnostic log written at the end of a run
//! layout = "post"         # Front matter `layout` value
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::path::resolve_path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Atom export file.
    pub feed: PathBuf,

    /// Directory converted posts are written to.
    pub posts: PathBuf,

    /// Directory for local assets (created, downloading is done elsewhere).
    pub assets: PathBuf,

    /// Diagnostic log file.
    pub log: PathBuf,

    /// Front matter layout name.
    pub layout: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            feed: "blog.xml".into(),
            posts: "_posts".into(),
            assets: "_assets".into(),
            log: "log.txt".into(),
            layout: "post".into(),
        }
    }
}

impl ImportConfig {
    pub const LAYOUT: FieldPath = FieldPath::new("import.layout");
    pub const POSTS: FieldPath = FieldPath::new("import.posts");

    /// Resolve all paths against the project root.
    pub fn normalize(&mut self, root: &Path) {
        self.feed = resolve_path(&self.feed, root);
        self.posts = resolve_path(&self.posts, root);
        self.assets = resolve_path(&self.assets, root);
        self.log = resolve_path(&self.log, root);
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.layout.trim().is_empty() {
            diag.error(Self::LAYOUT, "must not be empty");
        }
        if self.posts.as_os_str().is_empty() {
            diag.error(Self::POSTS, "must not be empty");
        }
    }
}
