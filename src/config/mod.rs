//! Project configuration management for `blogport.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── site       # [site]
//! │   ├── import     # [import]
//! │   └── markdown   # [markdown]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # Config (this file)
//! ```
//!
//! # Sections
//!
//! | Section        | Purpose                                          |
//! |----------------|--------------------------------------------------|
//! | `[site]`       | Own domain, post/asset reference templates       |
//! | `[import]`     | Feed, posts, assets and log locations            |
//! | `[markdown]`   | Highlight languages, image links, table output   |
//! | `[series]`     | Feed category term -> series title               |

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{ImportConfig, MarkdownConfig, SiteConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{Cli, Commands, ConvertArgs},
    log,
};
use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing blogport.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Site the posts are imported into
    #[serde(default)]
    pub site: SiteConfig,

    /// Input and output locations
    #[serde(default)]
    pub import: ImportConfig,

    /// Translation settings
    #[serde(default)]
    pub markdown: MarkdownConfig,

    /// Known series, keyed by feed category term
    #[serde(default)]
    pub series: FxHashMap<String, String>,
}

impl Config {
    const SERIES: FieldPath = FieldPath::new("series");

    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. A missing file is not an
    /// error: defaults are used with the working directory as project root.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = path;
                config
            }
            None => {
                log!(
                    "hint";
                    "config file '{}' not found, using defaults",
                    cli.config.display()
                );
                Self {
                    config_path: cwd.join(&cli.config),
                    ..Self::default()
                }
            }
        };

        config.finalize(cli, &cwd);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Series title for the first tag that names a known series.
    pub fn series_for<'a>(&self, tags: impl IntoIterator<Item = &'a str>) -> Option<&str> {
        tags.into_iter()
            .find_map(|tag| self.series.get(tag))
            .map(String::as_str)
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Resolve paths against the config file's directory, then apply command options.
    fn finalize(&mut self, cli: &Cli, cwd: &Path) {
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.to_path_buf());
        let root = crate::utils::path::normalize_path(&root);

        self.apply_command_options(cli, cwd);
        self.import.normalize(&root);
        self.config_path = crate::utils::path::normalize_path(&self.config_path);
    }

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli, cwd: &Path) {
        match &cli.command {
            Commands::Convert { args } => self.apply_convert_args(args, cwd),
            Commands::Translate { .. } => {}
        }
    }

    /// CLI paths are relative to the working directory, not the project root.
    fn apply_convert_args(&mut self, args: &ConvertArgs, cwd: &Path) {
        let absolute = |path: &PathBuf| cwd.join(path);
        Self::update_option(&mut self.import.feed, args.feed.as_ref().map(absolute).as_ref());
        Self::update_option(&mut self.import.posts, args.posts.as_ref().map(absolute).as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate every section, reporting all errors at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);
        self.import.validate(&mut diag);
        self.markdown.validate(&mut diag);

        for (term, title) in &self.series {
            if title.trim().is_empty() {
                diag.error(Self::SERIES, format!("series `{term}` has an empty title"));
            }
        }

        diag.report_warnings();
        diag.into_result()?;
        Ok(())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse a config snippet.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> Config {
    let (parsed, ignored) = Config::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
