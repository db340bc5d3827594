//! Configuration section definitions.
//!
//! Each module corresponds to a section in `blogport.toml`:
//!
//! | Module     | TOML Section   | Purpose                                |
//! |------------|----------------|----------------------------------------|
//! | `site`     | `[site]`       | Own domain, reference templates        |
//! | `import`   | `[import]`     | Feed, output and log locations         |
//! | `markdown` | `[markdown]`   | Translation knobs                      |
//!
//! `[series]` is a plain table (category term -> series title) and lives on
//! the root config.

mod import;
mod markdown;
mod site;

pub use import::ImportConfig;
pub use markdown::MarkdownConfig;
pub use site::SiteConfig;
