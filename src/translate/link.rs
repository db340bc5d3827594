//! Link and image target resolution.
//!
//! [`LinkResolver::resolve`] is a pure function of the href, the site
//! configuration and the [`PostIndex`]; it reports what it decided and leaves
//! logging to the caller.

use percent_encoding::percent_decode_str;
use std::collections::BTreeSet;
use std::io;
use std::path::Path;
use url::Url;

use crate::config::{MarkdownConfig, SiteConfig};

// ============================================================================
// Post index
// ============================================================================

/// File stems of posts already present in the output directory.
///
/// Sorted, so a lookup that matches several stems always picks the same one.
#[derive(Debug, Clone, Default)]
pub struct PostIndex {
    stems: BTreeSet<String>,
}

impl PostIndex {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn from_stems<I, S>(stems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stems: stems.into_iter().map(Into::into).collect(),
        }
    }

    /// Index the file stems of a directory. A missing directory is empty.
    pub fn scan(dir: &Path) -> io::Result<Self> {
        let mut index = Self::new();
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(index),
            Err(err) => return Err(err),
        };

        for entry in entries {
            let path = entry?.path();
            if path.is_file()
                && let Some(stem) = path.file_stem()
            {
                index.insert(stem.to_string_lossy());
            }
        }
        Ok(index)
    }

    pub fn insert(&mut self, stem: impl Into<String>) {
        self.stems.insert(stem.into());
    }

    /// First stem ending with `needle` (a post slug without date prefix).
    pub fn find(&self, needle: &str) -> Option<&str> {
        if needle.is_empty() {
            return None;
        }
        self.stems
            .iter()
            .find(|stem| stem.ends_with(needle))
            .map(String::as_str)
    }
}

// ============================================================================
// Resolution
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// `<a href>`
    Anchor,
    /// `<img src>`
    Image,
}

/// Where a link ends up pointing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    /// Another converted post, by its file stem.
    InternalPost { slug: String },
    /// A post on the own blog that has no converted counterpart (yet).
    MissingPost { stem: String },
    /// A file in the local asset directory.
    Asset { filename: String },
    /// Left as written.
    External { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub target: ResolvedTarget,
    /// The href could not be parsed as an absolute URL.
    pub malformed_url: bool,
}

impl Resolution {
    fn new(target: ResolvedTarget) -> Self {
        Self {
            target,
            malformed_url: false,
        }
    }
}

pub struct LinkResolver<'a> {
    site: &'a SiteConfig,
    markdown: &'a MarkdownConfig,
    index: &'a PostIndex,
}

impl<'a> LinkResolver<'a> {
    pub fn new(site: &'a SiteConfig, markdown: &'a MarkdownConfig, index: &'a PostIndex) -> Self {
        Self {
            site,
            markdown,
            index,
        }
    }

    pub fn resolve(&self, href: &str, kind: LinkKind) -> Resolution {
        let parsed = Url::parse(href);

        if kind == LinkKind::Image {
            let filename = match &parsed {
                Ok(url) => last_url_segment(url),
                Err(_) => last_href_segment(href),
            };
            let target = match filename {
                Some(filename) => ResolvedTarget::Asset { filename },
                None => ResolvedTarget::External { url: href.to_owned() },
            };
            return Resolution {
                target,
                malformed_url: parsed.is_err(),
            };
        }

        let Ok(url) = parsed else {
            return Resolution {
                target: self.resolve_unparsed(href),
                malformed_url: true,
            };
        };

        if self.is_own_host(&url) {
            let stem = last_url_segment(&url)
                .map(|segment| file_stem(&segment).to_owned())
                .unwrap_or_default();
            let target = match self.index.find(&stem) {
                Some(slug) => ResolvedTarget::InternalPost {
                    slug: slug.to_owned(),
                },
                None => ResolvedTarget::MissingPost { stem },
            };
            return Resolution::new(target);
        }

        if self.markdown.is_image_link(url.path())
            && let Some(filename) = last_url_segment(&url)
        {
            return Resolution::new(ResolvedTarget::Asset { filename });
        }

        Resolution::new(ResolvedTarget::External {
            url: href.to_owned(),
        })
    }

    /// Relative or otherwise unparseable href: only the image rule applies.
    fn resolve_unparsed(&self, href: &str) -> ResolvedTarget {
        if self.markdown.is_image_link(strip_query(href))
            && let Some(filename) = last_href_segment(href)
        {
            return ResolvedTarget::Asset { filename };
        }
        ResolvedTarget::External {
            url: href.to_owned(),
        }
    }

    fn is_own_host(&self, url: &Url) -> bool {
        !self.site.domain.is_empty()
            && url
                .host_str()
                .is_some_and(|host| host.eq_ignore_ascii_case(&self.site.domain))
    }

    /// Text written as the link destination.
    pub fn render(&self, target: &ResolvedTarget) -> String {
        match target {
            ResolvedTarget::InternalPost { slug } => self.site.post_reference(slug),
            ResolvedTarget::MissingPost { .. } => self.site.missing_post_link.clone(),
            ResolvedTarget::Asset { filename } => self.site.asset_reference(filename),
            ResolvedTarget::External { url } => url.clone(),
        }
    }
}

// ============================================================================
// helpers
// ============================================================================

/// Last non-empty path segment of a parsed URL, percent-decoded.
fn last_url_segment(url: &Url) -> Option<String> {
    url.path_segments()?
        .rev()
        .find(|segment| !segment.is_empty())
        .map(decode)
}

/// Last non-empty `/`-separated segment of a raw href, percent-decoded.
fn last_href_segment(href: &str) -> Option<String> {
    strip_query(href)
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .map(decode)
}

fn strip_query(href: &str) -> &str {
    href.split(['?', '#']).next().unwrap_or(href)
}

fn decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

/// File name without its extension.
fn file_stem(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}
