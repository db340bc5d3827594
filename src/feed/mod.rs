//! Atom export reading and post assembly.
//!
//! | Module   | Purpose                                              |
//! |----------|------------------------------------------------------|
//! | `markup` | Raw HTML clean-up before parsing, Markdown after     |
//! | `post`   | File name, front matter and series of a post         |

mod markup;
mod post;

pub use markup::{postprocess, preprocess_html, wrap_root};
pub use post::PostEntry;

use atom_syndication::{Entry, Feed, FixedDateTime};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::debug;

/// Category scheme marking user-assigned labels.
pub const TAG_SCHEME: &str = "http://www.blogger.com/atom/ns#";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("feed parsing error")]
    Parse(#[from] atom_syndication::Error),

    #[error("entry \"{title}\" has no {field}")]
    MissingField { title: String, field: &'static str },
}

/// One post of the export.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub title: String,
    pub published: FixedDateTime,
    /// Raw HTML body.
    pub content: String,
    /// Public URL of the post (`alternate` link).
    pub url: String,
    /// Labels (categories with [`TAG_SCHEME`]).
    pub tags: Vec<String>,
}

impl TryFrom<&Entry> for FeedEntry {
    type Error = FeedError;

    fn try_from(entry: &Entry) -> Result<Self, Self::Error> {
        let title = entry.title().value.clone();
        let missing = |field| FeedError::MissingField {
            title: title.clone(),
            field,
        };

        let published = *entry.published().ok_or_else(|| missing("published date"))?;
        let content = entry
            .content()
            .and_then(|content| content.value())
            .ok_or_else(|| missing("content"))?
            .to_owned();
        let url = entry
            .links()
            .iter()
            .find(|link| link.rel() == "alternate")
            .map(|link| link.href().to_owned())
            .ok_or_else(|| missing("alternate link"))?;
        let tags = entry
            .categories()
            .iter()
            .filter(|category| category.scheme() == Some(TAG_SCHEME))
            .map(|category| category.term().to_owned())
            .collect();

        Ok(Self {
            title,
            published,
            content,
            url,
            tags,
        })
    }
}

/// Entries of an export, in feed order.
#[derive(Debug, Default)]
pub struct FeedExport {
    pub entries: Vec<FeedEntry>,
    /// Entries without a body, date or public URL.
    pub skipped: usize,
}

impl FeedExport {
    fn from_feed(feed: &Feed) -> Self {
        let mut export = Self::default();
        for entry in feed.entries() {
            match FeedEntry::try_from(entry) {
                Ok(entry) => export.entries.push(entry),
                Err(err) => {
                    debug!("feed"; "skipping: {}", err);
                    export.skipped += 1;
                }
            }
        }
        export
    }
}

/// Read an Atom export file.
pub fn read_feed(path: &Path) -> Result<FeedExport, FeedError> {
    let xml = fs::read_to_string(path).map_err(|err| FeedError::Io(path.to_path_buf(), err))?;
    parse_feed(&xml)
}

/// Parse an Atom export from a string.
pub fn parse_feed(xml: &str) -> Result<FeedExport, FeedError> {
    let feed: Feed = xml.parse()?;
    Ok(FeedExport::from_feed(&feed))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    pub const EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <id>tag:blogger.com,1999:blog-1</id>
  <title type="text">Old Blog</title>
  <updated>2013-01-01T00:00:00Z</updated>
  <entry>
    <id>tag:blogger.com,1999:blog-1.post-1</id>
    <published>2012-01-05T10:00:00.000+01:00</published>
    <updated>2012-01-05T10:00:00.000+01:00</updated>
    <category scheme="http://schemas.google.com/g/2005#kind" term="http://schemas.google.com/blogger/2008/kind#post"/>
    <category scheme="http://www.blogger.com/atom/ns#" term="async oop"/>
    <title type="text">Async OOP 2: Constructors</title>
    <content type="html">&lt;p&gt;Hello &lt;b&gt;world&lt;/b&gt;&lt;/p&gt;</content>
    <link rel="replies" type="text/html" href="http://blog.example.com/2012/01/constructors.html#comment-form"/>
    <link rel="alternate" type="text/html" href="http://blog.example.com/2012/01/constructors.html"/>
  </entry>
  <entry>
    <id>tag:blogger.com,1999:blog-1.settings</id>
    <updated>2012-01-01T00:00:00.000Z</updated>
    <title type="text">Template</title>
    <content type="text">settings</content>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_export() {
        let export = parse_feed(EXPORT).unwrap();
        assert_eq!(export.skipped, 1);
        assert_eq!(export.entries.len(), 1);

        let entry = &export.entries[0];
        assert_eq!(entry.title, "Async OOP 2: Constructors");
        assert_eq!(entry.content, "<p>Hello <b>world</b></p>");
        assert_eq!(entry.url, "http://blog.example.com/2012/01/constructors.html");
        assert_eq!(entry.tags, ["async oop"]);
        assert_eq!(entry.published.format("%Y-%m-%d").to_string(), "2012-01-05");
    }

    #[test]
    fn test_read_feed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blog.xml");
        std::fs::write(&path, EXPORT).unwrap();
        assert_eq!(read_feed(&path).unwrap().entries.len(), 1);

        let missing = read_feed(&dir.path().join("none.xml")).unwrap_err();
        assert!(matches!(missing, FeedError::Io(..)));
    }

    #[test]
    fn test_invalid_xml() {
        assert!(matches!(
            parse_feed("<rss version=\"2.0\"></rss>"),
            Err(FeedError::Parse(_))
        ));
    }
}
