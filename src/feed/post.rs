//! Output file of a single entry.

use url::Url;

use super::{FeedEntry, postprocess};
use crate::config::Config;

/// Extension of written posts.
const POST_EXTENSION: &str = "md";

/// An entry together with what is needed to write it as a post.
#[derive(Debug)]
pub struct PostEntry<'a> {
    entry: &'a FeedEntry,
    layout: &'a str,
    series: Option<&'a str>,
}

impl<'a> PostEntry<'a> {
    pub fn new(entry: &'a FeedEntry, config: &'a Config) -> Self {
        Self {
            entry,
            layout: &config.import.layout,
            series: config.series_for(entry.tags.iter().map(String::as_str)),
        }
    }

    /// Last path segment of the post URL without its extension.
    pub fn slug(&self) -> String {
        let url = &self.entry.url;
        let segment = match Url::parse(url) {
            Ok(parsed) => parsed
                .path_segments()
                .and_then(|mut segments| segments.rfind(|s| !s.is_empty()).map(str::to_owned)),
            Err(_) => url.rsplit('/').find(|s| !s.is_empty()).map(str::to_owned),
        }
        .unwrap_or_default();

        match segment.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_owned(),
            _ => segment,
        }
    }

    /// `YYYY-MM-DD-<slug>`, dated in the entry's own offset.
    pub fn file_stem(&self) -> String {
        format!("{}-{}", self.entry.published.format("%Y-%m-%d"), self.slug())
    }

    pub fn file_name(&self) -> String {
        format!("{}.{POST_EXTENSION}", self.file_stem())
    }

    /// Title of the part within its series: the text after the last `:`.
    pub fn series_title(&self) -> &str {
        let title = &self.entry.title;
        title.rsplit_once(':').map_or(title.as_str(), |(_, part)| part).trim()
    }

    pub fn front_matter(&self) -> String {
        let mut out = String::from("---\r\n");
        out.push_str(&format!("layout: {}\r\n", self.layout));
        out.push_str(&format!("title: {}\r\n", yaml_string(&self.entry.title)));
        if let Some(series) = self.series {
            out.push_str(&format!("series: {}\r\n", yaml_string(series)));
            out.push_str(&format!("seriesTitle: {}\r\n", yaml_string(self.series_title())));
        }
        out.push_str("---\r\n");
        out
    }

    /// Complete file contents for a translated body.
    pub fn render(&self, markdown: &str) -> String {
        let mut out = self.front_matter();
        out.push_str(&postprocess(markdown));
        out
    }
}

/// Double-quoted YAML scalar.
fn yaml_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
