//! Feed conversion orchestration.
//!
//! Pipeline per run:
//! - **Prepare** - create output directories, index existing posts
//! - **Read** - parse the Atom export
//! - **Convert** - per entry: clean up, parse, translate, write
//! - **Finalize** - write the diagnostic log, print the summary
//!
//! A failing entry is reported and counted; the run continues with the next.

use crate::{
    config::Config,
    dom,
    feed::{self, FeedEntry, PostEntry},
    log,
    logger::ProgressLine,
    translate::{EntryLabel, PostIndex, RunContext, Translator},
    utils::plural_count,
};
use anyhow::{Context, Result};
use std::fs;

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConvertStats {
    pub converted: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Convert every entry of the configured export.
pub fn convert_feed(config: &Config) -> Result<ConvertStats> {
    let import = &config.import;

    fs::create_dir_all(&import.posts)
        .with_context(|| format!("failed to create {}", import.posts.display()))?;
    fs::create_dir_all(&import.assets)
        .with_context(|| format!("failed to create {}", import.assets.display()))?;

    log!("convert"; "reading {}", import.feed.display());
    let export = feed::read_feed(&import.feed)
        .with_context(|| format!("failed to read feed {}", import.feed.display()))?;

    let mut index = PostIndex::scan(&import.posts)
        .with_context(|| format!("failed to list {}", import.posts.display()))?;
    let run = RunContext::new();

    let mut stats = ConvertStats {
        skipped: export.skipped,
        ..ConvertStats::default()
    };

    let progress = ProgressLine::new("convert", &[("posts", export.entries.len())]);
    for entry in &export.entries {
        let label = EntryLabel::new(entry.published.to_rfc3339(), entry.title.as_str());
        match convert_entry(config, &index, &run, entry, &label) {
            Ok(stem) => {
                index.insert(stem);
                stats.converted += 1;
            }
            Err(err) => {
                log!("error"; "{} ({}): {:#}", label.title, label.published, err);
                stats.failed += 1;
            }
        }
        progress.inc("posts");
    }
    progress.finish();

    fs::write(&import.log, run.render_log())
        .with_context(|| format!("failed to write {}", import.log.display()))?;

    log!(
        "convert";
        "{} converted, {} failed, {} skipped, {} in {}",
        plural_count(stats.converted, "post"),
        stats.failed,
        stats.skipped,
        plural_count(run.note_count(), "note"),
        import.log.display()
    );

    Ok(stats)
}

/// Translate and write one entry, returning the written file stem.
fn convert_entry(
    config: &Config,
    index: &PostIndex,
    run: &RunContext,
    entry: &FeedEntry,
    label: &EntryLabel,
) -> Result<String> {
    let post = PostEntry::new(entry, config);

    let html = feed::wrap_root(&feed::preprocess_html(&entry.content));
    let root = dom::parse_root(&html)?;
    let header_demotion = dom::needs_header_demotion(&root);
    let markdown = Translator::new(config, index, run, label).translate(&root, header_demotion)?;

    let path = config.import.posts.join(post.file_name());
    fs::write(&path, post.render(&markdown))
        .with_context(|| format!("failed to write {}", path.display()))?;

    Ok(post.file_stem())
}
