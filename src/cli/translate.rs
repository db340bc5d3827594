//! Single-fragment translation.

use crate::{
    config::Config,
    debug, dom, feed,
    translate::{EntryLabel, PostIndex, RunContext, Translator},
};
use anyhow::{Context, Result};
use std::{
    fs,
    io::{self, Read, Write},
    path::Path,
};

/// Path argument that reads standard input.
const STDIN_PATH: &str = "-";

/// Translate one HTML file and print the Markdown to stdout.
pub fn translate_file(config: &Config, file: &Path) -> Result<()> {
    let html = read_input(file)?;
    let markdown = translate_html(config, &html, &file.display().to_string())?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(markdown.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn read_input(file: &Path) -> Result<String> {
    if file == Path::new(STDIN_PATH) {
        let mut html = String::new();
        io::stdin()
            .read_to_string(&mut html)
            .context("failed to read stdin")?;
        return Ok(html);
    }
    fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))
}

/// Translate a fragment against the posts already in the output directory.
pub fn translate_html(config: &Config, html: &str, name: &str) -> Result<String> {
    let index = PostIndex::scan(&config.import.posts)
        .with_context(|| format!("failed to list {}", config.import.posts.display()))?;
    let run = RunContext::new();
    let label = EntryLabel::new("-", name);

    let root = dom::parse_root(&feed::preprocess_html(html))?;
    let header_demotion = dom::needs_header_demotion(&root);
    let markdown = Translator::new(config, &index, &run, &label).translate(&root, header_demotion)?;

    for note in run.notes() {
        debug!("translate"; "{}", note);
    }
    Ok(feed::postprocess(&markdown))
}
