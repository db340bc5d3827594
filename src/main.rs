//! Blogport - convert an exported blog feed into Markdown posts.

mod cli;
mod config;
mod dom;
mod feed;
mod logger;
mod translate;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Config::load(&cli)?;

    match &cli.command {
        Commands::Convert { .. } => cli::convert::convert_feed(&config).map(|_| ()),
        Commands::Translate { file } => cli::translate::translate_file(&config, file),
    }
}
