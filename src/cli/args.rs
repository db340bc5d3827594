//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Convert an exported blog feed into Markdown posts
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: blogport.toml)
    #[arg(short = 'C', long, global = true, default_value = "blogport.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Convert every entry of the feed export into a post
    #[command(visible_alias = "c")]
    Convert {
        #[command(flatten)]
        args: ConvertArgs,
    },

    /// Translate a single HTML fragment and print the Markdown
    #[command(visible_alias = "t")]
    Translate {
        /// HTML file to translate (`-` reads stdin)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,
    },
}

/// Convert command arguments.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConvertArgs {
    /// Atom export file (overrides `import.feed`)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub feed: Option<PathBuf>,

    /// Output directory for posts (overrides `import.posts`)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub posts: Option<PathBuf>,
}
