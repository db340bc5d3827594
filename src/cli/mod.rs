//! Command-line interface module.

mod args;
pub mod convert;
pub mod translate;

pub use args::{Cli, Commands, ConvertArgs};
