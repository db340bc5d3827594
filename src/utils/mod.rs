//! Utility modules shared by the importer.

pub mod html;
pub mod path;
pub mod plural;

pub use plural::plural_count;
