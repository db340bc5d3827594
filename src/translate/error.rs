//! Translation errors.

use thiserror::Error;

/// Fatal error for the entry being translated.
///
/// Degraded cases (unknown tags, unresolved links, unparseable URLs) are
/// recorded as notes in the run context instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranslateError {
    #[error("Unexpected span class attribute `{class}`")]
    MalformedInlineStyle { class: String },
}
