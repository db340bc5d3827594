//! Text node escaping.
//!
//! Only the non-breaking space is rewritten. Markdown-special characters in
//! text are left alone, so `*` or `_` in a post body can still be read as
//! markup by the site generator.

use std::borrow::Cow;

const NBSP: char = '\u{00A0}';
const NBSP_ENTITY: &str = "&nbsp;";

/// Escape a text node; table cells additionally lose surrounding whitespace.
pub fn escape_text(text: &str, in_table: bool) -> Cow<'_, str> {
    let text = if in_table { text.trim() } else { text };
    if text.contains(NBSP) {
        Cow::Owned(text.replace(NBSP, NBSP_ENTITY))
    } else {
        Cow::Borrowed(text)
    }
}
