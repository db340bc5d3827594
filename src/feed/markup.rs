//! Text-level clean-up around translation.

use regex::Regex;
use std::sync::LazyLock;

/// Absolute URL containing at least one `&name=` query parameter.
static RE_QUERY_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"http[^"< ]+&[a-zA-Z_]+=[^"< ]*["< ]"#).unwrap()
});

/// Entity reference at the start of the input.
static RE_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:[a-zA-Z][a-zA-Z0-9]*|#[0-9]+|#[xX][0-9a-fA-F]+);").unwrap()
});

/// Three or more consecutive line breaks.
static RE_BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n\r?\n(?:\r?\n)+").unwrap());

/// Escape bare `&` inside query-string URLs so the parser keeps them intact.
pub fn preprocess_html(html: &str) -> String {
    RE_QUERY_URL
        .replace_all(html, |caps: &regex::Captures<'_>| escape_bare_ampersands(&caps[0]))
        .into_owned()
}

fn escape_bare_ampersands(url: &str) -> String {
    let mut out = String::with_capacity(url.len() + 8);
    for (i, c) in url.char_indices() {
        if c == '&' && !RE_ENTITY.is_match(&url[i..]) {
            out.push_str("&amp;");
        } else {
            out.push(c);
        }
    }
    out
}

/// Wrap an entry body in a synthetic root element.
pub fn wrap_root(html: &str) -> String {
    format!("<div>{html}</div>")
}

/// Collapse runs of blank lines into a single blank line.
pub fn postprocess(markdown: &str) -> String {
    RE_BLANK_RUN.replace_all(markdown, "\r\n\r\n").into_owned()
}
