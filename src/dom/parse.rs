//! HTML fragment parsing with `tl`.
//!
//! `tl` keeps text and attribute values exactly as written, so entities are
//! decoded here while converting its nodes into the owned [`Node`] tree.
//! It also has no notion of raw-text elements: a `<` inside a script body
//! would open a tag. Those bodies are entity-escaped before parsing and come
//! back verbatim through the same decoding.

use regex::{Captures, Regex};
use std::sync::LazyLock;
use thiserror::Error;

use super::{Element, Node};
use crate::utils::html::{RAW_TEXT_ELEMENTS, escape, unescape};

/// One pattern per raw-text element: open tag, body, close tag.
static RE_RAW_TEXT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    RAW_TEXT_ELEMENTS
        .iter()
        .map(|tag| Regex::new(&format!(r"(?is)(<{tag}\b[^>]*>)(.*?)(</{tag}\s*>)")).unwrap())
        .collect()
});

/// Errors raised while building a document tree.
#[derive(Debug, Error)]
pub enum DomError {
    #[error("failed to parse markup: {0}")]
    Parse(String),
}

/// Parse an HTML fragment into its top-level nodes.
fn parse_fragment(html: &str) -> Result<Vec<Node>, DomError> {
    let html = protect_raw_text(html);
    let dom = tl::parse(&html, tl::ParserOptions::default())
        .map_err(|err| DomError::Parse(format!("{err:?}")))?;

    let parser = dom.parser();
    Ok(dom
        .children()
        .iter()
        .filter_map(|handle| convert(*handle, parser))
        .collect())
}

/// Parse an HTML fragment into a single root element.
///
/// A fragment that already consists of one element (surrounded only by
/// whitespace) is returned as-is; anything else is wrapped in a synthetic
/// `<div>` so the translator always starts from an element.
pub fn parse_root(html: &str) -> Result<Element, DomError> {
    let mut nodes = parse_fragment(html)?;

    let significant: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| !matches!(node, Node::Text(t) if t.trim().is_empty()))
        .map(|(i, _)| i)
        .collect();

    if let &[only] = significant.as_slice()
        && matches!(nodes[only], Node::Element(_))
        && let Node::Element(root) = nodes.swap_remove(only)
    {
        return Ok(root);
    }

    let mut root = Element::new("div");
    root.children = nodes;
    Ok(root)
}

/// Escape raw-text bodies so `tl` sees a single text node for each.
fn protect_raw_text(html: &str) -> String {
    RE_RAW_TEXT.iter().fold(html.to_owned(), |html, re| {
        re.replace_all(&html, |caps: &Captures<'_>| {
            format!("{}{}{}", &caps[1], escape(&caps[2]), &caps[3])
        })
        .into_owned()
    })
}

/// Convert a tl node handle into an owned node.
fn convert(handle: tl::NodeHandle, parser: &tl::Parser) -> Option<Node> {
    match handle.get(parser)? {
        tl::Node::Tag(tag) => {
            let mut element = Element::new(tag.name().as_utf8_str().to_ascii_lowercase());

            for (key, value) in tag.attributes().iter() {
                let value = value
                    .map(|v| unescape(&v).into_owned())
                    .unwrap_or_default();
                element.set_attr(key.to_ascii_lowercase(), value);
            }

            // id and class are stored apart from the other attributes
            for key in ["id", "class"] {
                if element.attr(key).is_none()
                    && let Some(Some(value)) = tag.attributes().get(key)
                {
                    element.set_attr(key, unescape(&value.as_utf8_str()).into_owned());
                }
            }

            element.children = tag
                .children()
                .top()
                .iter()
                .filter_map(|child| convert(*child, parser))
                .collect();

            Some(Node::Element(element))
        }
        tl::Node::Raw(bytes) => {
            let text = bytes.as_utf8_str();
            if text.is_empty() {
                None
            } else {
                Some(Node::Text(unescape(&text).into_owned()))
            }
        }
        tl::Node::Comment(bytes) => {
            let raw = bytes.as_utf8_str();
            let body: &str = &raw;
            let body = body.strip_prefix("<!--").unwrap_or(body);
            let body = body.strip_suffix("-->").unwrap_or(body);
            Some(Node::Comment(body.to_string()))
        }
    }
}
