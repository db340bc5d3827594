//! Per-tag rendering rules.

use super::Translator;
use super::context::NoteKind;
use super::error::TranslateError;
use super::link::{LinkKind, ResolvedTarget};
use super::state::{ListKind, TranslationState};
use crate::dom::{Element, Node};

/// Classes a `<span>` may carry: syntax-highlighting roles of pasted code.
const INLINE_STYLE_CLASSES: [&str; 9] = [
    "keyword",
    "comment",
    "string",
    "highlight",
    "type",
    "Element",
    "AttrName",
    "AttrValue",
    "Comment",
];

const LINE_BREAK: &str = "\r\n";
const BLANK_LINE: &str = "\r\n\r\n";
/// Leading spaces of an indented code block line.
const CODE_INDENT: &str = "    ";

/// What an element is translated as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Paragraph,
    LineBreak,
    /// Source heading level (3..=5).
    Heading(u8),
    Emphasis,
    Strong,
    Preformatted,
    Code,
    Span,
    Anchor,
    BlockQuote,
    Strike,
    Raw,
    List(ListKind),
    ListItem,
    Image,
    Container,
    Table,
    TableSection,
    Row,
    Cell,
    Unknown,
}

impl ElementKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "p" => Self::Paragraph,
            "br" => Self::LineBreak,
            "h3" => Self::Heading(3),
            "h4" => Self::Heading(4),
            "h5" => Self::Heading(5),
            "em" | "i" => Self::Emphasis,
            "b" | "strong" => Self::Strong,
            "pre" => Self::Preformatted,
            "code" => Self::Code,
            "span" => Self::Span,
            "a" => Self::Anchor,
            "blockquote" => Self::BlockQuote,
            "strike" | "s" | "del" => Self::Strike,
            "script" | "iframe" => Self::Raw,
            "ol" => Self::List(ListKind::Ordered),
            "ul" => Self::List(ListKind::Unordered),
            "li" => Self::ListItem,
            "img" => Self::Image,
            "div" => Self::Container,
            "table" => Self::Table,
            "thead" | "tbody" | "tfoot" => Self::TableSection,
            "tr" => Self::Row,
            "th" | "td" => Self::Cell,
            _ => Self::Unknown,
        }
    }
}

/// Target heading depth for a source level.
pub fn heading_depth(level: u8, header_demotion: bool) -> usize {
    match (level, header_demotion) {
        (3, _) => 2,
        (4, false) => 3,
        (4, true) => 4,
        (5, false) => 4,
        (5, true) => 5,
        (level, _) => usize::from(level),
    }
}

/// Start a new block: the output so far ends with a blank line (or is empty).
pub fn ensure_blank_line(out: &mut String) {
    if out.is_empty() || out.ends_with(BLANK_LINE) {
        return;
    }
    if out.ends_with('\n') {
        out.push_str(LINE_BREAK);
    } else {
        out.push_str(BLANK_LINE);
    }
}

/// Start a new line: the output so far ends with a line break (or is empty).
pub fn ensure_line_start(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push_str(LINE_BREAK);
    }
}

/// Wrap inline text in a marker pair, keeping edge whitespace outside.
fn wrap_inline(out: &mut String, inner: &str, marker: &str) {
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        out.push_str(inner);
        return;
    }
    let leading = &inner[..inner.len() - inner.trim_start().len()];
    let trailing = &inner[inner.trim_end().len()..];
    out.push_str(leading);
    out.push_str(marker);
    out.push_str(trimmed);
    out.push_str(marker);
    out.push_str(trailing);
}

/// Item text without surrounding line breaks. Indented code keeps its indent.
fn list_item_body(inner: &str) -> &str {
    let body = inner.trim_start_matches(['\r', '\n']).trim_end();
    if body.starts_with(CODE_INDENT) {
        body
    } else {
        body.trim_start()
    }
}

/// Whitespace between block children (list items, rows, cells).
fn is_significant(node: &&Node) -> bool {
    !matches!(node, Node::Text(text) if text.trim().is_empty())
}

impl Translator<'_> {
    pub(super) fn render_element(
        &self,
        el: &Element,
        state: &mut TranslationState,
        out: &mut String,
    ) -> Result<(), TranslateError> {
        match ElementKind::from_tag(&el.name) {
            ElementKind::Paragraph => {
                let inner = self.render_inner(el, state)?;
                if state.in_table() {
                    out.push_str(inner.trim());
                } else {
                    ensure_blank_line(out);
                    out.push_str(&inner);
                    out.push_str(BLANK_LINE);
                }
            }
            ElementKind::LineBreak => out.push_str("  \r\n"),
            ElementKind::Heading(level) => {
                let inner = self.render_inner(el, state)?;
                ensure_blank_line(out);
                out.push_str(&"#".repeat(heading_depth(level, state.header_demotion())));
                out.push(' ');
                out.push_str(inner.trim());
                out.push_str(BLANK_LINE);
            }
            ElementKind::Emphasis => self.render_marked(el, state, out, "_")?,
            ElementKind::Strong => self.render_marked(el, state, out, "**")?,
            ElementKind::Preformatted => {
                let mut pre = state.enter_preformatted();
                self.render_nodes(&el.children, &mut pre, out)?;
            }
            ElementKind::Code => self.render_code(el, state, out)?,
            ElementKind::Span => {
                let class = el.attr("class").unwrap_or_default();
                if !INLINE_STYLE_CLASSES.contains(&class) {
                    return Err(TranslateError::MalformedInlineStyle {
                        class: class.to_owned(),
                    });
                }
                self.render_nodes(&el.children, state, out)?;
            }
            ElementKind::Anchor => self.render_anchor(el, state, out)?,
            ElementKind::BlockQuote => {
                self.run.note(NoteKind::BlockQuote, self.entry, "");
                let inner = self.render_inner(el, state)?;
                ensure_blank_line(out);
                for line in inner.trim().lines() {
                    out.push_str("> ");
                    out.push_str(line.trim_end());
                    out.push_str(LINE_BREAK);
                }
                out.push_str(LINE_BREAK);
            }
            ElementKind::Strike => {
                let inner = self.render_inner(el, state)?;
                out.push_str("<del>");
                out.push_str(&inner);
                out.push_str("</del>");
            }
            ElementKind::Raw => out.push_str(&el.to_html()),
            ElementKind::List(kind) => self.render_list(el, kind, state, out)?,
            ElementKind::ListItem => {
                let inner = self.render_inner(el, state)?;
                let (indent, marker) = match state.current_list() {
                    Some(kind) => (state.list_depth() - 1, kind.marker()),
                    None => (0, ListKind::Unordered.marker()),
                };
                ensure_line_start(out);
                out.push_str(&" ".repeat(indent));
                out.push_str(marker);
                out.push_str(list_item_body(&inner));
                out.push_str(LINE_BREAK);
            }
            ElementKind::Image => self.render_image(el, out),
            ElementKind::Container => self.render_container(el, state, out)?,
            ElementKind::Table => self.render_table(el, state, out)?,
            ElementKind::TableSection => {
                self.render_nodes(el.children.iter().filter(is_significant), state, out)?;
            }
            ElementKind::Row => {
                let cells = el
                    .child_elements()
                    .filter(|child| matches!(child.name.as_str(), "th" | "td"))
                    .count();
                let mut row = String::new();
                self.render_nodes(el.children.iter().filter(is_significant), state, &mut row)?;

                ensure_line_start(out);
                out.push('|');
                out.push_str(&row);
                out.push_str(LINE_BREAK);
                if state.take_first_row() {
                    out.push('|');
                    out.push_str(&"-|".repeat(cells.max(1)));
                    out.push_str(LINE_BREAK);
                }
            }
            ElementKind::Cell => {
                let inner = self.render_inner(el, state)?;
                let cell = inner.trim().replace("  \r\n", " ").replace(LINE_BREAK, " ");
                out.push_str(&cell);
                out.push('|');
            }
            ElementKind::Unknown => {
                self.run.warn_unknown_tag(&el.name, self.entry);
                // Children still run so their errors and notes surface
                self.render_inner(el, state)?;
                out.push_str(&el.to_html());
            }
        }
        Ok(())
    }

    fn render_marked(
        &self,
        el: &Element,
        state: &mut TranslationState,
        out: &mut String,
        marker: &str,
    ) -> Result<(), TranslateError> {
        let inner = self.render_inner(el, state)?;
        if state.preformatted() {
            out.push_str(&inner);
        } else {
            wrap_inline(out, &inner, marker);
        }
        Ok(())
    }

    fn render_code(
        &self,
        el: &Element,
        state: &mut TranslationState,
        out: &mut String,
    ) -> Result<(), TranslateError> {
        let inner = self.render_inner(el, state)?;

        if !state.preformatted() {
            out.push('`');
            out.push_str(&inner);
            out.push('`');
            return Ok(());
        }

        let hint = el.attr("class").unwrap_or_default();
        ensure_blank_line(out);
        if self.config.markdown.is_highlighted(hint) {
            out.push_str("{% highlight ");
            out.push_str(hint);
            out.push_str(" %}\r\n");
            out.push_str(&inner);
            ensure_line_start(out);
            out.push_str("{% endhighlight %}\r\n\r\n");
        } else {
            for line in inner.trim_matches(['\r', '\n']).lines() {
                out.push_str(CODE_INDENT);
                out.push_str(line);
                out.push_str(LINE_BREAK);
            }
            out.push_str(LINE_BREAK);
        }
        Ok(())
    }

    fn render_anchor(
        &self,
        el: &Element,
        state: &mut TranslationState,
        out: &mut String,
    ) -> Result<(), TranslateError> {
        let Some(href) = el.attr("href") else {
            // Named anchor, nothing to link
            out.push_str(&el.to_html());
            return Ok(());
        };

        let inner = self.render_inner(el, state)?;
        let resolution = self.resolver.resolve(href, LinkKind::Anchor);
        if resolution.malformed_url {
            self.run.note(NoteKind::MalformedUrl, self.entry, href);
        }
        if let ResolvedTarget::MissingPost { .. } = resolution.target {
            self.run
                .note(NoteKind::UnresolvableLinkTarget, self.entry, href);
        }

        out.push('[');
        out.push_str(&inner);
        out.push_str("](");
        out.push_str(&self.resolver.render(&resolution.target));
        out.push(')');
        Ok(())
    }

    fn render_image(&self, el: &Element, out: &mut String) {
        let Some(src) = el.attr("src") else {
            out.push_str(&el.to_html());
            return;
        };

        let resolution = self.resolver.resolve(src, LinkKind::Image);
        out.push_str("![");
        out.push_str(el.attr("alt").unwrap_or_default());
        out.push_str("](");
        out.push_str(&self.resolver.render(&resolution.target));
        out.push(')');
    }

    fn render_container(
        &self,
        el: &Element,
        state: &mut TranslationState,
        out: &mut String,
    ) -> Result<(), TranslateError> {
        let markdown = &self.config.markdown;
        if !el.has_attrs() {
            return self.render_nodes(&el.children, state, out);
        }
        if el.attr("class") == Some(markdown.separator_class.as_str()) {
            ensure_line_start(out);
            out.push_str(&markdown.center_directive);
            out.push_str(LINE_BREAK);
            return self.render_nodes(&el.children, state, out);
        }
        out.push_str(&el.to_html());
        Ok(())
    }

    fn render_list(
        &self,
        el: &Element,
        kind: ListKind,
        state: &mut TranslationState,
        out: &mut String,
    ) -> Result<(), TranslateError> {
        let top_level = state.list_depth() == 0;
        if top_level {
            ensure_blank_line(out);
        } else {
            ensure_line_start(out);
        }

        {
            let mut list = state.enter_list(kind);
            self.render_nodes(el.children.iter().filter(is_significant), &mut list, out)?;
        }

        ensure_line_start(out);
        if top_level {
            out.push_str(LINE_BREAK);
        }
        Ok(())
    }

    fn render_table(
        &self,
        el: &Element,
        state: &mut TranslationState,
        out: &mut String,
    ) -> Result<(), TranslateError> {
        let markdown = &self.config.markdown;
        self.run.note(NoteKind::Table, self.entry, "");

        let caption = match el.child("caption") {
            Some(caption) => Some(self.render_inner(caption, state)?),
            None => None,
        };
        let caption = caption
            .as_deref()
            .map(str::trim)
            .filter(|caption| !caption.is_empty());

        ensure_blank_line(out);
        if markdown.table_panel {
            out.push_str("<div class=\"panel panel-default\" markdown=\"1\">\r\n");
            if let Some(caption) = caption {
                out.push_str("<div class=\"panel-heading\">");
                out.push_str(caption);
                out.push_str("</div>\r\n");
            }
            out.push_str(LINE_BREAK);
        } else if let Some(caption) = caption {
            out.push_str("**");
            out.push_str(caption);
            out.push_str("**\r\n\r\n");
        }

        if !markdown.table_class.is_empty() {
            out.push_str(&markdown.table_class);
            out.push_str(LINE_BREAK);
        }

        {
            let mut table = state.enter_table();
            let rows = el
                .children
                .iter()
                .filter(is_significant)
                .filter(|node| !matches!(node, Node::Element(child) if child.name == "caption"));
            self.render_nodes(rows, &mut table, out)?;
        }

        ensure_line_start(out);
        if markdown.table_panel {
            out.push_str("\r\n</div>\r\n");
        }
        out.push_str(LINE_BREAK);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_dispatch() {
        assert_eq!(ElementKind::from_tag("i"), ElementKind::Emphasis);
        assert_eq!(ElementKind::from_tag("strong"), ElementKind::Strong);
        assert_eq!(ElementKind::from_tag("ol"), ElementKind::List(ListKind::Ordered));
        assert_eq!(ElementKind::from_tag("iframe"), ElementKind::Raw);
        assert_eq!(ElementKind::from_tag("h2"), ElementKind::Unknown);
        assert_eq!(ElementKind::from_tag("marquee"), ElementKind::Unknown);
    }

    #[test]
    fn test_heading_depth() {
        assert_eq!(heading_depth(3, false), 2);
        assert_eq!(heading_depth(3, true), 2);
        assert_eq!(heading_depth(4, false), 3);
        assert_eq!(heading_depth(4, true), 4);
        assert_eq!(heading_depth(5, false), 4);
        assert_eq!(heading_depth(5, true), 5);
    }

    #[test]
    fn test_ensure_blank_line() {
        let mut out = String::new();
        ensure_blank_line(&mut out);
        assert_eq!(out, "");

        let mut out = String::from("text");
        ensure_blank_line(&mut out);
        assert_eq!(out, "text\r\n\r\n");

        let mut out = String::from("line\r\n");
        ensure_blank_line(&mut out);
        assert_eq!(out, "line\r\n\r\n");

        ensure_blank_line(&mut out);
        assert_eq!(out, "line\r\n\r\n");
    }

    #[test]
    fn test_list_item_body() {
        assert_eq!(list_item_body("\r\n  text \r\n"), "text");
        assert_eq!(list_item_body("    x = 1\r\n    y = 2\r\n\r\n"), "    x = 1\r\n    y = 2");
        assert_eq!(list_item_body("\r\n\r\n    code\r\n"), "    code");
    }

    #[test]
    fn test_wrap_inline_keeps_edge_whitespace_outside() {
        let mut out = String::new();
        wrap_inline(&mut out, " word ", "_");
        assert_eq!(out, " _word_ ");

        let mut out = String::new();
        wrap_inline(&mut out, "  ", "**");
        assert_eq!(out, "  ");
    }
}
