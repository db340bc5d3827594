//! Markup re-serialization for raw passthrough.

use super::{Element, Node};
use crate::utils::html::{escape, is_raw_text_element, is_void_element};

impl Element {
    /// Serialize this element (tag, attributes and subtree) back to markup.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }

        if is_void_element(&self.name) && self.children.is_empty() {
            out.push_str(" />");
            return;
        }
        out.push('>');

        let raw_text = is_raw_text_element(&self.name);
        for child in &self.children {
            match child {
                Node::Element(e) => e.write_html(out),
                Node::Text(t) if raw_text => out.push_str(t),
                Node::Text(t) => out.push_str(&escape(t)),
                Node::Comment(c) => {
                    out.push_str("<!--");
                    out.push_str(c);
                    out.push_str("-->");
                }
            }
        }

        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_attributes_in_source_order() {
        let iframe = Element::new("iframe")
            .with_attr("src", "http://example.com/embed?a=1&b=2")
            .with_attr("width", "420");
        assert_eq!(
            iframe.to_html(),
            r#"<iframe src="http://example.com/embed?a=1&amp;b=2" width="420"></iframe>"#
        );
    }

    #[test]
    fn test_serialize_void_element() {
        let img = Element::new("img").with_attr("src", "a.png");
        assert_eq!(img.to_html(), r#"<img src="a.png" />"#);
    }

    #[test]
    fn test_serialize_nested_text_and_comments() {
        let div = Element::new("div")
            .with_attr("style", "x")
            .with_text("a < b")
            .with_child(Element::new("em").with_text("c"))
            .with_child(Node::Comment(" keep ".into()));
        assert_eq!(
            div.to_html(),
            r#"<div style="x">a &lt; b<em>c</em><!-- keep --></div>"#
        );
    }

    #[test]
    fn test_serialize_script_body_verbatim() {
        let script = Element::new("script")
            .with_attr("type", "text/javascript")
            .with_text("if (a < b && c) { go(); }");
        assert_eq!(
            script.to_html(),
            r#"<script type="text/javascript">if (a < b && c) { go(); }</script>"#
        );
    }
}
