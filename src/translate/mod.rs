//! HTML to Markdown translation.
//!
//! The [`Translator`] walks a parsed post depth-first and appends Markdown
//! to an output buffer in document order. Each element is dispatched on its
//! [`ElementKind`](rules::ElementKind); container rules (lists, tables,
//! `pre`) change the [`TranslationState`] only through scoped guards, so
//! siblings outside a container always see the state it started with.
//!
//! # Example
//!
//! ```ignore
//! let root = dom::parse_root(&html)?;
//! let run = RunContext::new();
//! let entry = EntryLabel::new("2012-01-05", "Hello");
//! let translator = Translator::new(&config, &index, &run, &entry);
//! let markdown = translator.translate(&root, dom::needs_header_demotion(&root))?;
//! ```

mod context;
mod error;
mod escape;
mod link;
mod rules;
mod state;

pub use context::{EntryLabel, RunContext};
pub use error::TranslateError;
pub use link::PostIndex;

use escape::escape_text;
use link::LinkResolver;
use state::TranslationState;

use crate::config::Config;
use crate::dom::{Element, Node};

/// Translates the documents of one entry.
pub struct Translator<'a> {
    config: &'a Config,
    resolver: LinkResolver<'a>,
    run: &'a RunContext,
    entry: &'a EntryLabel,
}

impl<'a> Translator<'a> {
    pub fn new(
        config: &'a Config,
        index: &'a PostIndex,
        run: &'a RunContext,
        entry: &'a EntryLabel,
    ) -> Self {
        Self {
            config,
            resolver: LinkResolver::new(&config.site, &config.markdown, index),
            run,
            entry,
        }
    }

    /// Translate a document with a fresh state.
    pub fn translate(&self, root: &Element, header_demotion: bool) -> Result<String, TranslateError> {
        let mut state = TranslationState::new(header_demotion);
        let mut out = String::new();
        self.render_element(root, &mut state, &mut out)?;
        Ok(out)
    }

    fn render_node(
        &self,
        node: &Node,
        state: &mut TranslationState,
        out: &mut String,
    ) -> Result<(), TranslateError> {
        match node {
            Node::Element(el) => self.render_element(el, state, out)?,
            Node::Text(text) => out.push_str(&escape_text(text, state.in_table())),
            Node::Comment(text) => {
                out.push_str("<!--");
                out.push_str(&escape_text(text, false));
                out.push_str("-->");
            }
        }
        Ok(())
    }

    /// Append the translation of `nodes` to `out`.
    fn render_nodes<'n>(
        &self,
        nodes: impl IntoIterator<Item = &'n Node>,
        state: &mut TranslationState,
        out: &mut String,
    ) -> Result<(), TranslateError> {
        for node in nodes {
            self.render_node(node, state, out)?;
        }
        Ok(())
    }

    /// Translate the children of `el` into a buffer of their own.
    fn render_inner(&self, el: &Element, state: &mut TranslationState) -> Result<String, TranslateError> {
        let mut inner = String::new();
        self.render_nodes(&el.children, state, &mut inner)?;
        Ok(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::context::NoteKind;
    use crate::config::test_parse_config;
    use crate::dom::{needs_header_demotion, parse_root};
    use pulldown_cmark::{Event, Parser, Tag, TagEnd};

    const DEFAULT_CONFIG: &str = "[site]\ndomain = \"blog.example.com\"";

    fn translate_with(config: &Config, index: &PostIndex, run: &RunContext, html: &str) -> Result<String, TranslateError> {
        let root = parse_root(html).unwrap();
        let entry = EntryLabel::new("2012-01-05T10:00:00+01:00", "Test post");
        Translator::new(config, index, run, &entry).translate(&root, needs_header_demotion(&root))
    }

    fn translate(html: &str) -> String {
        let config = test_parse_config(DEFAULT_CONFIG);
        translate_with(&config, &PostIndex::new(), &RunContext::new(), html).unwrap()
    }

    // ------------------------------------------------------------------------
    // inline rules
    // ------------------------------------------------------------------------

    #[test]
    fn test_paragraph_with_bold() {
        assert_eq!(translate("<p><b>hi</b> there</p>"), "**hi** there\r\n\r\n");
    }

    #[test]
    fn test_paragraphs_separated_by_blank_line() {
        assert_eq!(
            translate("<div>intro<p>one</p><p>two</p></div>"),
            "intro\r\n\r\none\r\n\r\ntwo\r\n\r\n"
        );
    }

    #[test]
    fn test_emphasis_and_strike() {
        assert_eq!(
            translate("<div><i>a</i> <em>b</em> <strong>c</strong> <strike>d</strike></div>"),
            "_a_ _b_ **c** <del>d</del>"
        );
    }

    #[test]
    fn test_line_break() {
        assert_eq!(translate("<div>a<br />b</div>"), "a  \r\nb");
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(translate("<div>call <code>Run()</code></div>"), "call `Run()`");
    }

    #[test]
    fn test_plain_text_identity() {
        let text = "Just text, with * and _ left alone.";
        assert_eq!(translate(text), text);
    }

    #[test]
    fn test_nbsp_and_comment() {
        assert_eq!(
            translate("<div>a&nbsp;b<!-- x\u{00A0}y --></div>"),
            "a&nbsp;b<!-- x&nbsp;y -->"
        );
    }

    // ------------------------------------------------------------------------
    // headings
    // ------------------------------------------------------------------------

    #[test]
    fn test_headings_without_demotion() {
        assert_eq!(
            translate("<div><h4>Sub</h4><h5>Minor</h5></div>"),
            "### Sub\r\n\r\n#### Minor\r\n\r\n"
        );
    }

    #[test]
    fn test_headings_demoted_when_h3_present() {
        assert_eq!(
            translate("<div><h3>Top</h3><h4>Sub</h4><h5>Minor</h5></div>"),
            "## Top\r\n\r\n#### Sub\r\n\r\n##### Minor\r\n\r\n"
        );
    }

    // ------------------------------------------------------------------------
    // code
    // ------------------------------------------------------------------------

    #[test]
    fn test_highlighted_code_block() {
        assert_eq!(
            translate("<div>x<pre><code class=\"csharp\">var a = 1;\nvar b = <b>2</b>;</code></pre></div>"),
            "x\r\n\r\n{% highlight csharp %}\r\nvar a = 1;\nvar b = 2;\r\n{% endhighlight %}\r\n\r\n"
        );
    }

    #[test]
    fn test_unknown_language_is_indented() {
        assert_eq!(
            translate("<pre><code class=\"python\">\nprint(1)\n  pass\n</code></pre>"),
            "    print(1)\r\n      pass\r\n\r\n"
        );
    }

    #[test]
    fn test_highlight_spans_in_code() {
        assert_eq!(
            translate("<pre><code class=\"xml\"><span class=\"Element\">a</span></code></pre>"),
            "{% highlight xml %}\r\na\r\n{% endhighlight %}\r\n\r\n"
        );
    }

    #[test]
    fn test_unexpected_span_class_is_fatal() {
        let config = test_parse_config(DEFAULT_CONFIG);
        let run = RunContext::new();
        let err = translate_with(&config, &PostIndex::new(), &run, "<p>x <span style=\"color:red\">y</span></p>")
            .unwrap_err();
        assert_eq!(err, TranslateError::MalformedInlineStyle { class: String::new() });

        let err = translate_with(&config, &PostIndex::new(), &run, "<span class=\"fancy\">y</span>").unwrap_err();
        assert_eq!(err, TranslateError::MalformedInlineStyle { class: "fancy".into() });

        // The next document is unaffected
        assert!(translate_with(&config, &PostIndex::new(), &run, "<p>ok</p>").is_ok());
    }

    // ------------------------------------------------------------------------
    // links and images
    // ------------------------------------------------------------------------

    #[test]
    fn test_image_without_alt() {
        assert_eq!(
            translate("<img src=\"http://x/y/pic.png\" />"),
            "![]({{ site_url }}/assets/pic.png)"
        );
    }

    #[test]
    fn test_linked_image() {
        assert_eq!(
            translate("<a href=\"http://x/big.JPG\"><img alt=\"Cat\" src=\"http://x/small.jpg\" /></a>"),
            "[![Cat]({{ site_url }}/assets/small.jpg)]({{ site_url }}/assets/big.JPG)"
        );
    }

    #[test]
    fn test_internal_link() {
        let config = test_parse_config(DEFAULT_CONFIG);
        let index = PostIndex::from_stems(["2012-01-05-hello-world"]);
        let out = translate_with(
            &config,
            &index,
            &RunContext::new(),
            "<a href=\"http://blog.example.com/2012/01/hello-world.html\">earlier</a>",
        )
        .unwrap();
        assert_eq!(out, "[earlier]({% post_url 2012-01-05-hello-world %})");
    }

    #[test]
    fn test_unresolved_link_gets_placeholder() {
        let config = test_parse_config("[site]\ndomain = \"unrelated.example\"");
        let run = RunContext::new();
        let out = translate_with(
            &config,
            &PostIndex::from_stems(["2011-01-01-post-6"]),
            &run,
            "<a href=\"http://unrelated.example/post-7\">next</a>",
        )
        .unwrap();
        assert_eq!(out, "[next]({ % post_url TODO % })");
        assert_eq!(run.notes()[0].kind, NoteKind::UnresolvableLinkTarget);
    }

    #[test]
    fn test_external_and_malformed_links() {
        let config = test_parse_config(DEFAULT_CONFIG);
        let run = RunContext::new();
        let out = translate_with(
            &config,
            &PostIndex::new(),
            &run,
            "<div><a href=\"https://docs.rs\">docs</a> <a href=\"/relative/page\">rel</a></div>",
        )
        .unwrap();
        assert_eq!(out, "[docs](https://docs.rs) [rel](/relative/page)");
        let kinds: Vec<_> = run.notes().iter().map(|n| n.kind).collect();
        assert_eq!(kinds, [NoteKind::MalformedUrl]);
    }

    #[test]
    fn test_anchor_without_href_is_raw() {
        assert_eq!(translate("<div><a name=\"top\"></a>x</div>"), "<a name=\"top\"></a>x");
    }

    // ------------------------------------------------------------------------
    // lists
    // ------------------------------------------------------------------------

    #[test]
    fn test_unordered_list() {
        assert_eq!(
            translate("<ul>\n  <li>one</li>\n  <li>two</li>\n</ul>"),
            "- one\r\n- two\r\n\r\n"
        );
    }

    #[test]
    fn test_nested_list_indent_follows_depth() {
        let out = translate("<ol><li>a<ul><li>b<ol><li>c</li></ol></li></ul></li><li>d</li></ol>");
        assert_eq!(out, "1. a\r\n - b\r\n  1. c\r\n1. d\r\n\r\n");
    }

    #[test]
    fn test_list_state_restored_for_siblings() {
        let out = translate("<div><ul><li>a</li></ul><p>after</p><li>stray</li></div>");
        assert_eq!(out, "- a\r\n\r\nafter\r\n\r\n- stray\r\n");
    }

    #[test]
    fn test_list_item_keeps_code_indent() {
        let out = translate("<ul><li><pre><code>x = 1\ny = 2</code></pre></li></ul>");
        assert_eq!(out, "-     x = 1\r\n    y = 2\r\n\r\n");
        assert!(out.contains("    x = 1"));
    }

    #[test]
    fn test_list_parses_as_markdown_list() {
        let out = translate("<div>Steps:<ol><li>first</li><li>second</li></ol></div>");
        let items = Parser::new(&out)
            .filter(|event| matches!(event, Event::Start(Tag::Item)))
            .count();
        assert_eq!(items, 2);
    }

    // ------------------------------------------------------------------------
    // blocks
    // ------------------------------------------------------------------------

    #[test]
    fn test_blockquote() {
        let config = test_parse_config(DEFAULT_CONFIG);
        let run = RunContext::new();
        let out = translate_with(&config, &PostIndex::new(), &run, "<blockquote>\n line one<br />line two \n</blockquote>").unwrap();
        assert_eq!(out, "> line one\r\n> line two\r\n\r\n");
        assert_eq!(run.notes()[0].kind, NoteKind::BlockQuote);
    }

    #[test]
    fn test_raw_passthrough() {
        assert_eq!(
            translate("<div><iframe src=\"http://v/e?a=1&amp;b=2\" width=\"420\"></iframe></div>"),
            "<iframe src=\"http://v/e?a=1&amp;b=2\" width=\"420\"></iframe>"
        );
    }

    #[test]
    fn test_script_passthrough_keeps_body_and_order() {
        assert_eq!(
            translate("<div><script type=\"text/javascript\">if (a<b) go();</script> after</div>"),
            "<script type=\"text/javascript\">if (a<b) go();</script> after"
        );
    }

    #[test]
    fn test_containers() {
        assert_eq!(
            translate("<div><div>plain</div></div>"),
            "plain"
        );
        assert_eq!(
            translate("<div>x<div class=\"separator\" style=\"clear: both;\"><img src=\"http://x/a.png\" /></div></div>"),
            "x\r\n{:.center}\r\n![]({{ site_url }}/assets/a.png)"
        );
        assert_eq!(
            translate("<div><div style=\"color: red\"><b>kept</b></div></div>"),
            "<div style=\"color: red\"><b>kept</b></div>"
        );
    }

    #[test]
    fn test_unknown_tag_warned_once_per_run() {
        let config = test_parse_config(DEFAULT_CONFIG);
        let run = RunContext::new();
        let index = PostIndex::new();
        let out = translate_with(&config, &index, &run, "<div><font color=\"red\">a</font><font>b</font></div>").unwrap();
        assert_eq!(out, "<font color=\"red\">a</font><font>b</font>");
        translate_with(&config, &index, &run, "<font>c</font>").unwrap();

        let unknown = run
            .notes()
            .iter()
            .filter(|n| n.kind == NoteKind::UnknownElementTag)
            .count();
        assert_eq!(unknown, 1);
    }

    #[test]
    fn test_unknown_tag_children_errors_propagate() {
        let config = test_parse_config(DEFAULT_CONFIG);
        let result = translate_with(
            &config,
            &PostIndex::new(),
            &RunContext::new(),
            "<font><span class=\"bogus\">x</span></font>",
        );
        assert!(result.is_err());
    }

    // ------------------------------------------------------------------------
    // tables
    // ------------------------------------------------------------------------

    const TABLE: &str = "<table>\n<tr><th>A</th><th>B</th><th>C</th></tr>\n<tr><td> 1 </td><td>2</td><td>3</td></tr>\n</table>";

    #[test]
    fn test_table_two_rows_three_columns() {
        let out = translate(TABLE);
        let lines: Vec<_> = out.lines().filter(|line| !line.is_empty()).collect();
        assert_eq!(
            lines,
            ["{:.table .table-striped}", "|A|B|C|", "|-|-|-|", "|1|2|3|"]
        );
        for row in [lines[1], lines[3]] {
            assert_eq!(row.matches('|').count(), 4);
        }
    }

    #[test]
    fn test_table_separator_only_after_first_row() {
        let out = translate(
            "<table><tbody><tr><td>a</td></tr><tr><td>b</td></tr><tr><td>c</td></tr></tbody></table>",
        );
        assert_eq!(out.matches("|-|").count(), 1);
        assert_eq!(out, "{:.table .table-striped}\r\n|a|\r\n|-|\r\n|b|\r\n|c|\r\n\r\n");
    }

    #[test]
    fn test_table_parses_as_markdown_table() {
        let config = test_parse_config("[markdown]\ntable_class = \"\"");
        let out = translate_with(&config, &PostIndex::new(), &RunContext::new(), TABLE).unwrap();
        let mut head_cells = 0;
        let mut in_head = false;
        let mut rows = 0;
        for event in Parser::new_ext(&out, pulldown_cmark::Options::ENABLE_TABLES) {
            match event {
                Event::Start(Tag::TableHead) => in_head = true,
                Event::End(TagEnd::TableHead) => in_head = false,
                Event::Start(Tag::TableCell) if in_head => head_cells += 1,
                Event::Start(Tag::TableRow) => rows += 1,
                _ => {}
            }
        }
        assert_eq!(head_cells, 3);
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_table_caption_and_panel() {
        let html = "<table><caption>Results</caption><tr><td>x</td></tr></table>";
        assert_eq!(
            translate(html),
            "**Results**\r\n\r\n{:.table .table-striped}\r\n|x|\r\n|-|\r\n\r\n"
        );

        let config = test_parse_config("[markdown]\ntable_panel = true\ntable_class = \"\"");
        let out = translate_with(&config, &PostIndex::new(), &RunContext::new(), html).unwrap();
        assert_eq!(
            out,
            "<div class=\"panel panel-default\" markdown=\"1\">\r\n\
             <div class=\"panel-heading\">Results</div>\r\n\r\n\
             |x|\r\n|-|\r\n\r\n</div>\r\n\r\n"
        );
    }

    #[test]
    fn test_lists_in_cell_stay_on_row() {
        let out = translate(
            "<div><table><tr><td>x<ul><li>a<ul><li>b</li></ul></li></ul></td><td>y</td></tr></table><li>stray</li></div>",
        );
        assert_eq!(
            out,
            "{:.table .table-striped}\r\n|x  - a  - b|y|\r\n|-|-|\r\n\r\n- stray\r\n"
        );
    }

    #[test]
    fn test_list_state_restored_after_table_in_item() {
        let out = translate(
            "<ul><li>outer<table><tr><td><ul><li>a<ul><li>b</li></ul></li></ul></td></tr></table></li><li>next</li></ul>",
        );
        let lines: Vec<_> = out.lines().filter(|line| !line.is_empty()).collect();
        assert_eq!(
            lines,
            ["- outer", "{:.table .table-striped}", "|- a   - b|", "|-|", "- next"]
        );
    }

    #[test]
    fn test_nested_table_gets_own_separator() {
        let out = translate(
            "<table><tr><td><table><tr><td>in</td></tr></table></td></tr><tr><td>b</td></tr></table>",
        );
        assert_eq!(out.matches("|-|").count(), 2);
    }
}
