//! Markdown to HTML conversion for article bodies.

pub mod highlight;

use pulldown_cmark::{html, Event, Options, Parser, TagEnd};

pub use highlight::HighlightTransformer;

/// Markdown processor with fenced-code highlighting
#[derive(Debug, Clone, Copy)]
pub struct MarkdownProcessor {
    options: Options,
}

impl MarkdownProcessor {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        Self { options }
    }

    /// Convert markdown to HTML.
    ///
    /// Deterministic: the same source always yields the same HTML. Source
    /// that produces no markup (whitespace, bare link definitions) is
    /// emitted as an escaped paragraph so non-empty input never renders
    /// to an empty string.
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let events = HighlightTransformer::new().transform(parser);

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        if html_output.trim().is_empty() && !markdown.is_empty() {
            return format!("<p>{}</p>\n", html_escape(markdown.trim()));
        }

        html_output
    }

    /// Strip markdown down to its text, collapsing whitespace.
    pub fn render_plain(&self, markdown: &str) -> String {
        let mut text = String::new();

        for event in Parser::new_ext(markdown, self.options) {
            match event {
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak => text.push(' '),
                Event::End(
                    TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::CodeBlock,
                ) => text.push(' '),
                _ => {}
            }
        }

        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl Default for MarkdownProcessor {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_markdown() {
        let processor = MarkdownProcessor::new();
        let html = processor.render("# Hello World\n\nThis is a **test**.");
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<strong>test</strong>"));
    }

    #[test]
    fn test_tables() {
        let processor = MarkdownProcessor::new();
        let md = r#"
| Header 1 | Header 2 |
|----------|----------|
| Cell 1   | Cell 2   |
"#;
        let html = processor.render(md);
        assert!(html.contains("<table>"));
        assert!(html.contains("<th>Header 1</th>"));
    }

    #[test]
    fn test_fenced_code_blocks() {
        let processor = MarkdownProcessor::new();
        let html = processor.render("```rust\nfn main() {}\n```");
        assert!(html.contains("<pre"));
        assert!(html.contains("main"));

        let plain = processor.render("```\nlet x = 1 < 2;\n```");
        assert!(plain.contains("<pre><code>"));
        assert!(plain.contains("1 &lt; 2"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let processor = MarkdownProcessor::new();
        let samples = [
            "plain paragraph",
            "# Title\n\n- one\n- two\n\n```python\nprint('hi')\n```\n",
            "footnote[^1]\n\n[^1]: the note",
        ];
        for md in samples {
            assert_eq!(processor.render(md), processor.render(md));
        }
    }

    #[test]
    fn test_non_empty_source_never_renders_empty() {
        let processor = MarkdownProcessor::new();
        for md in ["   ", "\n\n", "[ref]: https://example.com", "x"] {
            assert!(!processor.render(md).is_empty(), "source: {md:?}");
        }
        assert!(processor.render("").is_empty());
    }

    #[test]
    fn test_render_plain() {
        let processor = MarkdownProcessor::new();
        let text = processor.render_plain("# Heading\n\nSome *emphasis* and `code`.\n\n- item");
        assert_eq!(text, "Heading Some emphasis and code. item");
    }
}
