//! Code syntax highlighting using syntect.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use std::sync::OnceLock;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME: OnceLock<Option<Theme>> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> Option<&'static Theme> {
    THEME
        .get_or_init(|| {
            let mut theme_set = ThemeSet::load_defaults();
            theme_set
                .themes
                .remove("InspiredGitHub")
                .or_else(|| theme_set.themes.remove("base16-ocean.light"))
        })
        .as_ref()
}

/// Replaces fenced code blocks that name a language with highlighted HTML.
///
/// Fences without a language and indented blocks are left for the HTML
/// writer to emit as plain `<pre><code>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighlightTransformer;

impl HighlightTransformer {
    pub fn new() -> Self {
        Self
    }

    pub fn transform<'a, I>(&self, events: I) -> Vec<Event<'a>>
    where
        I: IntoIterator<Item = Event<'a>>,
    {
        let mut result = Vec::new();
        let mut fence: Option<(String, String)> = None;

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info)))
                    if language_token(&info).is_some() =>
                {
                    let lang = language_token(&info).unwrap_or_default().to_string();
                    fence = Some((lang, String::new()));
                }
                Event::Text(text) if fence.is_some() => {
                    if let Some((_, code)) = fence.as_mut() {
                        code.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) if fence.is_some() => {
                    if let Some((lang, code)) = fence.take() {
                        let html = highlight_code(&code, &lang);
                        result.push(Event::Html(CowStr::Boxed(html.into_boxed_str())));
                    }
                }
                other => result.push(other),
            }
        }

        result
    }
}

/// First word of a fence info string (` ```rust ignore ` -> `rust`).
fn language_token(info: &str) -> Option<&str> {
    info.split_whitespace().next()
}

fn highlight_code(code: &str, lang: &str) -> String {
    let ss = syntax_set();
    let syntax = ss
        .find_syntax_by_token(lang)
        .or_else(|| ss.find_syntax_by_extension(lang))
        .unwrap_or_else(|| ss.find_syntax_plain_text());

    theme()
        .and_then(|theme| highlighted_html_for_string(code, ss, syntax, theme).ok())
        .unwrap_or_else(|| {
            format!(
                "<pre><code class=\"language-{}\">{}</code></pre>\n",
                super::html_escape(lang),
                super::html_escape(code)
            )
        })
}
