//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;

/// Markdown renderer with best-effort syntax highlighting.
///
/// Highlighting is a collaborator, not a dependency: when the theme or
/// language cannot be resolved, code blocks fall back to escaped plain
/// text and the document still renders.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    config: HighlightConfig,
}

/// Fenced code block being accumulated during the event walk.
struct CodeBlock {
    lang: Option<String>,
    text: String,
}

impl MarkdownRenderer {
    pub fn new(config: HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            config,
        }
    }

    /// Render markdown to HTML.
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut block: Option<CodeBlock> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                    block = Some(CodeBlock {
                        lang,
                        text: String::new(),
                    });
                }
                Event::Text(text) => match block.as_mut() {
                    Some(current) => current.text.push_str(&text),
                    None => events.push(Event::Text(text)),
                },
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(current) = block.take() {
                        let rendered = self.render_code(&current.text, current.lang.as_deref());
                        events.push(Event::Html(CowStr::from(rendered)));
                    }
                }
                other => {
                    // Anything else inside a code block is dropped with it
                    if block.is_none() {
                        events.push(other);
                    }
                }
            }
        }

        let mut out = String::new();
        html::push_html(&mut out, events.into_iter());
        out
    }

    /// Render one code block, highlighted when possible.
    fn render_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        if self.config.enable {
            if let Some(highlighted) = self.try_highlight(code, lang) {
                return format!(
                    r#"<pre class="highlight"><code class="language-{}">{}</code></pre>"#,
                    lang, highlighted
                );
            }
        }

        format!(
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            lang,
            escape_html(code)
        )
    }

    fn try_highlight(&self, code: &str, lang: &str) -> Option<String> {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))?;
        let theme = self.theme_set.themes.get(&self.config.theme)?;

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(html) => Some(html),
            Err(e) => {
                tracing::warn!("highlighting failed for language {}: {}", lang, e);
                None
            }
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(HighlightConfig::default())
    }
}

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
