use comrak::Options;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use crate::highlight::Highlighter;

static CODE_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<pre><code(?: class="language-([^"]*)")?>(.*?)</code></pre>"#).unwrap()
});

/// Optional Markdown extensions. Each one is enabled if this build supports
/// it and skipped otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    Footnotes,
    TaskLists,
    Emoji,
}

impl Extension {
    pub const ALL: [Extension; 3] = [Extension::Footnotes, Extension::TaskLists, Extension::Emoji];

    /// Returns false when the extension is not compiled in.
    fn enable(self, options: &mut Options) -> bool {
        match self {
            Extension::Footnotes => {
                options.extension.footnotes = true;
                true
            }
            Extension::TaskLists => {
                options.extension.tasklist = true;
                true
            }
            Extension::Emoji => enable_emoji(options),
        }
    }
}

#[cfg(feature = "emoji")]
fn enable_emoji(options: &mut Options) -> bool {
    options.extension.shortcodes = true;
    true
}

#[cfg(not(feature = "emoji"))]
fn enable_emoji(_options: &mut Options) -> bool {
    false
}

/// Base comrak settings: raw HTML passes through, bare URLs become links and
/// quotes/dashes get typographic replacements.
pub fn create_comrak_options() -> Options<'static> {
    let mut options = Options::default();

    options.extension.autolink = true;
    options.extension.table = true;
    options.extension.strikethrough = true;

    options.parse.smart = true;

    options.render.unsafe_ = true;
    options.render.github_pre_lang = false;

    for extension in Extension::ALL {
        if !extension.enable(&mut options) {
            debug!("Markdown extension {:?} not available, skipping", extension);
        }
    }

    options
}

/// Markdown to HTML with highlighted fenced code.
pub struct MarkdownRenderer {
    options: Options<'static>,
    highlighter: Highlighter,
}

impl MarkdownRenderer {
    pub fn new(highlighter: Highlighter) -> Self {
        Self {
            options: create_comrak_options(),
            highlighter,
        }
    }

    pub fn render(&self, markdown: &str) -> String {
        let html = comrak::markdown_to_html(markdown, &self.options);
        self.highlight_code_blocks(&html)
    }

    /// Stylesheet for the classes used in highlighted code blocks.
    pub fn highlight_stylesheet(&self) -> String {
        self.highlighter.stylesheet()
    }

    fn highlight_code_blocks(&self, html: &str) -> String {
        CODE_BLOCK_REGEX
            .replace_all(html, |caps: &Captures| {
                let escaped = &caps[2];
                let body = caps
                    .get(1)
                    .map(|lang| lang.as_str())
                    .filter(|lang| !lang.is_empty())
                    .and_then(|lang| {
                        let code = html_escape::decode_html_entities(escaped);
                        self.highlighter.highlight(&code, lang)
                    })
                    .unwrap_or_else(|| escaped.to_string());

                format!("<pre class=\"hljs\"><code>{}</code></pre>", body)
            })
            .into_owned()
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(Highlighter::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_rendering() {
        let html = MarkdownRenderer::default().render("# Title\n\nSome **bold** text.");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_known_language_is_highlighted() {
        let html = MarkdownRenderer::default().render("```rust\nfn main() {}\n```\n");
        assert!(html.contains("<pre class=\"hljs\"><code>"));
        assert!(html.contains("<span class=\"source rust\">"));
    }

    #[test]
    fn test_unknown_language_falls_back_to_escaped_text() {
        let html = MarkdownRenderer::default().render("```nolang\n<b>&</b>\n```\n");
        assert!(html.contains("<pre class=\"hljs\"><code>&lt;b&gt;&amp;&lt;/b&gt;\n</code></pre>"));
    }

    #[test]
    fn test_fence_without_language_is_wrapped() {
        let html = MarkdownRenderer::default().render("```\nplain\n```\n");
        assert!(html.contains("<pre class=\"hljs\"><code>plain\n</code></pre>"));
    }

    #[test]
    fn test_raw_html_code_block_is_wrapped() {
        // Raw HTML `<pre><code>` looks the same as a rendered fence to this pass.
        let html = MarkdownRenderer::default().render("<pre><code>raw &amp; kept</code></pre>\n");
        assert!(html.contains("<pre class=\"hljs\"><code>raw &amp; kept</code></pre>"));
    }

    #[test]
    fn test_html_passthrough() {
        let html = MarkdownRenderer::default().render("<div class=\"note\">hi</div>\n");
        assert!(html.contains("<div class=\"note\">hi</div>"));
    }

    #[test]
    fn test_autolink() {
        let html = MarkdownRenderer::default().render("See https://example.com now.");
        assert!(html.contains("<a href=\"https://example.com\">https://example.com</a>"));
    }

    #[test]
    fn test_typographic_quotes() {
        let html = MarkdownRenderer::default().render("\"quoted\"");
        assert!(html.contains("\u{201c}quoted\u{201d}"));
    }

    #[test]
    fn test_footnotes() {
        let html = MarkdownRenderer::default().render("Text[^1].\n\n[^1]: The note.\n");
        assert!(html.contains("class=\"footnotes\""));
        assert!(html.contains("The note."));
    }

    #[test]
    fn test_task_lists() {
        let html = MarkdownRenderer::default().render("- [x] done\n- [ ] todo\n");
        assert!(html.contains("type=\"checkbox\""));
    }

    #[cfg(feature = "emoji")]
    #[test]
    fn test_emoji_shortcodes() {
        let html = MarkdownRenderer::default().render("Nice :smile:");
        assert!(html.contains('\u{1F604}'));
    }
}
