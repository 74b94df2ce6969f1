use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use tracing::{debug, warn};

use crate::options::DEFAULT_THEME;

const CLASS_STYLE: ClassStyle = ClassStyle::Spaced;

/// Class-based code highlighting. The colors live in [`Highlighter::stylesheet`]
/// so the generated markup stays theme-agnostic.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    /// Falls back to the default theme when `theme_name` is unknown.
    pub fn new(theme_name: &str) -> Self {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = match theme_set.themes.remove(theme_name) {
            Some(theme) => theme,
            None => {
                warn!("Unknown highlight theme {}, using {}", theme_name, DEFAULT_THEME);
                theme_set.themes.remove(DEFAULT_THEME).unwrap_or_default()
            }
        };

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    /// Highlighted HTML for `code`, or `None` when `lang` is not a known
    /// syntax or highlighting fails part way through.
    pub fn highlight(&self, code: &str, lang: &str) -> Option<String> {
        let syntax = self.syntax_set.find_syntax_by_token(lang)?;
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);

        for line in LinesWithEndings::from(code) {
            if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
                debug!("Highlighting {} failed, falling back to plain text: {}", lang, e);
                return None;
            }
        }

        Some(generator.finalize())
    }

    /// CSS matching the classes emitted by [`Highlighter::highlight`]. Empty
    /// if the theme cannot be converted.
    pub fn stylesheet(&self) -> String {
        match css_for_theme_with_class_style(&self.theme, CLASS_STYLE) {
            Ok(css) => css,
            Err(e) => {
                warn!("Could not generate highlight stylesheet: {}", e);
                String::new()
            }
        }
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(DEFAULT_THEME)
    }
}
