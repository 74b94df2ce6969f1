use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use crate::error::Md2PdfError;
use crate::page::{Length, PaperFormat};

pub const DEFAULT_STYLE: &str = "assets/default-style.css";
pub const DEFAULT_THEME: &str = "InspiredGitHub";

#[derive(Debug, Clone)]
pub struct Margins {
    pub top: Length,
    pub bottom: Length,
    pub left: Length,
    pub right: Length,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: Length::mm(25.0),
            bottom: Length::mm(25.0),
            left: Length::mm(20.0),
            right: Length::mm(20.0),
        }
    }
}

/// Everything a single conversion needs. Paths are kept relative here and
/// only resolved against the working directory by [`ConvertOptions::resolve`].
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub style: PathBuf,
    pub format: PaperFormat,
    pub margins: Margins,
    pub landscape: bool,
    pub toc: bool,
    pub header_footer: bool,
    pub header_text: String,
    pub highlight_theme: String,
    pub browser: Option<PathBuf>,
    pub timeout: Duration,
}

impl ConvertOptions {
    /// Options for `input` with every other field at its default.
    pub fn new(input: impl Into<String>) -> Result<Self, Md2PdfError> {
        let input = input.into();
        let output = default_output(&input);
        Ok(Self {
            input: ensure_relative(Path::new(&input), "--input")?,
            output: ensure_relative(&output, "--output")?,
            style: ensure_relative(Path::new(DEFAULT_STYLE), "--style")?,
            format: PaperFormat::A4,
            margins: Margins::default(),
            landscape: false,
            toc: false,
            header_footer: true,
            header_text: String::new(),
            highlight_theme: DEFAULT_THEME.to_string(),
            browser: None,
            timeout: Duration::from_secs(30),
        })
    }

    /// Anchors the input, output and style paths at `base`.
    pub fn resolve(mut self, base: &Path) -> Self {
        self.input = base.join(&self.input);
        self.output = base.join(&self.output);
        self.style = base.join(&self.style);
        self
    }
}

/// `doc.md` -> `doc.pdf`. Only a trailing `.md` (any case) is stripped, so
/// `notes.txt` becomes `notes.txt.pdf`.
pub fn default_output(input: &str) -> PathBuf {
    let stem = match input.len().checked_sub(3) {
        Some(cut) if input.is_char_boundary(cut) && input[cut..].eq_ignore_ascii_case(".md") => {
            &input[..cut]
        }
        _ => input,
    };
    PathBuf::from(format!("{}.pdf", stem))
}

/// Rejects absolute paths and returns the lexically normalized relative path.
pub fn ensure_relative(path: &Path, option: &'static str) -> Result<PathBuf, Md2PdfError> {
    if path.is_absolute() || path.has_root() {
        return Err(Md2PdfError::AbsolutePath {
            option,
            path: path.to_path_buf(),
        });
    }
    Ok(normalize(path))
}

fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        PathBuf::from(".")
    } else {
        parts.iter().collect()
    }
}
