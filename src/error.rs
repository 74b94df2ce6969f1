use std::path::PathBuf;
use thiserror::Error;

/// Fatal user errors. Anything raised here stops the run before the browser
/// is ever launched.
#[derive(Debug, Error)]
pub enum Md2PdfError {
    #[error("--input is required\nUsage: md2pdf --input <file.md> [--output <file.pdf>] [options]")]
    MissingInput,

    #[error("{option} must be a relative path: {}", path.display())]
    AbsolutePath { option: &'static str, path: PathBuf },

    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Unknown paper format: {0}")]
    UnknownPaperFormat(String),

    #[error("Invalid length '{0}' (expected a number with an optional px, in, cm or mm unit)")]
    InvalidLength(String),
}
