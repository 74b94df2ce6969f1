//! # md2pdf
//!
//! A CLI utility to convert Markdown documents into styled PDF files.
//!
//! The Markdown is rendered to HTML with comrak (code highlighted by syntect),
//! optionally prefixed with a generated table of contents, wrapped in an HTML
//! page with the user's stylesheet and printed by headless Chromium.
//!
//! ## Usage
//!
//! ```bash
//! md2pdf --input guide.md --toc --format Letter
//! ```

pub mod cli;
mod convert;
mod document;
mod error;
mod highlight;
mod markdown;
mod options;
mod page;
mod printer;
mod toc;

pub use convert::Converter;
pub use document::{assemble, load_stylesheet};
pub use error::Md2PdfError;
pub use highlight::Highlighter;
pub use markdown::{Extension, MarkdownRenderer};
pub use options::{default_output, ConvertOptions, Margins};
pub use page::{Length, PaperFormat};
pub use printer::{PdfOptions, PdfPrinter};
pub use toc::{generate_toc, scan_headings, Heading, Toc};
