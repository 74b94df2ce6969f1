use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::error::Md2PdfError;
use crate::options::{default_output, ensure_relative, ConvertOptions, Margins, DEFAULT_STYLE, DEFAULT_THEME};
use crate::page::{Length, PaperFormat};

#[derive(Debug, Parser)]
#[command(name = "md2pdf")]
#[command(about = "CLI utility to turn a Markdown document into a styled PDF using headless Chromium")]
#[command(version = "0.1.0")]
pub struct Args {
    /// Markdown file to convert (same as --input)
    #[arg(value_name = "FILE")]
    pub file: Option<String>,

    /// Markdown file to convert (relative path)
    #[arg(short = 'i', long = "input")]
    pub input: Option<String>,

    /// Output PDF path (relative); defaults to the input with a .pdf extension
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,

    /// Stylesheet embedded into the document (relative path)
    #[arg(short = 's', long = "style", default_value = DEFAULT_STYLE)]
    pub style: String,

    /// Paper format (Letter, Legal, Tabloid, Ledger, A0-A6)
    #[arg(short = 'f', long = "format", default_value = "A4", value_parser = parse_format)]
    pub format: PaperFormat,

    /// Print in landscape orientation
    #[arg(short = 'l', long = "landscape")]
    pub landscape: bool,

    /// Insert a generated table of contents before the body
    #[arg(long = "toc")]
    pub toc: bool,

    /// Print page headers and footers
    #[arg(
        long = "header-footer",
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_value_t = true,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub header_footer: bool,

    /// Text shown centered in the page header
    #[arg(long = "header-text", default_value = "")]
    pub header_text: String,

    #[arg(long = "margin-top", default_value = "25mm", value_parser = parse_length)]
    pub margin_top: Length,

    #[arg(long = "margin-bottom", default_value = "25mm", value_parser = parse_length)]
    pub margin_bottom: Length,

    #[arg(long = "margin-left", default_value = "20mm", value_parser = parse_length)]
    pub margin_left: Length,

    #[arg(long = "margin-right", default_value = "20mm", value_parser = parse_length)]
    pub margin_right: Length,

    /// syntect theme used for code highlighting
    #[arg(long = "highlight-theme", default_value = DEFAULT_THEME)]
    pub highlight_theme: String,

    /// Chrome/Chromium executable; auto-detected when unset
    #[arg(long = "browser", env = "MD2PDF_BROWSER")]
    pub browser: Option<PathBuf>,

    /// Browser request timeout in seconds
    #[arg(short = 't', long = "timeout", default_value = "30.0", value_parser = parse_timeout)]
    pub timeout: f64,
}

fn parse_format(s: &str) -> Result<PaperFormat, String> {
    s.parse().map_err(|e: Md2PdfError| e.to_string())
}

fn parse_length(s: &str) -> Result<Length, String> {
    s.parse().map_err(|e: Md2PdfError| e.to_string())
}

fn parse_timeout(s: &str) -> Result<f64, String> {
    let value = s.parse::<f64>().map_err(|_| "Not a number.")?;
    if !value.is_finite() || value < 0.0 {
        return Err("Must be zero or positive number.".to_string());
    }
    Ok(value)
}

const DEFAULT_LOG_FILTER: &str = "chromiumoxide::conn=off,chromiumoxide::handler=off,md2pdf=info";

/// `RUST_LOG` when set, otherwise info for md2pdf with chromiumoxide's
/// connection noise suppressed.
pub fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    match rust_log.filter(|directives| !directives.trim().is_empty()) {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::new(DEFAULT_LOG_FILTER),
    }
}

/// Folds `--header-footer true|false` into `--header-footer=<value>`. Any
/// other token after the flag is left alone, so `--header-footer doc.md`
/// keeps headers on and still reads `doc.md` as the input.
pub fn header_footer_argv<I, T>(argv: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut args = argv.into_iter().map(Into::<OsString>::into).peekable();
    while let Some(arg) = args.next() {
        if arg == "--header-footer" {
            if let Some(value) = args.next_if(|next| next == "true" || next == "false") {
                let mut joined = arg;
                joined.push("=");
                joined.push(&value);
                out.push(joined);
                continue;
            }
        }
        out.push(arg);
    }
    out
}

impl Args {
    /// Parses the process arguments, exiting with usage on error.
    pub fn parse_argv() -> Self {
        Self::parse_from(header_footer_argv(std::env::args_os()))
    }

    /// Validates the parsed flags. No file is touched here, so an absolute
    /// path fails before any I/O happens.
    pub fn into_options(self) -> Result<ConvertOptions, Md2PdfError> {
        let input = self.input.or(self.file).ok_or(Md2PdfError::MissingInput)?;
        let output = match self.output {
            Some(output) => PathBuf::from(output),
            None => default_output(&input),
        };

        Ok(ConvertOptions {
            input: ensure_relative(Path::new(&input), "--input")?,
            output: ensure_relative(&output, "--output")?,
            style: ensure_relative(Path::new(&self.style), "--style")?,
            format: self.format,
            margins: Margins {
                top: self.margin_top,
                bottom: self.margin_bottom,
                left: self.margin_left,
                right: self.margin_right,
            },
            landscape: self.landscape,
            toc: self.toc,
            header_footer: self.header_footer,
            header_text: self.header_text,
            highlight_theme: self.highlight_theme,
            browser: self.browser,
            timeout: Duration::from_secs_f64(self.timeout),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        let mut full = vec!["md2pdf"];
        full.extend_from_slice(argv);
        Args::try_parse_from(header_footer_argv(full)).unwrap()
    }

    #[test]
    fn test_defaults() {
        let options = parse(&["--input", "doc.md"]).into_options().unwrap();
        assert_eq!(options.input, PathBuf::from("doc.md"));
        assert_eq!(options.output, PathBuf::from("doc.pdf"));
        assert_eq!(options.style, PathBuf::from(DEFAULT_STYLE));
        assert_eq!(options.format, PaperFormat::A4);
        assert_eq!(options.margins.top.to_string(), "25mm");
        assert_eq!(options.margins.bottom.to_string(), "25mm");
        assert_eq!(options.margins.left.to_string(), "20mm");
        assert_eq!(options.margins.right.to_string(), "20mm");
        assert!(options.header_footer);
        assert!(options.header_text.is_empty());
        assert!(!options.landscape);
        assert!(!options.toc);
        assert_eq!(options.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_short_flags() {
        let options = parse(&["-i", "a.md", "-o", "out/b.pdf", "-s", "s.css", "-f", "letter", "-l"])
            .into_options()
            .unwrap();
        assert_eq!(options.output, PathBuf::from("out/b.pdf"));
        assert_eq!(options.style, PathBuf::from("s.css"));
        assert_eq!(options.format, PaperFormat::Letter);
        assert!(options.landscape);
    }

    #[test]
    fn test_positional_input() {
        let options = parse(&["notes.md", "--toc"]).into_options().unwrap();
        assert_eq!(options.input, PathBuf::from("notes.md"));
        assert_eq!(options.output, PathBuf::from("notes.pdf"));
        assert!(options.toc);
    }

    #[test]
    fn test_input_flag_wins_over_positional() {
        let options = parse(&["other.md", "--input", "doc.md"]).into_options().unwrap();
        assert_eq!(options.input, PathBuf::from("doc.md"));
    }

    #[test]
    fn test_missing_input() {
        let err = parse(&["--toc"]).into_options().unwrap_err();
        assert!(matches!(err, Md2PdfError::MissingInput));
        assert!(err.to_string().contains("--input is required"));
    }

    #[test]
    fn test_header_footer_values() {
        assert!(parse(&["doc.md", "--header-footer"]).header_footer);
        assert!(parse(&["doc.md", "--header-footer", "true"]).header_footer);
        assert!(!parse(&["doc.md", "--header-footer", "false"]).header_footer);
        assert!(!parse(&["--header-footer", "false", "doc.md"]).header_footer);
        assert!(!parse(&["doc.md", "--header-footer=false"]).header_footer);
    }

    #[test]
    fn test_header_footer_followed_by_input() {
        let args = parse(&["--header-footer", "doc.md"]);
        assert!(args.header_footer);
        let options = args.into_options().unwrap();
        assert_eq!(options.input, PathBuf::from("doc.md"));
        assert_eq!(options.output, PathBuf::from("doc.pdf"));

        let args = parse(&["--header-footer", "--toc", "doc.md"]);
        assert!(args.header_footer);
        assert!(args.toc);
    }

    #[test]
    fn test_log_filter_defaults() {
        let filter = log_filter(None).to_string().to_lowercase();
        assert!(filter.contains("md2pdf=info"));
        assert!(filter.contains("chromiumoxide::conn=off"));
    }

    #[test]
    fn test_rust_log_overrides_default_filter() {
        let filter = log_filter(Some("md2pdf=debug")).to_string().to_lowercase();
        assert!(filter.contains("md2pdf=debug"));
        assert!(!filter.contains("md2pdf=info"));
    }

    #[test]
    fn test_header_footer_argv_only_folds_booleans() {
        let argv = header_footer_argv(["md2pdf", "--header-footer", "false", "--header-footer", "doc.md"]);
        assert_eq!(argv, ["md2pdf", "--header-footer=false", "--header-footer", "doc.md"]);
    }

    #[test]
    fn test_absolute_paths_rejected() {
        for argv in [
            vec!["--input", "/abs/doc.md"],
            vec!["doc.md", "--output", "/abs/doc.pdf"],
            vec!["doc.md", "--style", "/abs/style.css"],
        ] {
            let err = parse(&argv).into_options().unwrap_err();
            assert!(matches!(err, Md2PdfError::AbsolutePath { .. }), "{argv:?}");
        }
    }

    #[test]
    fn test_invalid_values_rejected_by_parser() {
        assert!(Args::try_parse_from(["md2pdf", "doc.md", "--format", "B9"]).is_err());
        assert!(Args::try_parse_from(["md2pdf", "doc.md", "--margin-top", "wide"]).is_err());
        assert!(Args::try_parse_from(["md2pdf", "doc.md", "--timeout", "-1"]).is_err());
    }

    #[test]
    fn test_margins_parsed() {
        let options = parse(&["doc.md", "--margin-top", "1in", "--margin-left", "10mm"])
            .into_options()
            .unwrap();
        assert!((options.margins.top.inches() - 1.0).abs() < 1e-9);
        assert_eq!(options.margins.left.to_string(), "10mm");
    }
}
