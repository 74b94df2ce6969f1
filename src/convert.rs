use anyhow::{anyhow, Result};
use colored::*;
use tokio::fs;
use tracing::{debug, info};

use crate::document::{assemble, load_stylesheet};
use crate::error::Md2PdfError;
use crate::highlight::Highlighter;
use crate::markdown::MarkdownRenderer;
use crate::options::ConvertOptions;
use crate::printer::{PdfOptions, PdfPrinter};
use crate::toc::generate_toc;

/// Runs one Markdown -> HTML -> PDF conversion.
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    /// `options` must hold resolved paths (see [`ConvertOptions::resolve`]).
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    pub async fn run(&self) -> Result<()> {
        let html = self.build_html().await?;
        PdfPrinter::new(
            self.options.browser.clone(),
            self.options.timeout,
            PdfOptions::from(&self.options),
        )
        .print(&html, &self.options.output)
        .await
    }

    /// Everything up to the browser: reads the input and returns the full
    /// HTML document that gets printed.
    pub async fn build_html(&self) -> Result<String> {
        let input = &self.options.input;
        if !fs::try_exists(input).await.unwrap_or(false) {
            return Err(Md2PdfError::InputNotFound { path: input.clone() }.into());
        }

        info!("Converting {}", input.display().to_string().green());
        let markdown = fs::read_to_string(input)
            .await
            .map_err(|e| anyhow!("Failed to read {}: {}", input.display(), e))?;

        let renderer = MarkdownRenderer::new(Highlighter::new(&self.options.highlight_theme));
        let mut body = renderer.render(&markdown);

        let mut toc_html = String::new();
        if self.options.toc {
            let toc = generate_toc(&body);
            debug!("Table of contents: {} bytes", toc.html.len());
            toc_html = toc.html;
            body = toc.body;
        }

        let css = load_stylesheet(&self.options.style).await;
        let highlight_css = renderer.highlight_stylesheet();

        Ok(assemble(&body, &toc_html, &css, &highlight_css))
    }
}
