use anyhow::{anyhow, Result};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::{Browser, BrowserConfig};
use colored::*;
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, error, info};

use crate::options::{ConvertOptions, Margins};
use crate::page::PaperFormat;

const LAUNCH_ARGS: [&str; 3] = ["--disable-setuid-sandbox", "--disable-dev-shm-usage", "--disable-gpu"];

const TEMPLATE_STYLE: &str = "font-size:9px; color:#888; width:100%; text-align:center; padding:5px 0;";

#[derive(Debug, Clone)]
pub struct PdfOptions {
    pub format: PaperFormat,
    pub margins: Margins,
    pub landscape: bool,
    pub header_footer: bool,
    pub header_text: String,
}

impl From<&ConvertOptions> for PdfOptions {
    fn from(options: &ConvertOptions) -> Self {
        Self {
            format: options.format,
            margins: options.margins.clone(),
            landscape: options.landscape,
            header_footer: options.header_footer,
            header_text: options.header_text.clone(),
        }
    }
}

impl PdfOptions {
    /// DevTools `Page.printToPDF` parameters for these options.
    pub fn to_params(&self) -> PrintToPdfParams {
        let (width, height) = self.format.size_inches();

        let mut params = PrintToPdfParams {
            landscape: Some(self.landscape),
            print_background: Some(true),
            paper_width: Some(width),
            paper_height: Some(height),
            margin_top: Some(self.margins.top.inches()),
            margin_bottom: Some(self.margins.bottom.inches()),
            margin_left: Some(self.margins.left.inches()),
            margin_right: Some(self.margins.right.inches()),
            ..Default::default()
        };

        if self.header_footer {
            params.display_header_footer = Some(true);
            params.header_template = Some(self.header_template());
            params.footer_template = Some(footer_template());
        }

        params
    }

    fn header_template(&self) -> String {
        if self.header_text.is_empty() {
            "<span></span>".to_string()
        } else {
            format!(
                r#"<div style="{}">{}</div>"#,
                TEMPLATE_STYLE,
                html_escape::encode_text(&self.header_text)
            )
        }
    }
}

fn footer_template() -> String {
    format!(
        r#"<div style="{}"><span class="pageNumber"></span> / <span class="totalPages"></span></div>"#,
        TEMPLATE_STYLE
    )
}

/// Prints HTML to PDF with a headless Chromium that lives for one call.
pub struct PdfPrinter {
    browser_path: Option<PathBuf>,
    timeout: Duration,
    pdf_options: PdfOptions,
}

impl PdfPrinter {
    pub fn new(browser_path: Option<PathBuf>, timeout: Duration, pdf_options: PdfOptions) -> Self {
        Self {
            browser_path,
            timeout,
            pdf_options,
        }
    }

    pub async fn print(&self, html: &str, output: &Path) -> Result<()> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .args(LAUNCH_ARGS)
            .request_timeout(self.timeout);
        if let Some(path) = &self.browser_path {
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(|e| anyhow!("Failed to create browser config: {}", e))?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| anyhow!("Failed to launch browser: {}", e))?;

        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if let Err(err) = h {
                    // Chromium emits protocol messages chromiumoxide has no type for
                    let err_str = err.to_string();
                    if !err_str.contains("data did not match any variant")
                        && !err_str.contains("untagged enum Message")
                    {
                        error!("Browser handler error: {}", err);
                    } else {
                        debug!("Chrome protocol message ignored: {}", err);
                    }
                }
            }
        });

        let result = self.print_internal(&browser, html, output).await;

        browser.close().await.ok();
        handle.abort();

        result
    }

    async fn print_internal(&self, browser: &Browser, html: &str, output: &Path) -> Result<()> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| anyhow!("Failed to create new page: {}", e))?;

        page.set_content(html)
            .await
            .map_err(|e| anyhow!("Failed to set page content: {}", e))?;

        page.wait_for_navigation()
            .await
            .map_err(|e| anyhow!("Failed to wait for page load: {}", e))?;

        debug!(
            "Printing {} page ({}landscape)",
            self.pdf_options.format,
            if self.pdf_options.landscape { "" } else { "not " }
        );

        let pdf_data = page
            .pdf(self.pdf_options.to_params())
            .await
            .map_err(|e| anyhow!("Failed to generate PDF: {}", e))?;

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| anyhow!("Failed to create directory: {}", e))?;
        }

        fs::write(output, pdf_data)
            .await
            .map_err(|e| anyhow!("Failed to write PDF to {}: {}", output.display(), e))?;

        info!("PDF generated: {}", output.display().to_string().green());
        Ok(())
    }
}
