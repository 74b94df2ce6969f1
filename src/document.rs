use colored::*;
use std::path::Path;
use tokio::fs;
use tracing::warn;

/// Reads the user stylesheet. A missing or unreadable file is not fatal; the
/// document is then printed with the browser defaults.
pub async fn load_stylesheet(path: &Path) -> String {
    match fs::read_to_string(path).await {
        Ok(css) => css,
        Err(e) => {
            warn!(
                "Could not load style file {}, using defaults ({})",
                path.display().to_string().yellow(),
                e
            );
            String::new()
        }
    }
}

/// Wraps the rendered body into the page that gets printed.
pub fn assemble(body: &str, toc: &str, css: &str, highlight_css: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <style>{}</style>
  <style>{}</style>
</head>
<body>
  {}
  {}
</body>
</html>"#,
        highlight_css, css, toc, body
    )
}
