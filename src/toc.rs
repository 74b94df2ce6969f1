use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const LEVELS: [u8; 3] = [2, 3, 4];

// One alternative per level so each opening tag only pairs with its own
// closing tag; an unclosed `<h2>` then leaves the following headings alone.
// Groups per level: (id, inner).
static HEADING_REGEX: Lazy<Regex> = Lazy::new(|| {
    let alternatives: Vec<String> = LEVELS
        .iter()
        .map(|level| format!(r#"<h{level}\s*(?:id="([^"]*)")?[^>]*>(.*?)</h{level}>"#))
        .collect();
    Regex::new(&format!("(?is){}", alternatives.join("|"))).unwrap()
});

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// A heading picked up by [`generate_toc`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    pub id: String,
}

/// Result of the heading scan: the TOC markup and the body with every
/// scanned heading carrying an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toc {
    pub html: String,
    pub body: String,
}

/// Collects h2-h4 headings from rendered HTML, giving `heading-N` ids to the
/// ones without an id, and builds the table of contents linking to them.
pub fn generate_toc(html: &str) -> Toc {
    let (body, headings) = scan_headings(html);
    Toc {
        html: render_toc(&headings),
        body,
    }
}

pub fn scan_headings(html: &str) -> (String, Vec<Heading>) {
    let mut headings = Vec::new();
    let mut next_id = 0usize;

    let body = HEADING_REGEX.replace_all(html, |caps: &Captures| {
        let Some((level, id_group, inner)) = LEVELS.iter().enumerate().find_map(|(i, level)| {
            caps.get(2 * i + 2).map(|inner| (*level, caps.get(2 * i + 1), inner.as_str()))
        }) else {
            return caps[0].to_string();
        };

        let id = match id_group.map(|m| m.as_str()).filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => {
                let id = format!("heading-{}", next_id);
                next_id += 1;
                id
            }
        };

        headings.push(Heading {
            level,
            text: TAG_REGEX.replace_all(inner, "").trim().to_string(),
            id: id.clone(),
        });

        format!("<h{level} id=\"{id}\">{inner}</h{level}>")
    });

    (body.into_owned(), headings)
}

fn render_toc(headings: &[Heading]) -> String {
    if headings.is_empty() {
        return String::new();
    }

    let mut toc = String::from("<div class=\"table-of-contents\">\n<h2>Table of Contents</h2>\n<ul>\n");
    for heading in headings {
        let indent = "  ".repeat(usize::from(heading.level.saturating_sub(2)));
        toc.push_str(&format!(
            "{}<li class=\"toc-level-{}\"><a href=\"#{}\">{}</a></li>\n",
            indent, heading.level, heading.id, heading.text
        ));
    }
    toc.push_str("</ul>\n</div>\n");
    toc
}
