// src/core/html.rs
// Small helpers over `scraper` shared by the site specs.

use scraper::{ElementRef, Node};
use url::Url;

use super::sanitize::normalize_ws;

/// Visible text of an element, whitespace collapsed and trimmed.
pub fn text_of(el: ElementRef<'_>) -> String {
    let joined: String = el.text().collect::<Vec<_>>().join(" ");
    normalize_ws(&joined)
}

/// First non-blank text node directly under `el` (ignores text inside child tags).
pub fn own_text(el: ElementRef<'_>) -> Option<String> {
    el.children()
        .filter_map(|child| match child.value() {
            Node::Text(t) => Some(normalize_ws(t)),
            _ => None,
        })
        .find(|t| !t.is_empty())
}

pub fn attr<'a>(el: ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name).map(str::trim).filter(|v| !v.is_empty())
}

/// Resolve `href` against `base` the way a browser would.
/// Falls back to the raw href when either side does not parse.
pub fn resolve(base: &str, href: &str) -> String {
    match Url::parse(base).and_then(|b| b.join(href)) {
        Ok(u) => u.to_string(),
        Err(_) => s!(href),
    }
}

/// `.pdf` at the end of the path, case-insensitive, query/fragment ignored.
pub fn is_pdf_href(href: &str) -> bool {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    let bytes = path.as_bytes();
    bytes.len() >= 4 && bytes[bytes.len() - 4..].eq_ignore_ascii_case(b".pdf")
}

/// Last path segment of a URL (`.../files/A.pdf` → `A.pdf`).
pub fn last_segment(href: &str) -> &str {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    path.rsplit('/').next().unwrap_or(path)
}
