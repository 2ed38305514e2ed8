// src/core/sanitize.rs

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// File name for a crawled PDF: `<site prefix><name>` with spaces turned into dashes
/// and a `.pdf` extension guaranteed.
pub fn pdf_filename(prefix: &str, raw: &str) -> String {
    let name = raw.trim().replace(' ', "-");
    if name.to_ascii_lowercase().ends_with(".pdf") {
        join!(prefix, &name)
    } else {
        join!(prefix, &name, ".pdf")
    }
}

/// `None` for empty or whitespace-only text.
pub fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}
