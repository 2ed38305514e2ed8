// src/specs/mod.rs
//! # Scraping “specs” module
//!
//! Page-specific readers for the judge sites. Each spec knows one kind of page
//! (a BOJ category, a Codeforces contest, a QOJ contest) and encodes *where the
//! ground truth lives in the HTML* and *how to extract it*.
//!
//! ## What lives here
//! - **Pure HTML parsing** (`parse_page`) over captured markup, testable offline.
//! - **Fetching** through `core::net::HttpClient` and the site's login flow, if any.
//! - **PDF plumbing** (`pdf`): content-type and `%PDF-` checks, streaming to disk.
//! - **Light shaping** of results into a [`ContestPage`].
//!
//! ## What does **not** live here
//! - **Merging** into contest records: sources disagree, and the per-source
//!   overwrite policy lives in `scrape::merge`.
//! - **Persistence** of the record itself (`store`).
//!
//! ## Typical call chain
//! ```text
//! scrape::ContestCrawler → Judge::fetch(url, pdf_dir) → ContestPage
//!                        ↘ scrape::merge::apply_site → store::ContestStore
//! ```
//!
//! ## Conventions
//! - A missing piece (no heading, no table) is logged and left empty; only
//!   transport and login problems are errors.
//! - PDFs appear in `ContestPage::pdfs` only once they are on disk.

use std::path::Path;

use scraper::Html;

use crate::config::Site;
use crate::core::html::{attr, is_pdf_href, last_segment, resolve};
use crate::core::sanitize::pdf_filename;
use crate::error::FetchError;

pub mod boj;
pub mod codeforces;
pub mod pdf;
pub mod qoj;

pub use boj::Boj;
pub use codeforces::Codeforces;
pub use qoj::Qoj;

/// One problem row as a site lists it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProblemRecord {
    /// Letter (or `"<table>.<letter>"` on multi-table BOJ pages).
    pub id: String,
    pub title: String,
    pub link: Option<String>,
}

/// A PDF saved under the contest's crawl directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PdfLink {
    pub filename: String,
    pub url: String,
}

/// What a site knows about one contest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContestPage {
    pub name: Option<String>,
    /// Category trail, only offered by QOJ.
    pub category: Option<Vec<String>>,
    pub problems: Vec<ProblemRecord>,
    pub pdfs: Vec<PdfLink>,
}

/// A judge site that can describe a contest.
pub trait Judge {
    fn site(&self) -> Site;

    /// Read the contest at `url`, saving its PDFs into `pdf_dir`.
    fn fetch(&mut self, url: &str, pdf_dir: &Path) -> Result<ContestPage, FetchError>;
}

/// Every `a[href]` pointing at a `.pdf`, resolved against `base`, first name wins.
pub(crate) fn pdf_anchors(doc: &Html, base: &str, prefix: &str) -> Vec<PdfLink> {
    let mut out: Vec<PdfLink> = Vec::new();
    for a in doc.select(sel!("a[href]")) {
        let Some(href) = attr(a, "href") else { continue };
        if !is_pdf_href(href) {
            continue;
        }
        let filename = pdf_filename(prefix, last_segment(href));
        if out.iter().any(|p| p.filename == filename) {
            continue;
        }
        logd!("Found link: {filename} → {href}");
        out.push(PdfLink { filename, url: resolve(base, href) });
    }
    out
}
