// src/specs/boj.rs
//! Scraping *spec* for BOJ category pages (`/category/detail/<n>`).
//!
//! - Name: first direct text of `h1.pull-left` (the badge inside it is skipped).
//! - Problems: the striped problem tables, rows with exactly 7 cells.
//!   When the page carries several tables, ids get a `"<table>."` prefix so
//!   `A` of day 1 and `A` of day 2 stay apart.
//! - PDFs: any `.pdf` anchor on the page, saved as `boj-<file>`.

use std::path::Path;

use scraper::{ElementRef, Html};

use crate::config::{NetOptions, Site, consts::BOJ_BASE};
use crate::core::HttpClient;
use crate::core::html::{attr, own_text, resolve, text_of};
use crate::error::FetchError;

use super::{ContestPage, Judge, ProblemRecord, pdf, pdf_anchors};

pub struct Boj {
    http: HttpClient,
    tables: Vec<usize>,
}

impl Boj {
    /// `tables` restricts which problem tables are read; empty means all.
    pub fn new(net: &NetOptions, tables: Vec<usize>) -> Result<Self, FetchError> {
        Ok(Self { http: HttpClient::new(net)?, tables })
    }
}

impl Judge for Boj {
    fn site(&self) -> Site {
        Site::Boj
    }

    fn fetch(&mut self, url: &str, pdf_dir: &Path) -> Result<ContestPage, FetchError> {
        logf!("Crawling BOJ category: {url}");
        let page = self.http.get_html(url)?;
        let mut contest = parse_page(&page.body, &self.tables);
        contest.pdfs = pdf::download_all(&self.http, contest.pdfs, pdf_dir);
        logf!(
            "BOJ: {:?}, {} problems, {} PDFs",
            contest.name.as_deref().unwrap_or(""),
            contest.problems.len(),
            contest.pdfs.len()
        );
        Ok(contest)
    }
}

/// Parse a category page. PDFs are candidates, not yet downloaded.
pub fn parse_page(html: &str, tables: &[usize]) -> ContestPage {
    let doc = Html::parse_document(html);
    ContestPage {
        name: parse_name(&doc),
        category: None,
        problems: parse_problems(&doc, tables),
        pdfs: pdf_anchors(&doc, BOJ_BASE, Site::Boj.pdf_prefix()),
    }
}

fn parse_name(doc: &Html) -> Option<String> {
    let name = doc.select(sel!("h1.pull-left")).next().and_then(own_text);
    if name.is_none() {
        logw!("BOJ: category heading not found");
    }
    name
}

fn parse_problems(doc: &Html, tables: &[usize]) -> Vec<ProblemRecord> {
    let found: Vec<ElementRef> = doc
        .select(sel!("table.table.table-striped.table-bordered.clickable-table"))
        .collect();
    if found.is_empty() {
        logw!("BOJ: problems table not found");
        return Vec::new();
    }

    let chosen: Vec<usize> = if tables.is_empty() {
        (0..found.len()).collect()
    } else {
        tables.to_vec()
    };
    let multi = found.len() > 1;

    let mut out = Vec::new();
    for t in chosen {
        let Some(table) = found.get(t) else {
            logw!("BOJ: table {t} requested, page has {}", found.len());
            continue;
        };
        for row in table.select(sel!("tbody tr")) {
            let cells: Vec<ElementRef> = row.select(sel!("td")).collect();
            if cells.len() != 7 {
                continue;
            }
            let letter = text_of(cells[1]);
            let id = if multi { format!("{}.{letter}", t + 1) } else { letter };
            let link = cells[2]
                .select(sel!("a"))
                .next()
                .and_then(|a| attr(a, "href"))
                .map(|href| resolve(BOJ_BASE, href));
            out.push(ProblemRecord { id, title: text_of(cells[2]), link });
        }
    }
    out
}
