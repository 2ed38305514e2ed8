// src/specs/codeforces.rs
//! Scraping *spec* for Codeforces contest and gym pages.
//!
//! Gym contests that need a login redirect to `/enter`; that is reported as
//! `FetchError::LoginRequired` and the source is skipped. There is no
//! interactive login here.

use std::path::Path;

use scraper::{ElementRef, Html};

use crate::config::{NetOptions, Site, consts::CF_BASE};
use crate::core::HttpClient;
use crate::core::html::{attr, resolve, text_of};
use crate::core::sanitize::non_blank;
use crate::error::FetchError;

use super::{ContestPage, Judge, ProblemRecord, pdf, pdf_anchors};

pub struct Codeforces {
    http: HttpClient,
}

impl Codeforces {
    pub fn new(net: &NetOptions) -> Result<Self, FetchError> {
        Ok(Self { http: HttpClient::new(net)? })
    }
}

impl Judge for Codeforces {
    fn site(&self) -> Site {
        Site::Codeforces
    }

    fn fetch(&mut self, url: &str, pdf_dir: &Path) -> Result<ContestPage, FetchError> {
        logf!("Crawling CF contest: {url}");
        let page = self.http.get_html(url)?;
        if is_login_redirect(&page.url) {
            return Err(FetchError::LoginRequired { url: s!(url) });
        }

        let mut contest = parse_page(&page.body);
        contest.pdfs = pdf::download_all(&self.http, contest.pdfs, pdf_dir);
        logf!(
            "CF: {:?}, {} problems, {} PDFs",
            contest.name.as_deref().unwrap_or(""),
            contest.problems.len(),
            contest.pdfs.len()
        );
        Ok(contest)
    }
}

fn is_login_redirect(final_url: &str) -> bool {
    final_url.contains("/enter")
}

pub fn parse_page(html: &str) -> ContestPage {
    let doc = Html::parse_document(html);

    let name = doc
        .select(sel!("th.left a"))
        .next()
        .map(text_of)
        .and_then(non_blank);
    if name.is_none() {
        logw!("CF: contest name not found");
    }

    ContestPage {
        name,
        category: None,
        problems: parse_problems(&doc),
        pdfs: pdf_anchors(&doc, CF_BASE, Site::Codeforces.pdf_prefix()),
    }
}

fn parse_problems(doc: &Html) -> Vec<ProblemRecord> {
    let Some(table) = doc.select(sel!("div.datatable table.problems")).next() else {
        logw!("CF: problems table not found");
        return Vec::new();
    };

    table
        .select(sel!("tr"))
        .skip(1)
        .filter_map(|row| {
            let cells: Vec<ElementRef> = row.select(sel!("td")).collect();
            if cells.len() < 4 {
                return None;
            }
            let anchor = cells[1].select(sel!("a")).next()?;
            Some(ProblemRecord {
                id: text_of(cells[0]),
                title: text_of(anchor),
                link: attr(anchor, "href").map(|href| resolve(CF_BASE, href)),
            })
        })
        .collect()
}
