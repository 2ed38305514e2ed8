// src/specs/qoj.rs
//! Scraping *spec* for QOJ contest pages (`/contest/<n>`).
//!
//! QOJ hides contest pages behind a login. The session is opened lazily on the
//! first fetch and kept in the client's cookie store:
//! 1. GET `/login` and pull the CSRF token out of the inline script.
//! 2. POST the form with the password as an MD5 hex digest (what the site's own
//!    login script sends).
//! 3. Probe a known contest page; a page that never mentions "contest" means
//!    the session was not accepted.

use std::path::Path;
use std::sync::OnceLock;

use md5::{Digest, Md5};
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::config::{
    Credentials, NetOptions, Site,
    consts::{QOJ_BASE, QOJ_LOGIN_PROBE_URL, QOJ_LOGIN_URL},
};
use crate::core::HttpClient;
use crate::core::html::{attr, resolve, text_of};
use crate::core::sanitize::{non_blank, pdf_filename};
use crate::error::FetchError;

use super::{ContestPage, Judge, PdfLink, ProblemRecord, pdf};

pub struct Qoj {
    http: HttpClient,
    account: Option<(String, String)>,
    logged_in: bool,
}

impl Qoj {
    pub fn new(net: &NetOptions, credentials: &Credentials) -> Result<Self, FetchError> {
        Ok(Self {
            http: HttpClient::new(net)?,
            account: credentials.qoj().map(|(u, p)| (s!(u), s!(p))),
            logged_in: false,
        })
    }

    fn ensure_login(&mut self) -> Result<(), FetchError> {
        if self.logged_in {
            return Ok(());
        }
        let Some((username, password)) = &self.account else {
            return Err(login_failed("no credentials configured"));
        };

        let login_page = self.http.get_text(QOJ_LOGIN_URL)?;
        let token = csrf_token(&login_page).ok_or_else(|| login_failed("CSRF token not found"))?;
        let digest = md5_hex(password);
        self.http.post_form(
            QOJ_LOGIN_URL,
            &[
                ("_token", token),
                ("login", ""),
                ("username", username.as_str()),
                ("password", digest.as_str()),
            ],
        )?;

        let probe = self.http.get_text(QOJ_LOGIN_PROBE_URL)?;
        if !probe.to_lowercase().contains("contest") {
            return Err(login_failed("session was not accepted"));
        }

        logf!("QOJ login successful");
        self.logged_in = true;
        Ok(())
    }
}

impl Judge for Qoj {
    fn site(&self) -> Site {
        Site::Qoj
    }

    fn fetch(&mut self, url: &str, pdf_dir: &Path) -> Result<ContestPage, FetchError> {
        self.ensure_login()?;

        logf!("Crawling QOJ contest: {url}");
        let page = self.http.get_html(url)?;
        let mut contest = parse_page(&page.body);
        contest.pdfs = pdf::download_all(&self.http, contest.pdfs, pdf_dir);
        logf!(
            "QOJ: {:?} {:?}, {} problems, {} PDFs",
            contest.name.as_deref().unwrap_or(""),
            contest.category.as_deref().unwrap_or_default(),
            contest.problems.len(),
            contest.pdfs.len()
        );
        Ok(contest)
    }
}

fn login_failed(reason: &str) -> FetchError {
    FetchError::LoginFailed { site: "QOJ", reason: s!(reason) }
}

pub(crate) fn csrf_token(login_page: &str) -> Option<&str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r#"_token\s*:\s*"([^"]+)""#).expect("valid regex"));
    re.captures(login_page)?.get(1).map(|m| m.as_str())
}

pub(crate) fn md5_hex(text: &str) -> String {
    format!("{:x}", Md5::digest(text.as_bytes()))
}

pub fn parse_page(html: &str) -> ContestPage {
    let doc = Html::parse_document(html);

    let name = doc
        .select(sel!("div.text-center h1"))
        .next()
        .map(text_of)
        .and_then(non_blank);
    if name.is_none() {
        logw!("QOJ: contest heading not found");
    }

    ContestPage {
        name,
        category: parse_category(&doc),
        problems: parse_problems(&doc),
        pdfs: parse_attachments(&doc),
    }
}

/// Breadcrumb anchors of the alert box, minus the leading "Contests" link.
fn parse_category(doc: &Html) -> Option<Vec<String>> {
    let Some(alert) = doc.select(sel!("div.alert.alert-secondary")).next() else {
        logw!("QOJ: contest category not found");
        return None;
    };
    Some(alert.select(sel!("a")).skip(1).map(text_of).collect())
}

fn parse_problems(doc: &Html) -> Vec<ProblemRecord> {
    let Some(table) = doc.select(sel!("table.table-bordered")).next() else {
        logw!("QOJ: problems table not found");
        return Vec::new();
    };

    table
        .select(sel!("tr"))
        .skip(1)
        .filter_map(|row| {
            let cells: Vec<ElementRef> = row.select(sel!("td")).collect();
            if cells.len() < 2 {
                return None;
            }
            let link = cells[1]
                .select(sel!("a"))
                .next()
                .and_then(|a| attr(a, "href"))
                .map(|href| resolve(QOJ_BASE, href));
            Some(ProblemRecord { id: text_of(cells[0]), title: text_of(cells[1]), link })
        })
        .collect()
}

/// Links in the first `div` after the `Attachments` heading.
fn parse_attachments(doc: &Html) -> Vec<PdfLink> {
    let Some(heading) = doc
        .select(sel!("h4"))
        .find(|h| text_of(*h) == "Attachments")
    else {
        return Vec::new();
    };
    let Some(block) = following_div(heading) else {
        return Vec::new();
    };

    let mut out: Vec<PdfLink> = Vec::new();
    for a in block.select(sel!("a.list-group-item.list-group-item-action")) {
        let Some(href) = attr(a, "href") else { continue };
        let filename = pdf_filename(Site::Qoj.pdf_prefix(), &text_of(a));
        if out.iter().any(|p| p.filename == filename) {
            continue;
        }
        out.push(PdfLink { filename, url: resolve(QOJ_BASE, href) });
    }
    out
}

fn following_div(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.next_siblings().filter_map(ElementRef::wrap).find_map(|sib| {
        if sib.value().name() == "div" {
            Some(sib)
        } else {
            sib.select(sel!("div")).next()
        }
    })
}
