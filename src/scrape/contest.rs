// src/scrape/contest.rs
use std::path::{Path, PathBuf};

use crate::config::{CrawlOptions, Credentials, Site};
use crate::core::HttpClient;
use crate::error::{CrawlError, FetchError};
use crate::file::{contest_dir, contest_json_path, pdf_dir};
use crate::specs::{Boj, Codeforces, Judge, Qoj, pdf};
use crate::store::{Conflict, ContestStore};

use super::entry::{ContestEntry, OfficialDoc};
use super::merge;

/// A source that could not be read for one contest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteFailure {
    pub site: Site,
    pub error: String,
}

/// Outcome of crawling one contest.
#[derive(Clone, Debug)]
pub struct ContestReport {
    pub id: String,
    pub json_path: PathBuf,
    pub saved: bool,
    pub conflicts: Vec<Conflict>,
    pub failures: Vec<SiteFailure>,
    /// Sites with a URL that were disabled or had no collaborator.
    pub skipped: Vec<Site>,
}

/// One opened contest: where it lives and the fresh record being built.
#[derive(Debug)]
pub struct ContestSession {
    entry: ContestEntry,
    json_path: PathBuf,
    pdf_dir: PathBuf,
    store: ContestStore,
}

impl ContestSession {
    pub fn entry(&self) -> &ContestEntry {
        &self.entry
    }

    pub fn json_path(&self) -> &Path {
        &self.json_path
    }

    pub fn pdf_dir(&self) -> &Path {
        &self.pdf_dir
    }
}

/// Drives the judges for one contest at a time and writes `contest.json`.
pub struct ContestCrawler {
    options: CrawlOptions,
    judges: Vec<Box<dyn Judge>>,
    http: HttpClient,
}

impl ContestCrawler {
    pub fn new(options: CrawlOptions, judges: Vec<Box<dyn Judge>>) -> Result<Self, FetchError> {
        let http = HttpClient::new(&options.net)?;
        Ok(Self { options, judges, http })
    }

    /// The stock BOJ, Codeforces and QOJ readers for the enabled sites.
    /// QOJ is left out when no login is configured.
    pub fn with_default_judges(options: CrawlOptions, credentials: &Credentials) -> Result<Self, FetchError> {
        let mut judges: Vec<Box<dyn Judge>> = Vec::new();
        for site in &options.sites {
            match site {
                Site::Boj => judges.push(Box::new(Boj::new(&options.net, options.boj_tables.clone())?)),
                Site::Codeforces => judges.push(Box::new(Codeforces::new(&options.net)?)),
                Site::Qoj if credentials.qoj().is_some() => {
                    judges.push(Box::new(Qoj::new(&options.net, credentials)?))
                }
                Site::Qoj => logw!("QOJ credentials missing; QOJ disabled"),
            }
        }
        Self::new(options, judges)
    }

    pub fn options(&self) -> &CrawlOptions {
        &self.options
    }

    /// Start a contest. `None` when the entry lacks `id`, `category`, `year` or `filepath`.
    /// The record always starts empty: a crawl rebuilds `contest.json` from scratch.
    pub fn open(&self, entry: &ContestEntry) -> Option<ContestSession> {
        let missing = entry.missing_fields();
        if !missing.is_empty() {
            logw!("Contest entry missing {}; skipped", missing.join(", "));
            return None;
        }

        let dir = contest_dir(&self.options.root, &entry.filepath);
        Some(ContestSession {
            entry: entry.clone(),
            json_path: contest_json_path(&dir),
            pdf_dir: pdf_dir(&dir),
            store: ContestStore::new(),
        })
    }

    /// Defaults, then each site in order, then the official PDFs; then save.
    ///
    /// A site that fails is logged and skipped. A structural clash in the
    /// record aborts the contest without saving.
    pub fn process(&mut self, session: ContestSession) -> Result<ContestReport, CrawlError> {
        let ContestSession { entry, json_path, pdf_dir, mut store } = session;
        let id = entry.id.clone().unwrap_or_default();
        logf!("Processing {id}");

        merge::apply_defaults(&mut store, &entry)?;

        let mut failures = Vec::new();
        let mut skipped = Vec::new();
        for site in Site::ALL {
            let Some(url) = entry.site_url(site) else { continue };
            if !self.options.site_enabled(site) {
                logd!("{site} disabled; {url} not read");
                skipped.push(site);
                continue;
            }
            let Some(judge) = self.judges.iter_mut().find(|j| j.site() == site) else {
                logw!("{site}: no reader configured; {url} not read");
                skipped.push(site);
                continue;
            };

            match judge.fetch(url, &pdf_dir) {
                Ok(page) => merge::apply_site(&mut store, site, url, &page)?,
                Err(e) => {
                    logw!("{site}: {e}");
                    failures.push(SiteFailure { site, error: e.to_string() });
                }
            }
        }

        for doc in OfficialDoc::ALL {
            let Some(url) = entry.official_doc_url(doc) else { continue };
            if pdf::fetch_if_pdf(&self.http, url, doc.filename(), &pdf_dir) {
                merge::apply_official(&mut store, doc, url)?;
            }
        }

        let saved = store.save(&json_path);
        if saved {
            logf!("Wrote {} ({} problems)", json_path.display(), store.problem_count());
        }
        Ok(ContestReport {
            id,
            json_path,
            saved,
            conflicts: store.conflicts().to_vec(),
            failures,
            skipped,
        })
    }

    /// `open` then `process`. `Ok(None)` when the entry was not crawlable.
    pub fn crawl(&mut self, entry: &ContestEntry) -> Result<Option<ContestReport>, CrawlError> {
        match self.open(entry) {
            Some(session) => self.process(session).map(Some),
            None => Ok(None),
        }
    }
}
