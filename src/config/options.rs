// src/config/options.rs
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::consts::*;

/// A judge site that contributes to a contest record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Site {
    Boj,
    Codeforces,
    Qoj,
}

impl Site {
    /// Crawl order. Earlier sites are treated as more authoritative.
    pub const ALL: [Site; 3] = [Site::Boj, Site::Codeforces, Site::Qoj];

    /// Key used under `link` in contest and problem records.
    pub fn key(self) -> &'static str {
        match self {
            Site::Boj => "BOJ",
            Site::Codeforces => "CF",
            Site::Qoj => "QOJ",
        }
    }

    /// Prefix for PDFs saved from this site.
    pub fn pdf_prefix(self) -> &'static str {
        match self {
            Site::Boj => "boj-",
            Site::Codeforces => "cf-",
            Site::Qoj => "qoj-",
        }
    }

    pub fn base_url(self) -> &'static str {
        match self {
            Site::Boj => BOJ_BASE,
            Site::Codeforces => CF_BASE,
            Site::Qoj => QOJ_BASE,
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Site {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "boj" => Ok(Site::Boj),
            "cf" | "codeforces" => Ok(Site::Codeforces),
            "qoj" => Ok(Site::Qoj),
            other => Err(format!("Unknown site: {other} (expected boj, cf or qoj)")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetOptions {
    pub user_agent: String,
    pub request_pause: Duration,
    pub timeout: Duration,
}

impl Default for NetOptions {
    fn default() -> Self {
        Self {
            user_agent: s!(USER_AGENT),
            request_pause: Duration::from_millis(REQUEST_PAUSE_MS),
            timeout: Duration::from_secs(PAGE_TIMEOUT_SECS),
        }
    }
}

/// Everything a crawl pass needs, passed explicitly instead of living in globals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrawlOptions {
    /// Repository root; contest `filepath`s are resolved against it.
    pub root: PathBuf,
    /// Contest list, relative to `root` unless absolute.
    pub list_path: PathBuf,
    pub credentials_path: PathBuf,
    pub sites: Vec<Site>,
    /// BOJ category tables to read; empty means all of them.
    pub boj_tables: Vec<usize>,
    pub net: NetOptions,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            list_path: PathBuf::from(DEFAULT_LIST_FILE),
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
            sites: Site::ALL.to_vec(),
            boj_tables: Vec::new(),
            net: NetOptions::default(),
        }
    }
}

impl CrawlOptions {
    pub fn site_enabled(&self, site: Site) -> bool {
        self.sites.contains(&site)
    }

    pub fn disable(&mut self, site: Site) {
        self.sites.retain(|s| *s != site);
    }

    pub fn list_file(&self) -> PathBuf {
        self.root.join(&self.list_path)
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.root.join(&self.credentials_path)
    }
}
