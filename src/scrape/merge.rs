// src/scrape/merge.rs
//! Per-source merge policy.
//!
//! BOJ is queried first and is authoritative for names, problem ids and titles.
//! Codeforces and QOJ only fill gaps there; when they disagree the store logs
//! and records the conflict but keeps BOJ's value. Links are keyed by site, so
//! they never compete.

use crate::config::Site;
use crate::config::consts::{CRAWLED_KEY, LINK_KEY};
use crate::error::StoreError;
use crate::file::relative_filepath;
use crate::specs::ContestPage;
use crate::store::ContestStore;

use super::entry::{ContestEntry, OfficialDoc};

/// Whether `site` may replace names and titles already in the record.
pub fn overwrites_titles(site: Site) -> bool {
    matches!(site, Site::Boj)
}

/// Fields that come straight from the contest list.
pub fn apply_defaults(store: &mut ContestStore, entry: &ContestEntry) -> Result<(), StoreError> {
    store.update_nested(&["id"], entry.id.clone(), true)?;
    store.update_nested(&["category"], entry.category.clone(), true)?;
    store.update_nested(&["year"], entry.year.as_str(), true)?;
    store.update_nested(&["filepath"], relative_filepath(&entry.filepath), true)?;
    store.update_nested(&[LINK_KEY, "official"], entry.official_url.clone(), true)?;
    store.update_nested(&[LINK_KEY, "standing"], entry.standing_url.clone(), true)?;
    Ok(())
}

/// Merge what `site` reported for the contest at `url`.
pub fn apply_site(
    store: &mut ContestStore,
    site: Site,
    url: &str,
    page: &ContestPage,
) -> Result<(), StoreError> {
    let overwrite = overwrites_titles(site);

    if let Some(category) = &page.category {
        store.update_nested(&["category"], category.clone(), false)?;
    }
    store.update_nested(&["name"], page.name.clone(), overwrite)?;
    store.update_nested(&[LINK_KEY, site.key()], url, true)?;
    for pdf in &page.pdfs {
        store.update_nested(&[CRAWLED_KEY, pdf.filename.as_str()], pdf.url.as_str(), true)?;
    }

    for (idx, problem) in page.problems.iter().enumerate() {
        store.update_problem(idx, &["id"], problem.id.as_str(), overwrite)?;
        store.update_problem(idx, &["title"], problem.title.as_str(), overwrite)?;
        store.update_problem(idx, &[LINK_KEY, site.key()], problem.link.clone(), true)?;
    }
    Ok(())
}

/// Record an official PDF that was saved as `doc.filename()`.
pub fn apply_official(store: &mut ContestStore, doc: OfficialDoc, url: &str) -> Result<(), StoreError> {
    store.update_nested(&[LINK_KEY, doc.key()], url, true)?;
    store.update_nested(&[CRAWLED_KEY, doc.filename()], url, true)?;
    Ok(())
}
