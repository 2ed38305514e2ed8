// src/scrape/mod.rs
mod contest;
mod entry;
pub mod list;
pub mod merge;

pub use contest::{ContestCrawler, ContestReport, ContestSession, SiteFailure};
pub use entry::{ContestEntry, OfficialDoc};
pub use list::{ListSummary, run_list};
