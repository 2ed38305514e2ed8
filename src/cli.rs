// src/cli.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, bail};
use serde_json::Value;

use crate::config::consts::{
    CRAWLED_KEY, DEFAULT_CREDENTIALS_FILE, DEFAULT_LIST_FILE, DEFAULT_LOG_FILE, LINK_KEY,
    PAGE_TIMEOUT_SECS, REQUEST_PAUSE_MS,
};
use crate::config::{CrawlOptions, Credentials, NetOptions, Site};
use crate::progress::Progress;
use crate::scrape::{ContestCrawler, ListSummary, run_list};
use crate::store::ContestStore;

/// Merge BOJ, Codeforces and QOJ contest pages into per-contest JSON records.
#[derive(Debug, Parser)]
#[command(name = "contest_scrape", version)]
pub struct Cli {
    /// Also write logs to FILE (crawl defaults to .store/debug.log)
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Crawl every new entry of the contest list and write it back
    Crawl(CrawlArgs),
    /// Print a contest record in its on-disk format
    Show {
        file: PathBuf,
    },
    /// Report problem count and missing per-site links of a contest record
    MergeCheck {
        file: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct CrawlArgs {
    /// Contest list, relative to --root
    #[arg(long, value_name = "FILE", default_value = DEFAULT_LIST_FILE)]
    pub list: PathBuf,

    /// Repository root that contest filepaths are relative to
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Credentials file, relative to --root
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CREDENTIALS_FILE)]
    pub credentials: PathBuf,

    /// Sites to leave out (boj, cf, qoj)
    #[arg(long, value_delimiter = ',', value_name = "SITES")]
    pub skip: Vec<Site>,

    /// Pause before each page request
    #[arg(long, value_name = "N", default_value_t = REQUEST_PAUSE_MS)]
    pub delay_ms: u64,

    /// Per-request timeout
    #[arg(long, value_name = "N", default_value_t = PAGE_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Zero-based BOJ problem tables to read (default: all)
    #[arg(long, value_delimiter = ',', value_name = "INDICES")]
    pub boj_tables: Vec<usize>,
}

impl CrawlArgs {
    pub fn into_options(self) -> CrawlOptions {
        let mut options = CrawlOptions {
            root: self.root,
            list_path: self.list,
            credentials_path: self.credentials,
            boj_tables: self.boj_tables,
            net: NetOptions {
                request_pause: Duration::from_millis(self.delay_ms),
                timeout: Duration::from_secs(self.timeout_secs),
                ..NetOptions::default()
            },
            ..CrawlOptions::default()
        };
        for site in self.skip {
            options.disable(site);
        }
        options
    }
}

pub fn run() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let crawling = matches!(cli.command, Command::Crawl(_));
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| crawling.then(|| PathBuf::from(DEFAULT_LOG_FILE)));
    crate::log::init(log_file.as_deref()).wrap_err("could not set up logging")?;

    match cli.command {
        Command::Crawl(args) => crawl(args),
        Command::Show { file } => show(&file),
        Command::MergeCheck { file } => merge_check(&file),
    }
}

fn crawl(args: CrawlArgs) -> Result<()> {
    let options = args.into_options();
    let credentials = Credentials::load(&options.credentials_file());
    let mut crawler = ContestCrawler::with_default_judges(options, &credentials)
        .wrap_err("could not set up HTTP clients")?;

    let mut progress = CliProgress::default();
    let summary = run_list(&mut crawler, Some(&mut progress)).wrap_err("contest list pass failed")?;
    print_summary(&summary);
    Ok(())
}

fn show(file: &Path) -> Result<()> {
    let mut store = ContestStore::new();
    store
        .try_load(file)
        .wrap_err_with(|| format!("could not load {}", file.display()))?;
    println!("{store}");
    Ok(())
}

fn merge_check(file: &Path) -> Result<()> {
    let store = ContestStore::open(file);
    if store.is_empty() {
        bail!("{}: no contest record", file.display());
    }

    let name = store.get_nested(&["name"]).and_then(Value::as_str).unwrap_or("(unnamed)");
    println!("{name}");
    println!("  problems: {}", store.problem_count());

    let untitled = store.problems_missing(&["title"]);
    if !untitled.is_empty() {
        println!("  without title: {}", problem_ids(&store, &untitled));
    }

    for site in Site::ALL {
        if store.get_nested(&[LINK_KEY, site.key()]).is_none() {
            continue;
        }
        let missing = store.problems_missing(&[LINK_KEY, site.key()]);
        if missing.is_empty() {
            println!("  {site}: all problems linked");
        } else {
            println!("  {site}: no link for {}", problem_ids(&store, &missing));
        }
    }

    let pdfs = store
        .get_nested(&[CRAWLED_KEY])
        .and_then(Value::as_object)
        .map_or(0, |m| m.len());
    println!("  crawled files: {pdfs}");
    Ok(())
}

fn problem_ids(store: &ContestStore, indices: &[usize]) -> String {
    indices
        .iter()
        .map(|&i| {
            store
                .get_problem(i)
                .and_then(|p| p.get("id"))
                .and_then(Value::as_str)
                .map_or_else(|| format!("#{i}"), String::from)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_summary(summary: &ListSummary) {
    println!();
    println!(
        "Crawled {} contest(s), skipped {}, failed {}",
        summary.reports.iter().filter(|r| r.saved).count(),
        summary.skipped,
        summary.failed.len()
    );

    for report in &summary.reports {
        if report.conflicts.is_empty() && report.failures.is_empty() {
            continue;
        }
        println!("{}", report.id);
        for c in &report.conflicts {
            let verb = if c.overwrite { "replaced" } else { "kept" };
            println!("  conflict at {}: {} vs {} ({verb})", c.path, c.old, c.new);
        }
        for f in &report.failures {
            println!("  {} not read: {}", f.site, f.error);
        }
    }

    for (id, reason) in &summary.failed {
        println!("retry next pass: {id} ({reason})");
    }
}

/// Prints one line per crawled or failed contest.
#[derive(Default)]
struct CliProgress {
    total: usize,
    seen: usize,
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.seen = 0;
    }

    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }

    fn item_done(&mut self, id: &str) {
        self.seen += 1;
        println!("[{}/{}] {id}", self.seen, self.total);
    }

    fn item_skipped(&mut self, _reason: &str) {
        self.seen += 1;
    }

    fn item_failed(&mut self, id: &str, error: &str) {
        self.seen += 1;
        println!("[{}/{}] {id} failed: {error}", self.seen, self.total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crawl_args_build_options() {
        let cli = Cli::parse_from([
            "contest_scrape",
            "crawl",
            "--root",
            "repo",
            "--skip",
            "cf,qoj",
            "--delay-ms",
            "0",
            "--boj-tables",
            "0,2",
        ]);
        let Command::Crawl(args) = cli.command else { panic!("expected crawl") };
        let options = args.into_options();

        assert_eq!(options.sites, vec![Site::Boj]);
        assert_eq!(options.boj_tables, vec![0, 2]);
        assert_eq!(options.net.request_pause, Duration::ZERO);
        assert_eq!(options.list_file(), PathBuf::from("repo").join(DEFAULT_LIST_FILE));
    }

    #[test]
    fn rejects_unknown_site() {
        assert!(Cli::try_parse_from(["contest_scrape", "crawl", "--skip", "atcoder"]).is_err());
    }

    #[test]
    fn merge_check_subcommand_name() {
        let cli = Cli::parse_from(["contest_scrape", "merge-check", "contest.json"]);
        assert!(matches!(cli.command, Command::MergeCheck { .. }));
    }
}
