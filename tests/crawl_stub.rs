// tests/crawl_stub.rs
//
// A full list pass against stand-in judges: no network, real files.
//
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use contest_scrape::config::{CrawlOptions, NetOptions, Site};
use contest_scrape::error::FetchError;
use contest_scrape::progress::Progress;
use contest_scrape::scrape::{ContestCrawler, ContestEntry, run_list};
use contest_scrape::specs::{ContestPage, Judge, ProblemRecord};
use serde_json::{Value, json};

struct StubJudge {
    site: Site,
    page: Option<ContestPage>,
    seen: Rc<RefCell<Vec<String>>>,
}

impl Judge for StubJudge {
    fn site(&self) -> Site {
        self.site
    }

    fn fetch(&mut self, url: &str, _pdf_dir: &Path) -> Result<ContestPage, FetchError> {
        self.seen.borrow_mut().push(url.to_string());
        match &self.page {
            Some(page) => Ok(page.clone()),
            None => Err(FetchError::LoginRequired { url: url.to_string() }),
        }
    }
}

#[derive(Default)]
struct Recorder {
    lines: Vec<String>,
    done: Vec<String>,
    skipped: usize,
    failed: Vec<String>,
    finished: bool,
}

impl Progress for Recorder {
    fn log(&mut self, msg: &str) {
        self.lines.push(msg.to_string());
    }
    fn item_done(&mut self, id: &str) {
        self.done.push(id.to_string());
    }
    fn item_skipped(&mut self, _reason: &str) {
        self.skipped += 1;
    }
    fn item_failed(&mut self, id: &str, _error: &str) {
        self.failed.push(id.to_string());
    }
    fn finish(&mut self) {
        self.finished = true;
    }
}

fn page(name: &str, titles: &[(&str, &str, &str)]) -> ContestPage {
    ContestPage {
        name: Some(name.into()),
        category: None,
        problems: titles
            .iter()
            .map(|(id, title, link)| ProblemRecord {
                id: (*id).into(),
                title: (*title).into(),
                link: Some((*link).into()),
            })
            .collect(),
        pdfs: Vec::new(),
    }
}

fn options(root: &Path) -> CrawlOptions {
    CrawlOptions {
        root: root.to_path_buf(),
        net: NetOptions { request_pause: Duration::ZERO, ..NetOptions::default() },
        ..CrawlOptions::default()
    }
}

fn stubs(seen: &Rc<RefCell<Vec<String>>>) -> Vec<Box<dyn Judge>> {
    vec![
        Box::new(StubJudge {
            site: Site::Boj,
            page: Some(page("BOJ Name", &[("A", "Apple", "boj/1"), ("B", "Banana", "boj/2")])),
            seen: Rc::clone(seen),
        }),
        Box::new(StubJudge {
            site: Site::Codeforces,
            page: Some(page("CF Name", &[("A", "Apple Tree", "cf/A"), ("B", "Banana", "cf/B")])),
            seen: Rc::clone(seen),
        }),
        Box::new(StubJudge { site: Site::Qoj, page: None, seen: Rc::clone(seen) }),
    ]
}

fn write_list(root: &Path, rows: Value) -> std::path::PathBuf {
    let list = root.join("problemlists").join("contest_list.json");
    fs::create_dir_all(list.parent().unwrap()).unwrap();
    fs::write(&list, serde_json::to_string_pretty(&rows).unwrap()).unwrap();
    list
}

#[test]
fn list_pass_merges_sources_and_stamps_ids() {
    let tmp = tempfile::tempdir().unwrap();
    let list = write_list(
        tmp.path(),
        json!([
            {
                "category": ["ICPC", "Korea"],
                "year": "2023",
                "filepath": "problemlists/icpc/korea/2023/",
                "standing_url": "",
                "boj_url": "https://www.acmicpc.net/category/detail/1",
                "cf_url": "https://codeforces.com/gym/1",
                "qoj_url": "https://qoj.ac/contest/1"
            },
            {"id": "crawled before", "category": ["X"], "year": "2000", "filepath": "p/x/"},
            {"category": [], "year": "", "filepath": ""},
            "not an entry"
        ]),
    );

    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut crawler = ContestCrawler::new(options(tmp.path()), stubs(&seen)).unwrap();
    let mut progress = Recorder::default();
    let summary = run_list(&mut crawler, Some(&mut progress)).unwrap();

    // every configured site was asked, in order
    assert_eq!(
        *seen.borrow(),
        ["https://www.acmicpc.net/category/detail/1", "https://codeforces.com/gym/1", "https://qoj.ac/contest/1"]
    );

    assert_eq!(summary.reports.len(), 1);
    assert_eq!(summary.skipped, 3);
    assert!(summary.failed.is_empty());
    assert_eq!(progress.done.len(), 1);
    assert_eq!(progress.skipped, 3);
    assert!(progress.finished);
    assert_eq!(progress.lines.len(), 1);
    assert!(progress.lines[0].ends_with("(4 entries)"));

    let report = &summary.reports[0];
    assert!(report.saved);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].site, Site::Qoj);
    let conflict_paths: Vec<&str> = report.conflicts.iter().map(|c| c.path.as_str()).collect();
    assert_eq!(conflict_paths, ["name", "problems.0.title"]);

    // contest record
    let json_path = tmp.path().join("problemlists").join("icpc").join("korea").join("2023").join("contest.json");
    assert_eq!(report.json_path, json_path);
    let record: Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    let keys: Vec<&str> = record.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["id", "category", "year", "filepath", "name", "link", "problems"]);
    assert_eq!(record["name"], json!("BOJ Name"));
    assert_eq!(record["filepath"], json!("problemlists/icpc/korea/2023/"));
    assert_eq!(
        record["problems"],
        json!([
            {"id": "A", "title": "Apple", "link": {"BOJ": "boj/1", "CF": "cf/A"}},
            {"id": "B", "title": "Banana", "link": {"BOJ": "boj/2", "CF": "cf/B"}}
        ])
    );
    assert!(record["link"].get("QOJ").is_none());

    // list written back
    let text = fs::read_to_string(&list).unwrap();
    assert!(text.contains("\"category\": [ \"ICPC\", \"Korea\" ]"));
    let rows: Value = serde_json::from_str(&text).unwrap();
    let id = rows[0]["id"].as_str().unwrap();
    assert!(id.starts_with("ICPC > Korea > 2023 > "));
    assert_eq!(record["id"], json!(id));
    assert!(rows[0].get("standing_url").is_none());
    assert_eq!(rows[1]["id"], json!("crawled before"));
    assert_eq!(rows[2], json!({"category": [], "year": "", "filepath": ""}));
    assert_eq!(rows[3], json!("not an entry"));
}

#[test]
fn disabled_sites_are_not_asked() {
    let tmp = tempfile::tempdir().unwrap();
    write_list(
        tmp.path(),
        json!([{
            "category": ["ICPC"],
            "year": "2022",
            "filepath": "c/",
            "boj_url": "boj",
            "cf_url": "cf"
        }]),
    );

    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut opts = options(tmp.path());
    opts.disable(Site::Codeforces);
    let mut crawler = ContestCrawler::new(opts, stubs(&seen)).unwrap();
    let summary = run_list(&mut crawler, None).unwrap();

    assert_eq!(*seen.borrow(), ["boj"]);
    assert_eq!(summary.reports[0].skipped, [Site::Codeforces]);
    let record: Value =
        serde_json::from_str(&fs::read_to_string(tmp.path().join("c").join("contest.json")).unwrap()).unwrap();
    assert_eq!(record["link"], json!({"BOJ": "boj"}));
}

#[test]
fn unsaved_contest_is_retried_next_pass() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("blocked"), "a file, not a directory").unwrap();
    let list = write_list(
        tmp.path(),
        json!([{"category": ["ICPC"], "year": "2021", "filepath": "blocked/2021/", "boj_url": "boj"}]),
    );

    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut crawler = ContestCrawler::new(options(tmp.path()), stubs(&seen)).unwrap();
    let mut progress = Recorder::default();
    let summary = run_list(&mut crawler, Some(&mut progress)).unwrap();

    assert_eq!(summary.failed.len(), 1);
    assert_eq!(progress.failed.len(), 1);
    assert!(!summary.reports[0].saved);

    let rows: Value = serde_json::from_str(&fs::read_to_string(&list).unwrap()).unwrap();
    assert!(rows[0].get("id").is_none());
}

#[test]
fn open_rejects_incomplete_entries() {
    let tmp = tempfile::tempdir().unwrap();
    let crawler = ContestCrawler::new(options(tmp.path()), Vec::new()).unwrap();

    assert!(crawler.open(&ContestEntry::default()).is_none());

    let entry = ContestEntry {
        id: Some("x".into()),
        category: vec!["ICPC".into()],
        year: "2020".into(),
        filepath: "../problemlists/icpc/2020/".into(),
        ..ContestEntry::default()
    };
    let session = crawler.open(&entry).unwrap();
    assert_eq!(session.entry().year, "2020");
    assert_eq!(
        session.json_path(),
        tmp.path().join("problemlists").join("icpc").join("2020").join("contest.json")
    );
    assert_eq!(session.pdf_dir(), tmp.path().join("problemlists").join("icpc").join("2020").join("crawled-data"));
}

#[test]
fn missing_list_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let mut crawler = ContestCrawler::new(options(tmp.path()), Vec::new()).unwrap();
    assert!(run_list(&mut crawler, None).is_err());
}
