// tests/merge_policy.rs
//
// How reports from the three sites combine into one contest record.
//
use contest_scrape::ContestStore;
use contest_scrape::config::Site;
use contest_scrape::scrape::merge::{apply_defaults, apply_official, apply_site, overwrites_titles};
use contest_scrape::scrape::{ContestEntry, OfficialDoc};
use contest_scrape::specs::{ContestPage, PdfLink, ProblemRecord};
use serde_json::json;

fn problem(id: &str, title: &str, link: &str) -> ProblemRecord {
    ProblemRecord { id: id.into(), title: title.into(), link: Some(link.into()) }
}

fn entry() -> ContestEntry {
    ContestEntry {
        id: Some("ICPC > Korea > 2023 > 2024-03-01 12:00:00.000000".into()),
        category: vec!["ICPC".into(), "Korea".into()],
        year: "2023".into(),
        filepath: "problemlists/icpc/korea/2023/".into(),
        official_url: Some("https://icpckorea.org".into()),
        ..ContestEntry::default()
    }
}

fn boj_page() -> ContestPage {
    ContestPage {
        name: Some("ICPC Seoul Regional 2023".into()),
        category: None,
        problems: vec![
            problem("A", "Apple", "https://www.acmicpc.net/problem/1"),
            problem("B", "Banana", "https://www.acmicpc.net/problem/2"),
        ],
        pdfs: vec![PdfLink { filename: "boj-set.pdf".into(), url: "https://up/set.pdf".into() }],
    }
}

fn cf_page() -> ContestPage {
    ContestPage {
        name: Some("2023 ICPC Asia Seoul Regional".into()),
        category: None,
        problems: vec![
            problem("A", "Apple Tree", "https://codeforces.com/gym/1/problem/A"),
            problem("B", "Banana", "https://codeforces.com/gym/1/problem/B"),
            problem("C", "Cherry", "https://codeforces.com/gym/1/problem/C"),
        ],
        pdfs: Vec::new(),
    }
}

#[test]
fn only_boj_overwrites_titles() {
    assert!(overwrites_titles(Site::Boj));
    assert!(!overwrites_titles(Site::Codeforces));
    assert!(!overwrites_titles(Site::Qoj));
}

#[test]
fn boj_wins_and_later_sites_fill_gaps() {
    let mut store = ContestStore::new();
    apply_defaults(&mut store, &entry()).unwrap();
    apply_site(&mut store, Site::Boj, "https://www.acmicpc.net/category/detail/1", &boj_page()).unwrap();
    apply_site(&mut store, Site::Codeforces, "https://codeforces.com/gym/1", &cf_page()).unwrap();

    assert_eq!(store.get_nested(&["name"]), Some(&json!("ICPC Seoul Regional 2023")));
    assert_eq!(store.get_nested(&["problems", "0", "title"]), Some(&json!("Apple")));
    assert_eq!(store.get_nested(&["problems", "2", "title"]), Some(&json!("Cherry")));
    assert_eq!(
        store.get_problem(0),
        Some(&json!({
            "id": "A",
            "title": "Apple",
            "link": {
                "BOJ": "https://www.acmicpc.net/problem/1",
                "CF": "https://codeforces.com/gym/1/problem/A"
            }
        }))
    );

    let paths: Vec<&str> = store.conflicts().iter().map(|c| c.path.as_str()).collect();
    assert_eq!(paths, ["name", "problems.0.title"]);
    assert!(store.conflicts().iter().all(|c| !c.overwrite));

    assert_eq!(store.get_nested(&["crawled_data", "boj-set.pdf"]), Some(&json!("https://up/set.pdf")));
    assert_eq!(
        store.get_nested(&["link"]),
        Some(&json!({
            "official": "https://icpckorea.org",
            "BOJ": "https://www.acmicpc.net/category/detail/1",
            "CF": "https://codeforces.com/gym/1"
        }))
    );
}

#[test]
fn boj_after_another_site_replaces_its_titles() {
    let mut store = ContestStore::new();
    apply_site(&mut store, Site::Codeforces, "cf", &cf_page()).unwrap();
    apply_site(&mut store, Site::Boj, "boj", &boj_page()).unwrap();

    assert_eq!(store.get_nested(&["name"]), Some(&json!("ICPC Seoul Regional 2023")));
    assert_eq!(store.get_nested(&["problems", "0", "title"]), Some(&json!("Apple")));
    assert!(store.conflicts().iter().all(|c| c.overwrite));
}

#[test]
fn qoj_category_does_not_replace_list_category() {
    let mut store = ContestStore::new();
    apply_defaults(&mut store, &entry()).unwrap();

    let qoj = ContestPage {
        name: Some("The 2023 ICPC Asia Seoul Regional Contest".into()),
        category: Some(vec!["ICPC".into(), "Asia Seoul".into()]),
        problems: vec![ProblemRecord { id: "A".into(), title: "Apple".into(), link: None }],
        pdfs: Vec::new(),
    };
    apply_site(&mut store, Site::Qoj, "https://qoj.ac/contest/1", &qoj).unwrap();

    assert_eq!(store.get_nested(&["category"]), Some(&json!(["ICPC", "Korea"])));
    assert_eq!(store.conflicts()[0].path, "category");
    // no link means no per-problem QOJ entry
    assert_eq!(store.get_problem(0), Some(&json!({"id": "A", "title": "Apple"})));
}

#[test]
fn official_pdfs_are_linked_and_listed() {
    let mut store = ContestStore::new();
    apply_official(&mut store, OfficialDoc::Statements, "https://icpc/statements").unwrap();
    apply_official(&mut store, OfficialDoc::Editorials, "https://icpc/editorials").unwrap();

    assert_eq!(store.get_nested(&["link", "statements"]), Some(&json!("https://icpc/statements")));
    assert_eq!(
        store.get_nested(&["crawled_data"]),
        Some(&json!({
            "statements.pdf": "https://icpc/statements",
            "editorials.pdf": "https://icpc/editorials"
        }))
    );
}

#[test]
fn record_filepath_drops_legacy_prefix() {
    let mut store = ContestStore::new();
    let legacy = ContestEntry { filepath: "../problemlists/icpc/korea/2023/".into(), ..entry() };
    apply_defaults(&mut store, &legacy).unwrap();

    assert_eq!(store.get_nested(&["filepath"]), Some(&json!("problemlists/icpc/korea/2023/")));
}
