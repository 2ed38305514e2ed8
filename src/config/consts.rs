// src/config/consts.rs

// Judge sites
pub const BOJ_BASE: &str = "https://www.acmicpc.net";
pub const CF_BASE: &str = "https://codeforces.com";
pub const QOJ_BASE: &str = "https://qoj.ac";
pub const QOJ_LOGIN_URL: &str = "https://qoj.ac/login";
pub const QOJ_LOGIN_PROBE_URL: &str = "https://qoj.ac/contest/450";

// Net config
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
pub const REQUEST_PAUSE_MS: u64 = 1000; // be polite
pub const PAGE_TIMEOUT_SECS: u64 = 30;

// Contest layout
pub const CONTEST_FILE: &str = "contest.json";
pub const PDF_SUBDIR: &str = "crawled-data";
pub const DEFAULT_LIST_FILE: &str = "problemlists/contest_list.json";
pub const DEFAULT_CREDENTIALS_FILE: &str = "credential.json";
pub const DEFAULT_LOG_FILE: &str = ".store/debug.log";

// Record layout
pub const PROBLEMS_KEY: &str = "problems";
pub const LINK_KEY: &str = "link";
pub const CRAWLED_KEY: &str = "crawled_data";
pub const JSON_INDENT: &[u8] = b"    ";
pub const ID_SEPARATOR: &str = " > ";
