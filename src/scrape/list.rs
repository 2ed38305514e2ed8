// src/scrape/list.rs
//! The contest-list pass.
//!
//! `problemlists/contest_list.json` is a JSON array of [`ContestEntry`] objects.
//! An entry without an `id` is new: it gets an id stamped from its category,
//! year and the current time, is crawled, and the list is written back so the
//! next pass skips it.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Map, Serializer, Value};

use crate::config::consts::{ID_SEPARATOR, JSON_INDENT};
use crate::error::CrawlError;
use crate::progress::Progress;
use crate::store::is_blank;

use super::contest::{ContestCrawler, ContestReport};
use super::entry::ContestEntry;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// What a list pass did.
#[derive(Debug, Default)]
pub struct ListSummary {
    pub reports: Vec<ContestReport>,
    pub skipped: usize,
    /// Contests that will be retried next pass, with the reason.
    pub failed: Vec<(String, String)>,
}

pub fn load_list(path: &Path) -> Result<Vec<Value>, CrawlError> {
    let text = fs::read_to_string(path)
        .map_err(|source| CrawlError::ListIo { path: path.to_path_buf(), source })?;
    let value: Value = serde_json::from_str(&text)
        .map_err(|source| CrawlError::ListJson { path: path.to_path_buf(), source })?;
    match value {
        Value::Array(entries) => Ok(entries),
        _ => Err(CrawlError::ListShape { path: path.to_path_buf() }),
    }
}

/// Normalise one list row in place and decide whether it is due for a crawl.
///
/// Blank values become `null` on every row. A row that already has an `id`,
/// or lacks `category`, `year` or `filepath`, is left for the caller to skip.
/// A due row gets its `id` and loses its `null` keys.
pub fn prepare_entry(row: &mut Map<String, Value>, now: DateTime<Local>) -> Option<ContestEntry> {
    if row.values().all(is_blank) {
        return None;
    }
    for value in row.values_mut() {
        if is_blank(value) {
            *value = Value::Null;
        }
    }

    if row.get("id").is_some_and(|v| !v.is_null()) {
        return None;
    }
    let present = |key: &str| row.get(key).is_some_and(|v| !v.is_null());
    if !(present("category") && present("year") && present("filepath")) {
        return None;
    }

    let mut parts: Vec<String> = match &row["category"] {
        Value::Array(items) => items.iter().map(plain_text).collect(),
        other => vec![plain_text(other)],
    };
    parts.push(plain_text(&row["year"]));
    parts.push(now.format(TIMESTAMP_FORMAT).to_string());
    row.insert(s!("id"), Value::String(parts.join(ID_SEPARATOR)));

    row.retain(|_, v| !v.is_null());

    match serde_json::from_value::<ContestEntry>(Value::Object(row.clone())) {
        Ok(entry) => Some(entry),
        Err(e) => {
            logw!("Contest entry {:?} unusable: {e}", row.get("filepath"));
            row.shift_remove("id");
            None
        }
    }
}

fn plain_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Crawl every due entry of the list, then write the list back.
///
/// A contest that fails (not saved, or a structural clash) has its fresh id
/// removed again so the next pass retries it.
pub fn run_list(
    crawler: &mut ContestCrawler,
    mut progress: Option<&mut dyn Progress>,
) -> Result<ListSummary, CrawlError> {
    let path = crawler.options().list_file();
    let mut rows = load_list(&path)?;
    logf!("Contest list {} ({} entries)", path.display(), rows.len());

    if let Some(p) = progress.as_deref_mut() {
        p.begin(rows.len());
        p.log(&format!("Contest list {} ({} entries)", path.display(), rows.len()));
    }

    let mut summary = ListSummary::default();
    for row in rows.iter_mut() {
        let Value::Object(map) = row else {
            summary.skipped += 1;
            if let Some(p) = progress.as_deref_mut() {
                p.item_skipped("not an object");
            }
            continue;
        };
        let Some(entry) = prepare_entry(map, Local::now()) else {
            summary.skipped += 1;
            if let Some(p) = progress.as_deref_mut() {
                p.item_skipped("already crawled or incomplete");
            }
            continue;
        };
        let id = entry.id.clone().unwrap_or_default();

        let failure = match crawler.crawl(&entry) {
            Ok(Some(report)) if report.saved => {
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(&id);
                }
                summary.reports.push(report);
                None
            }
            Ok(Some(report)) => {
                let reason = format!("could not write {}", report.json_path.display());
                summary.reports.push(report);
                Some(reason)
            }
            Ok(None) => Some(s!("entry rejected")),
            Err(e) => Some(e.to_string()),
        };

        if let Some(reason) = failure {
            loge!("{id}: {reason}");
            map.shift_remove("id");
            if let Some(p) = progress.as_deref_mut() {
                p.item_failed(&id, &reason);
            }
            summary.failed.push((id, reason));
        }
    }

    write_list(&path, &rows)?;
    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    Ok(summary)
}

pub fn write_list(path: &Path, rows: &[Value]) -> Result<(), CrawlError> {
    let text = render_list(rows).map_err(|source| CrawlError::ListJson { path: path.to_path_buf(), source })?;
    fs::write(path, text).map_err(|source| CrawlError::ListIo { path: path.to_path_buf(), source })
}

/// The list in its on-disk layout: 4-space indent, with arrays nested two
/// deep (a row's `category`) kept on one line as `[ "ICPC", "Korea" ]`.
pub fn render_list(rows: &[Value]) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, ListFormatter::default());
    rows.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(<serde_json::Error as serde::ser::Error>::custom)
}

/// Pretty printer that switches to single-line output inside any array
/// opened at array depth two or more.
#[derive(Default)]
struct ListFormatter {
    indent: usize,
    arrays: usize,
    /// Containers open inside the single-line region; 0 means pretty.
    inline: usize,
    has_value: bool,
}

const INLINE_FROM_DEPTH: usize = 2;

impl ListFormatter {
    fn newline<W: ?Sized + io::Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"\n")?;
        for _ in 0..self.indent {
            w.write_all(JSON_INDENT)?;
        }
        Ok(())
    }

    fn open<W: ?Sized + io::Write>(&mut self, w: &mut W, bracket: &[u8]) -> io::Result<()> {
        if self.inline > 0 {
            self.inline += 1;
        } else {
            self.indent += 1;
        }
        self.has_value = false;
        w.write_all(bracket)
    }

    fn close<W: ?Sized + io::Write>(&mut self, w: &mut W, bracket: &[u8]) -> io::Result<()> {
        if self.inline > 0 {
            self.inline -= 1;
            if self.has_value {
                w.write_all(b" ")?;
            }
        } else {
            self.indent -= 1;
            if self.has_value {
                self.newline(w)?;
            }
        }
        w.write_all(bracket)
    }

    fn separator<W: ?Sized + io::Write>(&self, w: &mut W, first: bool) -> io::Result<()> {
        if self.inline > 0 {
            let sep: &[u8] = if first { b" " } else { b", " };
            w.write_all(sep)
        } else {
            if !first {
                w.write_all(b",")?;
            }
            self.newline(w)
        }
    }
}

impl Formatter for ListFormatter {
    fn begin_array<W: ?Sized + io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        self.arrays += 1;
        if self.inline == 0 && self.arrays >= INLINE_FROM_DEPTH {
            self.inline = 1;
            self.has_value = false;
            return w.write_all(b"[");
        }
        self.open(w, b"[")
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        self.arrays -= 1;
        self.close(w, b"]")
    }

    fn begin_array_value<W: ?Sized + io::Write>(&mut self, w: &mut W, first: bool) -> io::Result<()> {
        self.separator(w, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, _w: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        self.open(w, b"{")
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        self.close(w, b"}")
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, w: &mut W, first: bool) -> io::Result<()> {
        self.separator(w, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        w.write_all(b": ")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, _w: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }
}
