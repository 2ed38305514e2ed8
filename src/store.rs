// src/store.rs
//! Nested record store: one contest document held in memory, addressed by key paths.
//!
//! Writes are soft merges. A blank value never touches the document, an equal
//! value is a success, and a differing value is reported (`Ok(false)`), logged and
//! recorded as a [`Conflict`]. Whether the new value replaces the old one is the
//! caller's `overwrite` choice. Only structural problems (walking through a
//! scalar, an empty path) are errors.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::map::Entry;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};

use crate::config::consts::{JSON_INDENT, PROBLEMS_KEY};
use crate::error::StoreError;
use crate::file::ensure_parent;

/// Two sources disagreed on a value.
#[derive(Clone, Debug, PartialEq)]
pub struct Conflict {
    /// Dotted path, e.g. `problems.2.title`.
    pub path: String,
    pub old: Value,
    pub new: Value,
    /// `true` when `new` replaced `old`.
    pub overwrite: bool,
}

enum Leaf {
    Written,
    Unchanged,
    Differs { old: Value, new: Value },
}

#[derive(Clone, Debug, Default)]
pub struct ContestStore {
    data: Map<String, Value>,
    conflicts: Vec<Conflict>,
}

impl ContestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path` when it exists, otherwise start empty.
    pub fn open(path: &Path) -> Self {
        let mut store = Self::new();
        if path.exists() {
            store.load(path);
        }
        store
    }

    // ---- persistence ----

    pub fn try_load(&mut self, path: &Path) -> Result<(), StoreError> {
        let text = fs::read_to_string(path)
            .map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
        let value: Value = serde_json::from_str(&text)
            .map_err(|source| StoreError::Json { path: path.to_path_buf(), source })?;
        match value {
            Value::Object(map) => {
                self.data = map;
                self.conflicts.clear();
                Ok(())
            }
            _ => Err(StoreError::NotAnObject { path: path.to_path_buf() }),
        }
    }

    /// Replace the document with the contents of `path`.
    /// On any failure the error is logged and the document is left as it was.
    pub fn load(&mut self, path: &Path) -> bool {
        match self.try_load(path) {
            Ok(()) => {
                logd!("Loaded {}", path.display());
                true
            }
            Err(e) => {
                loge!("Error loading JSON: {e}");
                false
            }
        }
    }

    pub fn try_save(&self, path: &Path) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io { path: path.to_path_buf(), source };
        ensure_parent(path).map_err(io_err)?;
        let text = self.to_pretty()?;
        fs::write(path, text).map_err(io_err)
    }

    /// Write the document to `path`, creating missing directories.
    pub fn save(&self, path: &Path) -> bool {
        match self.try_save(path) {
            Ok(()) => {
                logd!("Saved {}", path.display());
                true
            }
            Err(e) => {
                loge!("Error saving JSON: {e}");
                false
            }
        }
    }

    // ---- whole document ----

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.conflicts.clear();
    }

    pub fn document(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Disagreements seen since the last load or clear, oldest first.
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn to_pretty(&self) -> Result<String, StoreError> {
        render(&self.data).map_err(StoreError::Render)
    }

    // ---- reads ----

    /// Value at `path`. Array segments are decimal indices.
    /// `None` when a segment is missing, a scalar is walked into, or the path is empty.
    /// The whole document is [`document`](Self::document), not `get_nested(&[])`.
    pub fn get_nested(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        walk(self.data.get(*first)?, rest)
    }

    pub fn get_nested_or(&self, path: &[&str], default: Value) -> Value {
        self.get_nested(path).cloned().unwrap_or(default)
    }

    // ---- writes ----

    /// Soft-merge `value` at `path`, creating intermediate objects.
    ///
    /// Returns `Ok(true)` when the slot was empty, already equal, or `value` is
    /// blank (null, `""`, `[]`, `{}`; nothing is written). Returns `Ok(false)` on
    /// a disagreement, replacing the old value only when `overwrite` is set.
    pub fn update_nested(
        &mut self,
        path: &[&str],
        value: impl Into<Value>,
        overwrite: bool,
    ) -> Result<bool, StoreError> {
        let value = value.into();
        if is_blank(&value) {
            return Ok(true);
        }
        let (last, parents) = path.split_last().ok_or(StoreError::EmptyPath)?;

        let mut trail = String::new();
        let slot = descend(&mut self.data, parents, &mut trail)?;
        push_segment(&mut trail, last);
        let leaf = put_leaf(slot, last, value, overwrite);
        Ok(self.settle(trail, leaf, overwrite))
    }

    /// [`update_nested`](Self::update_nested) inside `problems[index]`,
    /// growing the list with empty records as needed.
    pub fn update_problem(
        &mut self,
        index: usize,
        path: &[&str],
        value: impl Into<Value>,
        overwrite: bool,
    ) -> Result<bool, StoreError> {
        let value = value.into();
        if is_blank(&value) {
            return Ok(true);
        }
        let (last, parents) = path.split_last().ok_or(StoreError::EmptyPath)?;

        let mut trail = format!("{PROBLEMS_KEY}.{index}");
        let problem = self.problem_slot(index)?;
        let slot = descend(problem, parents, &mut trail)?;
        push_segment(&mut trail, last);
        let leaf = put_leaf(slot, last, value, overwrite);
        Ok(self.settle(trail, leaf, overwrite))
    }

    // ---- problem list ----

    /// Append a record and return its index.
    pub fn add_problem(&mut self, record: impl Into<Value>) -> Result<usize, StoreError> {
        let list = self.problems_mut()?;
        list.push(record.into());
        Ok(list.len() - 1)
    }

    /// Replace `problems[index]` wholesale, growing the list as needed.
    pub fn set_problem(&mut self, index: usize, record: impl Into<Value>) -> Result<bool, StoreError> {
        let list = self.problems_mut()?;
        grow(list, index);
        list[index] = record.into();
        Ok(true)
    }

    pub fn get_problem(&self, index: usize) -> Option<&Value> {
        self.data.get(PROBLEMS_KEY)?.as_array()?.get(index)
    }

    pub fn problem_count(&self) -> usize {
        self.data
            .get(PROBLEMS_KEY)
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// Indices of problems with nothing (or a blank value) at `path`.
    pub fn problems_missing(&self, path: &[&str]) -> Vec<usize> {
        let Some(list) = self.data.get(PROBLEMS_KEY).and_then(Value::as_array) else {
            return Vec::new();
        };
        list.iter()
            .enumerate()
            .filter(|(_, p)| walk(p, path).is_none_or(is_blank))
            .map(|(i, _)| i)
            .collect()
    }

    fn problems_mut(&mut self) -> Result<&mut Vec<Value>, StoreError> {
        match self.data.entry(PROBLEMS_KEY).or_insert_with(|| Value::Array(Vec::new())) {
            Value::Array(list) => Ok(list),
            _ => Err(StoreError::PathConflict { path: s!(PROBLEMS_KEY) }),
        }
    }

    fn problem_slot(&mut self, index: usize) -> Result<&mut Map<String, Value>, StoreError> {
        let list = self.problems_mut()?;
        grow(list, index);
        match &mut list[index] {
            Value::Object(problem) => Ok(problem),
            _ => Err(StoreError::PathConflict { path: format!("{PROBLEMS_KEY}.{index}") }),
        }
    }

    fn settle(&mut self, path: String, leaf: Leaf, overwrite: bool) -> bool {
        match leaf {
            Leaf::Written | Leaf::Unchanged => true,
            Leaf::Differs { old, new } => {
                logw!("Update {path} to different data, old: {old}, new: {new}, overwrite: {overwrite}");
                self.conflicts.push(Conflict { path, old, new, overwrite });
                false
            }
        }
    }
}

impl From<Map<String, Value>> for ContestStore {
    fn from(data: Map<String, Value>) -> Self {
        Self { data, conflicts: Vec::new() }
    }
}

impl fmt::Display for ContestStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_pretty().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// Null, empty string, empty array or empty object.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Pretty JSON in the on-disk format: 4-space indent, UTF-8 written as is.
pub fn render<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(JSON_INDENT));
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(<serde_json::Error as serde::ser::Error>::custom)
}

fn walk<'a>(mut cur: &'a Value, path: &[&str]) -> Option<&'a Value> {
    for seg in path {
        cur = match cur {
            Value::Object(map) => map.get(*seg)?,
            Value::Array(list) => list.get(seg.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(cur)
}

fn descend<'a>(
    root: &'a mut Map<String, Value>,
    parents: &[&str],
    trail: &mut String,
) -> Result<&'a mut Map<String, Value>, StoreError> {
    let mut cur = root;
    for key in parents {
        push_segment(trail, key);
        cur = match cur.entry(*key).or_insert_with(|| Value::Object(Map::new())) {
            Value::Object(map) => map,
            _ => return Err(StoreError::PathConflict { path: trail.clone() }),
        };
    }
    Ok(cur)
}

fn put_leaf(slot: &mut Map<String, Value>, key: &str, value: Value, overwrite: bool) -> Leaf {
    match slot.entry(key) {
        Entry::Vacant(v) => {
            v.insert(value);
            Leaf::Written
        }
        Entry::Occupied(o) if *o.get() == value => Leaf::Unchanged,
        Entry::Occupied(mut o) => {
            if overwrite {
                let old = o.insert(value.clone());
                Leaf::Differs { old, new: value }
            } else {
                Leaf::Differs { old: o.get().clone(), new: value }
            }
        }
    }
}

fn grow(list: &mut Vec<Value>, index: usize) {
    if list.len() <= index {
        list.resize_with(index + 1, || Value::Object(Map::new()));
    }
}

fn push_segment(trail: &mut String, seg: &str) {
    if !trail.is_empty() {
        trail.push('.');
    }
    trail.push_str(seg);
}
