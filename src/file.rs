// src/file.rs

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::config::consts::{CONTEST_FILE, PDF_SUBDIR};

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        ));
    }
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory(parent),
        _ => Ok(()),
    }
}

pub fn normalize_separators(p: &str) -> String {
    let sep = std::path::MAIN_SEPARATOR;
    p.chars().map(|c| if c == '/' || c == '\\' { sep } else { c }).collect()
}

/// A list `filepath` relative to the repository root: legacy `../` prefixes
/// and leading separators removed.
pub fn relative_filepath(filepath: &str) -> &str {
    filepath.trim_start_matches("../").trim_start_matches(['/', '\\'])
}

/// Directory holding one contest, from its list `filepath` (e.g. `problemlists/icpc/2020/`).
pub fn contest_dir(root: &Path, filepath: &str) -> PathBuf {
    root.join(normalize_separators(relative_filepath(filepath)))
}

pub fn contest_json_path(contest_dir: &Path) -> PathBuf {
    contest_dir.join(CONTEST_FILE)
}

pub fn pdf_dir(contest_dir: &Path) -> PathBuf {
    contest_dir.join(PDF_SUBDIR)
}
