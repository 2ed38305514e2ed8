// src/specs/pdf.rs
//! PDF downloads.
//!
//! `download` trusts the link and writes whatever a successful response carries.
//! `fetch_if_pdf` is for links that may point at an HTML landing page: the HEAD
//! content type must mention `pdf` and the body must start with `%PDF-` before
//! anything touches the disk.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::core::HttpClient;
use crate::error::FetchError;
use crate::file::ensure_parent;

use super::PdfLink;

pub const PDF_MAGIC: &[u8] = b"%PDF-";

pub fn is_pdf_signature(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Save `url` as `dir/filename` if it really is a PDF. Failures are logged.
pub fn fetch_if_pdf(http: &HttpClient, url: &str, filename: &str, dir: &Path) -> bool {
    match try_fetch_if_pdf(http, url, &dir.join(filename)) {
        Ok(true) => {
            logf!("Downloaded: {filename}");
            true
        }
        Ok(false) => {
            logw!("URL {url} is not a downloadable PDF");
            false
        }
        Err(e) => {
            logw!("Failed to fetch {url}: {e}");
            false
        }
    }
}

fn try_fetch_if_pdf(http: &HttpClient, url: &str, path: &Path) -> Result<bool, FetchError> {
    let content_type = http.head_content_type(url)?;
    if !content_type.contains("pdf") {
        return Ok(false);
    }

    let mut resp = http.open(url)?;
    let mut head = [0u8; PDF_MAGIC.len()];
    let n = read_prefix(&mut resp, &mut head)
        .map_err(|source| FetchError::Io { path: path.to_path_buf(), source })?;
    if !is_pdf_signature(&head[..n]) {
        return Ok(false);
    }

    write_stream(path, &head[..n], &mut resp)?;
    Ok(true)
}

/// Save `url` as `dir/filename` after a successful status.
pub fn download(http: &HttpClient, url: &str, filename: &str, dir: &Path) -> Result<PathBuf, FetchError> {
    let mut resp = http.open(url)?;
    let path = dir.join(filename);
    write_stream(&path, &[], &mut resp)?;
    Ok(path)
}

/// Download each link, keeping the ones that made it to disk.
pub fn download_all(http: &HttpClient, links: Vec<PdfLink>, dir: &Path) -> Vec<PdfLink> {
    links
        .into_iter()
        .filter(|link| match download(http, &link.url, &link.filename, dir) {
            Ok(_) => {
                logf!("Downloaded: {}", link.filename);
                true
            }
            Err(e) => {
                logw!("Failed to download {}: {e}", link.url);
                false
            }
        })
        .collect()
}

/// Fill `buf` as far as the stream allows. Short only at end of stream.
pub(crate) fn read_prefix(src: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match src.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Write `prefix` then the rest of `body` to `path`, creating directories.
pub(crate) fn write_stream(path: &Path, prefix: &[u8], body: &mut impl Read) -> Result<u64, FetchError> {
    let io_err = |source| FetchError::Io { path: path.to_path_buf(), source };
    ensure_parent(path).map_err(io_err)?;
    let mut file = File::create(path).map_err(io_err)?;
    file.write_all(prefix).map_err(io_err)?;
    let copied = io::copy(body, &mut file).map_err(io_err)?;
    Ok(prefix.len() as u64 + copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn signature() {
        assert!(is_pdf_signature(b"%PDF-1.7\n..."));
        assert!(is_pdf_signature(b"%PDF-"));
        assert!(!is_pdf_signature(b"%PDF"));
        assert!(!is_pdf_signature(b"<!DOCTYPE html>"));
        assert!(!is_pdf_signature(b""));
    }

    #[test]
    fn prefix_stops_at_eof() {
        let mut short = Cursor::new(b"%PD".to_vec());
        let mut buf = [0u8; 5];
        assert_eq!(read_prefix(&mut short, &mut buf).unwrap(), 3);

        let mut long = Cursor::new(b"%PDF-1.4 body".to_vec());
        assert_eq!(read_prefix(&mut long, &mut buf).unwrap(), 5);
        assert!(is_pdf_signature(&buf));
    }

    #[test]
    fn write_stream_creates_dirs_and_keeps_prefix() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("crawled-data").join("statements.pdf");
        let mut rest = Cursor::new(b"1.5 rest".to_vec());

        let n = write_stream(&path, b"%PDF-", &mut rest).unwrap();
        assert_eq!(n, 13);
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.5 rest");
    }
}
