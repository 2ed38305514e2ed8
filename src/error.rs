// src/error.rs
use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures of the nested record store.
///
/// `Io` and `Json` are caught at the store boundary by `load`/`save` and turned
/// into a logged `false`. `PathConflict` is the structural error that callers
/// are expected to escalate.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("document root in {} is not an object", path.display())]
    NotAnObject { path: PathBuf },

    #[error("could not render document: {0}")]
    Render(#[source] serde_json::Error),

    #[error("path conflict at `{path}`: existing value is not an object")]
    PathConflict { path: String },

    #[error("empty path")]
    EmptyPath,
}

/// Failures of a site collaborator or the PDF fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{url} returned unexpected content type {content_type:?}")]
    UnexpectedContentType { url: String, content_type: String },

    #[error("{url} requires a login")]
    LoginRequired { url: String },

    #[error("{site} login failed: {reason}")]
    LoginFailed { site: &'static str, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures of the orchestration layer.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("contest list {}: {source}", path.display())]
    ListIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("contest list {}: {source}", path.display())]
    ListJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("contest list {} is not a JSON array", path.display())]
    ListShape { path: PathBuf },
}
