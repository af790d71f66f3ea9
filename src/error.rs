// src/error.rs
//! Typed errors for the acquisition pipeline.
//!
//! The library surfaces `thiserror` enums so callers can tell recoverable
//! per-unit failures apart from the ones that end a run. The binary and
//! the store layer wrap these in `anyhow` at the edges.

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by a browser session or one of its tabs.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    /// The session is gone (browser crashed, connection dropped, closed).
    #[error("browser session unavailable: {0}")]
    SessionUnavailable(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("{what} timed out after {secs}s for {url}")]
    Timeout {
        what: &'static str,
        url: String,
        secs: u64,
    },

    #[error("selector `{selector}` never appeared on {url}")]
    SelectorMissing { selector: String, url: String },

    #[error("failed to read page content: {0}")]
    Content(String),

    #[error("failed to close browser resource: {0}")]
    Close(String),
}

impl BrowserError {
    /// Whether this failure means the whole session is unusable, as opposed
    /// to one navigation or one tab going wrong.
    pub fn is_session_fatal(&self) -> bool {
        matches!(
            self,
            BrowserError::Launch(_) | BrowserError::SessionUnavailable(_)
        )
    }
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("could not acquire browser session: {0}")]
    SessionAcquisition(#[source] BrowserError),

    #[error("invalid CSS selector `{0}`")]
    InvalidSelector(String),

    #[error("listing #{index} could not be parsed: {reason}")]
    ListingParse { index: usize, reason: String },

    /// A per-page dataset expected by the merge step does not exist.
    #[error("page {page} dataset is missing: {}", path.display())]
    MissingPage { path: PathBuf, page: u32 },

    #[error("invalid page range {start}..={end}")]
    InvalidPageRange { start: u32, end: u32 },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store error: {0}")]
    Store(String),
}

impl ScrapeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScrapeError::Io {
            path: path.into(),
            source,
        }
    }

    /// Fatal errors end the run; everything else is absorbed at the
    /// listing, task or page level.
    pub fn is_fatal(&self) -> bool {
        match self {
            ScrapeError::SessionAcquisition(_) | ScrapeError::MissingPage { .. } => true,
            ScrapeError::Browser(e) => e.is_session_fatal(),
            _ => false,
        }
    }
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
