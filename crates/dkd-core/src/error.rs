//! Error taxonomy for a download cycle.
//!
//! Anything that fails a fetch, a write or a cursor access surfaces as a
//! `DownloadError`; the cycle is all-or-nothing, so the first one ends it.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum DownloadError {
    /// Server answered with a fatal status, or kept failing past the retry budget.
    #[error("GET {url} returned HTTP {status}")]
    Http { url: String, status: u32 },

    /// libcurl could not complete the transfer.
    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Index document could not be read as text.
    #[error("invalid index at {url}: {reason}")]
    InvalidIndex { url: String, reason: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cursor store: {0}")]
    Cursor(#[source] BoxError),

    #[error("region resolver: {0}")]
    Region(#[source] BoxError),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The whole cycle exceeded its deadline.
    #[error("download cycle did not finish within {0:?}")]
    Timeout(Duration),
}

impl DownloadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn cursor(err: anyhow::Error) -> Self {
        Self::Cursor(err.into())
    }

    pub(crate) fn region(err: anyhow::Error) -> Self {
        Self::Region(err.into())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, DownloadError::Timeout(_))
    }

    /// HTTP status behind the failure, if the server produced one.
    pub fn http_status(&self) -> Option<u32> {
        match self {
            DownloadError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
