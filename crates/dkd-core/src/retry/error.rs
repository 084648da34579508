//! Single-attempt fetch error used for retry classification.

use std::fmt;

/// Error returned by one GET attempt (curl failure or non-2xx status).
/// Kept separate from `DownloadError` so the retry loop can classify it
/// before the URL context is attached.
#[derive(Debug)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, etc.).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status. `retry_after` is the raw value of
    /// the `Retry-After` header, if the server sent one.
    Http {
        code: u32,
        retry_after: Option<String>,
    },
}

impl FetchError {
    pub fn http(code: u32) -> Self {
        FetchError::Http {
            code,
            retry_after: None,
        }
    }

    pub fn retry_after(&self) -> Option<&str> {
        match self {
            FetchError::Http { retry_after, .. } => retry_after.as_deref(),
            FetchError::Curl(_) => None,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Curl(e) => write!(f, "{}", e),
            FetchError::Http { code, .. } => write!(f, "HTTP {}", code),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Curl(e) => Some(e),
            FetchError::Http { .. } => None,
        }
    }
}
