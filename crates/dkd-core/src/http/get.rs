//! Blocking HTTP GET via libcurl.
//!
//! Runs in the current thread; callers in async code go through
//! `HttpClient`, which moves each transfer onto the blocking pool.

use crate::retry::{find_header, FetchError};
use std::str;
use std::time::Duration;

/// Per-request transport settings.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub connect_timeout: Duration,
    /// Hard per-request limit; the cycle deadline is enforced separately.
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(300),
            user_agent: format!("dkd/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Performs a single GET and returns the body of a 2xx response.
///
/// Follows redirects. With `no_cache`, asks every cache on the path for a
/// fresh copy. Non-2xx responses become `FetchError::Http` carrying the
/// `Retry-After` header, if any.
pub fn get(url: &str, no_cache: bool, opts: &RequestOptions) -> Result<Vec<u8>, FetchError> {
    let mut headers: Vec<String> = Vec::new();
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(FetchError::Curl)?;
    easy.get(true).map_err(FetchError::Curl)?;
    easy.follow_location(true).map_err(FetchError::Curl)?;
    easy.max_redirections(10).map_err(FetchError::Curl)?;
    easy.useragent(&opts.user_agent).map_err(FetchError::Curl)?;
    easy.connect_timeout(opts.connect_timeout)
        .map_err(FetchError::Curl)?;
    easy.timeout(opts.request_timeout).map_err(FetchError::Curl)?;

    if no_cache {
        let mut list = curl::easy::List::new();
        list.append("Cache-Control: no-cache")
            .map_err(FetchError::Curl)?;
        list.append("Pragma: no-cache").map_err(FetchError::Curl)?;
        easy.http_headers(list).map_err(FetchError::Curl)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })
            .map_err(FetchError::Curl)?;
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(FetchError::Curl)?;
        transfer.perform().map_err(FetchError::Curl)?;
    }

    let code = easy.response_code().map_err(FetchError::Curl)?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http {
            code,
            retry_after: find_header(&headers, "retry-after").map(str::to_string),
        });
    }

    Ok(body)
}
