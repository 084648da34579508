//! HTTP access for index documents and key files.
//!
//! Uses the curl crate (libcurl). Each attempt is a blocking transfer run on
//! the injected blocking-I/O runtime handle; the retry policy decides between
//! attempts and sleeps on the tokio timer.

mod get;

pub use get::RequestOptions;

use crate::error::DownloadError;
use crate::retry::{run_with_retry, FetchError, RetryPolicy};
use tokio::runtime::Handle;
use url::Url;

/// Async GET client with the retry policy baked in.
#[derive(Clone)]
pub struct HttpClient {
    policy: RetryPolicy,
    options: RequestOptions,
    io: Handle,
}

impl HttpClient {
    /// `io` is the runtime whose blocking pool runs the curl transfers.
    pub fn new(policy: RetryPolicy, options: RequestOptions, io: Handle) -> Self {
        Self {
            policy,
            options,
            io,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch an index document as text, bypassing caches.
    pub async fn get_text(&self, url: &Url) -> Result<String, DownloadError> {
        let body = self.get_with_retry(url, true).await?;
        String::from_utf8(body).map_err(|e| DownloadError::InvalidIndex {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// Fetch a binary payload.
    pub async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, DownloadError> {
        self.get_with_retry(url, false).await
    }

    async fn get_with_retry(&self, url: &Url, no_cache: bool) -> Result<Vec<u8>, DownloadError> {
        let res = run_with_retry(&self.policy, || {
            let url = url.to_string();
            let opts = self.options.clone();
            let task = self
                .io
                .spawn_blocking(move || get::get(&url, no_cache, &opts));
            async move {
                match task.await {
                    Ok(res) => res.map(Ok),
                    // A panicked transfer is not retried.
                    Err(join) => Ok(Err(join)),
                }
            }
        })
        .await;

        match res {
            Ok(Ok(body)) => {
                tracing::trace!(url = %url, bytes = body.len(), "GET ok");
                Ok(body)
            }
            Ok(Err(join)) => Err(DownloadError::Task(join)),
            Err(FetchError::Http { code, .. }) => Err(DownloadError::Http {
                url: url.to_string(),
                status: code,
            }),
            Err(FetchError::Curl(source)) => Err(DownloadError::Transport {
                url: url.to_string(),
                source,
            }),
        }
    }
}
