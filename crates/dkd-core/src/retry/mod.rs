//! Retry and backoff policy.
//!
//! Classifies failed fetches (HTTP status, transport errors) and decides
//! whether to try again and how long to wait, so the index fetch and the file
//! fetch share one policy. The policy itself does no I/O.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status, find_header};
pub use error::FetchError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
