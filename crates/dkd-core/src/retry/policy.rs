use std::time::{Duration, SystemTime};

/// High-level classification of a failed fetch for retry purposes.
///
/// Callers map HTTP status codes and curl errors into these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Server asked us to slow down (429).
    Throttled,
    /// Network-level failure (connection reset, DNS, etc.).
    Connection,
    /// Server-side failure (5xx).
    Http5xx(u16),
    /// Any other error (4xx, malformed request...). Never retried.
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry; the failure is fatal.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff with a bounded retry budget.
///
/// - 5xx and transport failures: up to `max_retries` retries.
/// - 429: exactly one retry, honoring an HTTP-date `Retry-After`.
/// - anything else: fatal.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Base delay for backoff.
    pub base_delay: Duration,
    /// Upper bound on backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Decide what to do after a failure, using the current wall clock for
    /// `Retry-After` dates.
    ///
    /// `previous_attempts` counts the retries already made for this request
    /// (0 after the first failure).
    pub fn decide(
        &self,
        previous_attempts: u32,
        kind: ErrorKind,
        retry_after: Option<&str>,
    ) -> RetryDecision {
        self.decide_at(previous_attempts, kind, retry_after, SystemTime::now())
    }

    /// Same as [`decide`](Self::decide) with an explicit `now`.
    pub fn decide_at(
        &self,
        previous_attempts: u32,
        kind: ErrorKind,
        retry_after: Option<&str>,
        now: SystemTime,
    ) -> RetryDecision {
        match kind {
            ErrorKind::Other => RetryDecision::NoRetry,
            ErrorKind::Throttled => {
                if previous_attempts > 0 {
                    return RetryDecision::NoRetry;
                }
                let wait = retry_after
                    .and_then(|v| httpdate::parse_http_date(v.trim()).ok())
                    .map(|at| at.duration_since(now).unwrap_or(Duration::ZERO))
                    .unwrap_or_else(|| self.backoff(previous_attempts));
                RetryDecision::RetryAfter(wait)
            }
            ErrorKind::Timeout | ErrorKind::Connection | ErrorKind::Http5xx(_) => {
                if previous_attempts >= self.max_retries {
                    return RetryDecision::NoRetry;
                }
                RetryDecision::RetryAfter(self.backoff(previous_attempts))
            }
        }
    }

    /// base * 2^previous_attempts, capped.
    fn backoff(&self, previous_attempts: u32) -> Duration {
        let exp = 1u32 << previous_attempts.min(8);
        self.base_delay.saturating_mul(exp).min(self.max_delay)
    }
}
