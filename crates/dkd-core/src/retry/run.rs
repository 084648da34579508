//! Retry loop: run an async attempt until success or the policy says stop.

use std::future::Future;

use super::classify;
use super::error::FetchError;
use super::policy::{RetryDecision, RetryPolicy};

/// Runs `attempt` until it succeeds or the retry policy says to stop.
/// On retryable failure, sleeps on the tokio timer for the backoff duration
/// then tries again. Returns the last error when giving up.
pub async fn run_with_retry<T, F, Fut>(policy: &RetryPolicy, mut attempt: F) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut previous_attempts = 0u32;
    loop {
        match attempt().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify::classify(&e);
                match policy.decide(previous_attempts, kind, e.retry_after()) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(d) => {
                        tracing::debug!(
                            error = %e,
                            retry = previous_attempts + 1,
                            delay_ms = d.as_millis() as u64,
                            "retrying request"
                        );
                        tokio::time::sleep(d).await;
                        previous_attempts += 1;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        }
    }

    #[tokio::test]
    async fn gives_up_after_budget_on_server_errors() {
        let calls = AtomicU32::new(0);
        let res: Result<(), _> = run_with_retry(&fast_policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchError::http(500)) }
        })
        .await;
        assert!(matches!(res, Err(FetchError::Http { code: 500, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn fatal_status_is_not_retried() {
        let calls = AtomicU32::new(0);
        let res: Result<(), _> = run_with_retry(&fast_policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchError::http(404)) }
        })
        .await;
        assert!(res.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn succeeds_after_transient_failure() {
        let calls = AtomicU32::new(0);
        let res = run_with_retry(&fast_policy(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(FetchError::http(503))
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(res.unwrap(), 1);
    }

    #[tokio::test]
    async fn throttled_twice_fails_after_one_retry() {
        let calls = AtomicU32::new(0);
        let res: Result<(), _> = run_with_retry(&fast_policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchError::http(429)) }
        })
        .await;
        assert!(matches!(res, Err(FetchError::Http { code: 429, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
