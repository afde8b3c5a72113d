//! Retry with exponential back-off and jitter for the Places client.
//!
//! [`retry_with_backoff`] retries on transient failures: timeouts, connect
//! errors, 429/5xx responses, and the API's `OVER_QUERY_LIMIT` status.
//! Everything else is returned on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::PlacesError;

/// Upper bound on a single back-off sleep.
const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
pub(crate) fn is_retriable(err: &PlacesError) -> bool {
    match err {
        PlacesError::Http(e) => {
            e.is_timeout()
                || e.is_connect()
                || e.status().is_some_and(|s| {
                    s.is_server_error() || s == reqwest::StatusCode::TOO_MANY_REQUESTS
                })
        }
        PlacesError::Api { .. } => err.is_over_query_limit(),
        PlacesError::Deserialize { .. } | PlacesError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on
/// transient errors.
///
/// The n-th retry sleeps `backoff_base_ms * 2^(n-1)` (capped at 60 s)
/// scaled by a random factor in `[0.75, 1.25)`.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, PlacesError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PlacesError>>,
{
    let mut retries = 0u32;
    let mut result = operation().await;
    while let Err(err) = &result {
        if retries == max_retries || !is_retriable(err) {
            break;
        }
        retries += 1;
        let delay = backoff_delay(backoff_base_ms, retries);
        tracing::warn!(
            retry = retries,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "places request failed, backing off"
        );
        tokio::time::sleep(delay).await;
        result = operation().await;
    }
    result
}

/// Jittered delay before retry number `retry` (1-based).
fn backoff_delay(backoff_base_ms: u64, retry: u32) -> Duration {
    let exponent = retry.saturating_sub(1).min(10);
    let nominal = backoff_base_ms
        .saturating_mul(1 << exponent)
        .min(MAX_DELAY_MS);
    let jitter = rand::random::<f64>() * 0.5 + 0.75;
    Duration::from_millis(nominal).mul_f64(jitter)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn api_err(status: &str) -> PlacesError {
        PlacesError::Api {
            status: status.to_owned(),
            message: None,
        }
    }

    #[test]
    fn backoff_delay_doubles_within_jitter_and_caps() {
        for (retry, nominal) in [(1u32, 1_000u64), (2, 2_000), (3, 4_000), (20, MAX_DELAY_MS)] {
            let delay = backoff_delay(1_000, retry).as_millis();
            let nominal = u128::from(nominal);
            assert!(delay >= nominal * 3 / 4, "retry {retry}: {delay}ms");
            assert!(delay < nominal * 5 / 4, "retry {retry}: {delay}ms");
        }
        assert_eq!(backoff_delay(0, 3), Duration::ZERO);
    }

    #[test]
    fn over_query_limit_is_retriable() {
        assert!(is_retriable(&api_err("OVER_QUERY_LIMIT")));
    }

    #[test]
    fn request_denied_is_not_retriable() {
        assert!(!is_retriable(&api_err("REQUEST_DENIED")));
        assert!(!is_retriable(&api_err("INVALID_REQUEST")));
    }

    #[test]
    fn deserialize_error_is_not_retriable() {
        let source = serde_json::from_str::<()>("invalid").unwrap_err();
        assert!(!is_retriable(&PlacesError::Deserialize {
            context: "test".to_owned(),
            source,
        }));
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, PlacesError>(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_quota_status_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                let attempt = c.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    Err(api_err("OVER_QUERY_LIMIT"))
                } else {
                    Ok(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(2, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(api_err("OVER_QUERY_LIMIT"))
            }
        })
        .await;
        assert!(result.unwrap_err().is_over_query_limit());
        assert_eq!(calls.load(Ordering::SeqCst), 3, "1 attempt + 2 retries");
    }

    #[tokio::test]
    async fn does_not_retry_request_denied() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(api_err("REQUEST_DENIED"))
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(PlacesError::Api { .. })));
    }
}
