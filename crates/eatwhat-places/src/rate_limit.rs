//! Retry with exponential backoff and jitter for provider requests.
//!
//! Only transient conditions are retried: HTTP 429, `OVER_QUERY_LIMIT`,
//! network failures and 5xx responses. Request errors (`REQUEST_DENIED`,
//! `INVALID_REQUEST`), parse failures and missing places are returned at once.

use std::future::Future;
use std::time::Duration;

use crate::error::PlacesError;

const MAX_DELAY_MS: u64 = 60_000;

fn is_retriable(err: &PlacesError) -> bool {
    match err {
        PlacesError::RateLimited { .. } => true,
        PlacesError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        PlacesError::UnexpectedStatus { status, .. } => *status >= 500,
        PlacesError::Deserialize { .. }
        | PlacesError::Upstream { .. }
        | PlacesError::NotFound { .. }
        | PlacesError::Normalization { .. }
        | PlacesError::InvalidBaseUrl { .. }
        | PlacesError::GeolocationTimeout { .. }
        | PlacesError::GeolocationUnavailable(_) => false,
    }
}

/// Delay before retry number `attempt` (1-based): `base * 2^(attempt-1)`,
/// capped at 60 s, scaled by a random factor in `0.75..1.25`.
fn backoff_delay(backoff_base_ms: u64, attempt: u32) -> Duration {
    let computed = backoff_base_ms.saturating_mul(1u64 << attempt.saturating_sub(1).min(10));
    let capped = computed.min(MAX_DELAY_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
    Duration::from_millis(jittered)
}

/// Runs `operation`, retrying transient failures up to `max_retries` more
/// times. The last error is returned once retries are exhausted.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, PlacesError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PlacesError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay = backoff_delay(backoff_base_ms, attempt);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "transient places error, retrying after backoff"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn over_query_limit() -> PlacesError {
        PlacesError::RateLimited {
            endpoint: "nearbysearch".to_owned(),
            retry_after_secs: 0,
        }
    }

    async fn count_calls<F>(max_retries: u32, make_err: F) -> (u32, Result<u32, PlacesError>)
    where
        F: Fn(u32) -> Option<PlacesError>,
    {
        let calls = Arc::new(AtomicU32::new(0));
        let result = retry_with_backoff(max_retries, 0, || {
            let calls = Arc::clone(&calls);
            let outcome = make_err(calls.fetch_add(1, Ordering::SeqCst));
            async move {
                match outcome {
                    Some(err) => Err(err),
                    None => Ok(7),
                }
            }
        })
        .await;
        (calls.load(Ordering::SeqCst), result)
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let (calls, result) = count_calls(3, |_| None).await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn retries_rate_limit_then_succeeds() {
        let (calls, result) = count_calls(3, |n| (n < 2).then(over_query_limit)).await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let (calls, result) = count_calls(2, |_| Some(over_query_limit())).await;
        assert_eq!(calls, 3);
        assert!(matches!(result, Err(PlacesError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn request_denied_is_not_retried() {
        let (calls, result) = count_calls(3, |_| {
            Some(PlacesError::Upstream {
                endpoint: "textsearch".to_owned(),
                status: "REQUEST_DENIED".to_owned(),
                message: Some("The provided API key is invalid.".to_owned()),
            })
        })
        .await;
        assert_eq!(calls, 1);
        assert!(matches!(result, Err(PlacesError::Upstream { .. })));
    }

    #[tokio::test]
    async fn server_errors_are_retried_but_client_errors_are_not() {
        let (calls, _) = count_calls(1, |_| {
            Some(PlacesError::UnexpectedStatus {
                status: 503,
                endpoint: "details".to_owned(),
            })
        })
        .await;
        assert_eq!(calls, 2);

        let (calls, _) = count_calls(3, |_| {
            Some(PlacesError::UnexpectedStatus {
                status: 403,
                endpoint: "details".to_owned(),
            })
        })
        .await;
        assert_eq!(calls, 1);
    }

    #[test]
    fn backoff_grows_and_stays_within_jitter_bounds() {
        for attempt in 1..=4u32 {
            let nominal = 1_000u64 << (attempt - 1);
            let delay = u64::try_from(backoff_delay(1_000, attempt).as_millis()).unwrap();
            assert!(delay >= nominal * 3 / 4, "attempt {attempt}: {delay}");
            assert!(delay <= nominal * 5 / 4, "attempt {attempt}: {delay}");
        }
    }

    #[test]
    fn backoff_is_capped() {
        let delay = backoff_delay(1_000, 30);
        assert!(delay <= Duration::from_millis(MAX_DELAY_MS * 5 / 4));
    }
}
