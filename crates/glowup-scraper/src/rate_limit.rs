//! Retry with exponential back-off and jitter for collaborator calls.
//!
//! Transient failures (429, network errors, 5xx) are retried; everything else
//! propagates immediately. Each retry of a quota-charged call costs quota, so
//! callers keep `max_retries` small.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable:
/// - [`ScraperError::RateLimited`]: HTTP 429.
/// - [`ScraperError::Http`]: timeout, connect failure, or a 5xx surfaced by `reqwest`.
/// - [`ScraperError::UnexpectedStatus`] with a 5xx status.
///
/// Everything else (4xx, malformed bodies, API-level errors) is a hard stop.
pub(crate) fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } => true,
        ScraperError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ScraperError::UnexpectedStatus { .. } => err.is_server_error(),
        ScraperError::Deserialize { .. }
        | ScraperError::Api { .. }
        | ScraperError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Back-off schedule with `backoff_base_ms = 1_000`:
///
/// | Attempt | Sleep before next attempt     |
/// |---------|-------------------------------|
/// | 1       | 1 000 ms × 2⁰ ± 25 % jitter  |
/// | 2       | 1 000 ms × 2¹ ± 25 % jitter  |
/// | 3       | 1 000 ms × 2² ± 25 % jitter  |
///
/// Delay is capped at 60 s. A server-provided `Retry-After` wins when it is
/// longer than the computed delay.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
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
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let jittered = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                let delay_ms = match &err {
                    ScraperError::RateLimited {
                        retry_after_secs, ..
                    } => jittered.max(retry_after_secs.saturating_mul(1000).min(MAX_DELAY_MS)),
                    _ => jittered,
                };
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient collaborator error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
