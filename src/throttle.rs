// Rate-limit aware wrapper for XML-RPC calls

use crate::error::IndexError;
use log::info;
use std::future::Future;
use std::time::Duration;

/// Added to every backoff so the retry lands after the server's reset.
const BACKOFF_EPSILON_SECS: f64 = 0.01;

/// Upper bound on a single backoff.
pub const MAX_BACKOFF: Duration = Duration::from_secs(24 * 60 * 60);

/// Sleep time before retrying after a rate-limit fault, capped at `MAX_BACKOFF`.
pub fn backoff(delay_hint: f64, throttling: f64) -> Duration {
    Duration::try_from_secs_f64(delay_hint * throttling + BACKOFF_EPSILON_SECS)
        .map(|d| d.min(MAX_BACKOFF))
        .unwrap_or(MAX_BACKOFF)
}

/// Run `call`, retrying it once after a backoff if the server answers with
/// a rate-limit fault. A second rate-limit fault and every other error are
/// returned as is.
pub async fn throttle_request<T, F, Fut>(throttling: f64, mut call: F) -> Result<T, IndexError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, IndexError>>,
{
    let mut retries_left = 1;

    loop {
        let err = match call().await {
            Ok(data) => return Ok(data),
            Err(err) => err,
        };

        match err.rate_limit_delay() {
            Some(delay) if retries_left > 0 => {
                info!(
                    "HTTPTooManyRequests - Perform next call to PyPI XML-RPC API in {}s.",
                    delay
                );
                tokio::time::sleep(backoff(delay, throttling)).await;
                retries_left -= 1;
            }
            _ => return Err(err),
        }
    }
}
