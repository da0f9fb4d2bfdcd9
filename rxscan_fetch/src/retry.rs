use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Retry an async operation, sleeping `delays[i]` after the i-th failure.
///
/// # Arguments
/// * `operation` - The async operation to retry
/// * `delays` - Backoff schedule; its length is the number of retries
/// * `should_retry` - Errors for which this returns `false` are returned immediately
///
/// # Returns
/// The first success, or the last error once the schedule is exhausted
pub async fn retry_with_backoff<F, Fut, T, E, R>(
    mut operation: F,
    delays: &[Duration],
    should_retry: R,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    R: Fn(&E) -> bool,
{
    let attempts = delays.len() + 1;
    let mut schedule = delays.iter();
    let mut attempt = 0;

    loop {
        attempt += 1;
        let error = match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };

        let next_delay = if should_retry(&error) {
            schedule.next()
        } else {
            None
        };
        let Some(delay) = next_delay else {
            return Err(error);
        };

        warn!(
            "Request failed (attempt {attempt}/{attempts}): {error}. Retrying after {}ms...",
            delay.as_millis()
        );
        sleep(*delay).await;
    }
}
