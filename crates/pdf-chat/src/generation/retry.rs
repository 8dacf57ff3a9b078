//! Retry with exponential backoff for provider HTTP calls

use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::error::{Error, Result};

/// Outcome of a single request attempt
pub(crate) enum Attempt<T> {
    Success(T),
    /// Network failure, 429 or 5xx; worth another try
    Transient(Error),
    /// Anything a retry cannot fix
    Fatal(Error),
}

impl<T> Attempt<T> {
    /// Classify a non-success HTTP status
    pub(crate) fn from_status(status: StatusCode, error: Error) -> Self {
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            Attempt::Transient(error)
        } else {
            Attempt::Fatal(error)
        }
    }
}

/// Delay before retry number `attempt` (0-based): 1s, 2s, 4s, ...
fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(2u64.pow(attempt.min(5)))
}

/// Run `operation` until it succeeds, fails fatally, or `max_retries`
/// retries are spent
pub(crate) async fn retry_request<F, Fut, T>(max_retries: u32, what: &str, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Attempt<T>>,
{
    let mut last_error = None;

    for attempt in 0..=max_retries {
        match operation().await {
            Attempt::Success(result) => return Ok(result),
            Attempt::Fatal(e) => return Err(e),
            Attempt::Transient(e) => {
                if attempt < max_retries {
                    let delay = backoff(attempt);
                    tracing::warn!(
                        "{} failed (attempt {}/{}): {}; retrying in {:?}",
                        what,
                        attempt + 1,
                        max_retries + 1,
                        e,
                        delay
                    );
                    sleep(delay).await;
                }
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| Error::internal(format!("{} failed", what))))
}
