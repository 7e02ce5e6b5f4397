//! Explicit retry loop driving remote calls through the classifier.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::RemoteResult;
use crate::outcome::{self, MAX_RETRIES, Outcome};

/// Injected sleep, so the retry policy is testable without real timers.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production delay backed by the tokio timer.
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Result of a driven call whose target may legitimately not exist.
#[derive(Debug)]
pub enum Fetched<T> {
    Found(T),
    Missing,
}

/// Drive one logical remote operation to completion.
///
/// `attempt` is reissued until it succeeds, the target turns out to be
/// absent, the error is terminal, or the budget runs out. The remaining
/// budget is threaded as a local value rather than mutated in shared
/// state; every call to `drive` owns an independent budget of
/// [`MAX_RETRIES`].
pub async fn drive<T, F, Fut>(
    label: &str,
    delay: &dyn Delay,
    mut attempt: F,
) -> RemoteResult<Fetched<T>>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = RemoteResult<T>> + Send,
{
    let mut remaining = MAX_RETRIES;
    loop {
        let error = match attempt().await {
            Ok(value) => return Ok(Fetched::Found(value)),
            Err(e) => e,
        };
        match outcome::classify(Some(error), remaining, label) {
            Outcome::Absent => return Ok(Fetched::Missing),
            Outcome::Fatal(e) => return Err(e),
            Outcome::RetryAfter(wait) => {
                tracing::debug!("{label}: transient failure, retrying in {wait:?}");
                delay.sleep(wait).await;
                remaining -= 1;
            }
            Outcome::RetryNow => {
                tracing::debug!("{label}: transient failure, retrying immediately");
                remaining -= 1;
            }
            // classify(Some(_), ..) never yields Success.
            Outcome::Success => unreachable!(),
        }
    }
}
