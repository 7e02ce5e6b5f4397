//! Classification of remote-call results into recovery actions.

use std::time::Duration;

use crate::error::RemoteError;

/// Retry attempts permitted per logical operation.
pub const MAX_RETRIES: u32 = 5;

/// Wait before a delayed retry when the service supplies no hint.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Recovery action for one remote-call result.
#[derive(Debug)]
pub enum Outcome {
    /// The call completed normally.
    Success,
    /// The target record does not exist. For fetch-style calls this is a
    /// valid result, not a failure.
    Absent,
    /// Terminal failure; the caller must not retry.
    Fatal(RemoteError),
    /// Transient failure; wait this long, spend one retry, reissue.
    RetryAfter(Duration),
    /// Transient failure; spend one retry and reissue immediately.
    RetryNow,
}

/// Classify the result of a remote call into a recovery action.
///
/// Precedence: absence wins over everything, even an exhausted budget,
/// since retrying cannot make a record exist. An exhausted budget then
/// promotes every transient kind to [`Outcome::Fatal`]. Network failures
/// and lost responses retry immediately; rate limiting, unavailability
/// and contention retry after the service-supplied delay (or
/// [`DEFAULT_RETRY_DELAY`]). Anything else is terminal.
pub fn classify(error: Option<RemoteError>, remaining: u32, label: &str) -> Outcome {
    let Some(error) = error else {
        return Outcome::Success;
    };
    if matches!(error, RemoteError::NotFound) {
        return Outcome::Absent;
    }
    if remaining == 0 {
        tracing::warn!("{label}: retries exhausted: {error}");
        return Outcome::Fatal(error);
    }
    match error {
        RemoteError::NetworkFailure(_) | RemoteError::ResponseLost => Outcome::RetryNow,
        RemoteError::RateLimited { retry_after }
        | RemoteError::ServiceUnavailable { retry_after }
        | RemoteError::Busy { retry_after } => {
            Outcome::RetryAfter(retry_after.unwrap_or(DEFAULT_RETRY_DELAY))
        }
        other => {
            tracing::warn!("{label}: unrecoverable failure: {other}");
            Outcome::Fatal(other)
        }
    }
}
