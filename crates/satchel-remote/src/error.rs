use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Errors in the remote store's own domain.
///
/// This is the closed set the outcome classifier branches over. Anything
/// that reaches the client as a different type is wrapped in [`Io`] and
/// treated as terminal, since its transience cannot be assessed.
///
/// [`Io`]: RemoteError::Io
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The target record does not exist.
    #[error("record not found")]
    NotFound,

    /// The service asked us to slow down.
    #[error("rate limited by the service")]
    RateLimited { retry_after: Option<Duration> },

    /// The service is temporarily unavailable.
    #[error("service unavailable")]
    ServiceUnavailable { retry_after: Option<Duration> },

    /// Resource contention on the service side.
    #[error("service busy")]
    Busy { retry_after: Option<Duration> },

    /// The request never reached the service.
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The request may have been applied but the response was lost.
    #[error("server response lost")]
    ResponseLost,

    /// A remote failure with no recovery path.
    #[error("remote service error: {0}")]
    Service(String),

    /// A local error from outside the remote error domain.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Why backups cannot run in this session.
///
/// Account state is configuration, not a transient fault; none of these
/// is ever retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityReason {
    /// The service could not determine the account state.
    CouldNotDetermine,
    /// No account is signed in on this device.
    NoAccount,
    /// The account exists but access to the store is restricted.
    Restricted,
    /// The status query itself failed.
    Unreachable,
}

impl fmt::Display for AvailabilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvailabilityReason::CouldNotDetermine => write!(f, "account state undetermined"),
            AvailabilityReason::NoAccount => write!(f, "no account"),
            AvailabilityReason::Restricted => write!(f, "account restricted"),
            AvailabilityReason::Unreachable => write!(f, "status query failed"),
        }
    }
}

/// Failures surfaced to callers of the sync client.
///
/// All retryable conditions are absorbed by the retry driver; only
/// terminal failures appear here.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Terminal remote failure: unclassified, or retries exhausted.
    #[error("remote store failure: {0}")]
    Remote(#[from] RemoteError),

    /// A record expected to exist was not found.
    #[error("record not found: {0}")]
    RecordMissing(String),

    /// The service reported success but the response contradicts it.
    #[error("invalid response from the service: {0}")]
    InvalidResponse(String),

    /// The caller's payload producer yielded nothing to upload.
    #[error("export preparation produced no data to upload")]
    NothingToUpload,

    /// Backups cannot run in this session.
    #[error("backups unavailable: {0}")]
    Unavailable(AvailabilityReason),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SyncResult<T> = std::result::Result<T, SyncError>;
