//! Connection trait for the remote record store.

use async_trait::async_trait;

use crate::error::RemoteResult;

/// Field projection for a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Metadata only; the payload is not transferred.
    MetadataOnly,
    /// All fields, including the payload.
    Full,
}

/// How a write is issued to the store.
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// Apply the containing batch atomically.
    pub atomic: bool,
    /// Register the write as a long-lived background operation so it
    /// survives process suspension.
    pub long_lived: bool,
}

impl WriteOptions {
    /// The sync client's write shape: a non-atomic single-record batch
    /// running as a long-lived background operation.
    pub fn background() -> Self {
        Self {
            atomic: false,
            long_lived: true,
        }
    }
}

/// A record fetched from the remote store.
#[derive(Debug, Clone)]
pub struct RemoteRecord {
    pub name: String,
    /// The single payload slot. `None` on metadata-only fetches, or on a
    /// record that was somehow written without one.
    pub payload: Option<Vec<u8>>,
}

/// Opaque continuation token for resuming a paginated query.
///
/// Backend-specific; never parsed or modified by the client. `None` in a
/// [`RecordPage`] means the listing is complete.
#[derive(Clone, PartialEq, Eq)]
pub struct Cursor(Vec<u8>);

impl Cursor {
    pub fn new(data: Vec<u8>) -> Self {
        Self(data)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Cursor").field(&"<opaque>").finish()
    }
}

/// One page of a type-scoped query.
#[derive(Debug, Clone)]
pub struct RecordPage {
    /// Record names in the store's page order.
    pub names: Vec<String>,
    /// Token for the next page; `None` on the last page.
    pub cursor: Option<Cursor>,
}

/// Account/session state of the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Available,
    CouldNotDetermine,
    NoAccount,
    Restricted,
}

/// Connection to the remote record store.
///
/// The store offers single-record create-or-replace, batch delete, fetch
/// with field projection, cursor-paginated queries by record type, an
/// account status query, and enumeration/cancellation of long-lived
/// operations. It offers no multi-record transactions; the sync client
/// layers its consistency story on top of these primitives.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create or replace a single record.
    async fn put_record(
        &self,
        name: &str,
        record_type: &str,
        payload: &[u8],
        options: WriteOptions,
    ) -> RemoteResult<()>;

    /// Fetch one record by name. Absence is [`RemoteError::NotFound`].
    ///
    /// [`RemoteError::NotFound`]: crate::error::RemoteError::NotFound
    async fn fetch_record(&self, name: &str, projection: Projection) -> RemoteResult<RemoteRecord>;

    /// Delete a batch of records by name.
    async fn delete_records(&self, names: &[String]) -> RemoteResult<()>;

    /// Fetch one page of names of records of `record_type`.
    async fn query_page(
        &self,
        record_type: &str,
        cursor: Option<Cursor>,
    ) -> RemoteResult<RecordPage>;

    /// Query the account/session status.
    async fn account_status(&self) -> RemoteResult<AccountStatus>;

    /// Ids of long-lived operations still registered with the store.
    async fn pending_operations(&self) -> RemoteResult<Vec<String>>;

    /// Cancel one long-lived operation.
    async fn cancel_operation(&self, id: &str) -> RemoteResult<()>;
}
