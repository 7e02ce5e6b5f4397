//! The sync client: save / upsert / save-once / delete, existence checks,
//! downloads, paginated listing, availability, and startup reconciliation.

use std::path::Path;
use std::sync::Arc;

use satchel_core::namespace::{self, RECORD_TYPE};
use satchel_core::types::RecipientId;

use crate::error::{AvailabilityReason, SyncError, SyncResult};
use crate::retry::{Delay, Fetched, TokioDelay, drive};
use crate::store::{AccountStatus, Cursor, Projection, RecordStore, WriteOptions};

/// Client for synchronizing backup records with the remote store.
///
/// Every operation issues its own remote calls, each driven through the
/// outcome classifier with an independent retry budget. There is no
/// local cache of record existence; every "does X exist" question is a
/// fresh round trip, and the remote store is the sole arbiter of
/// consistency.
pub struct SyncClient {
    store: Arc<dyn RecordStore>,
    delay: Arc<dyn Delay>,
}

impl SyncClient {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            delay: Arc::new(TokioDelay),
        }
    }

    /// Build with an injected delay so tests can drive retries against a
    /// fake clock.
    pub fn with_delay(store: Arc<dyn RecordStore>, delay: Arc<dyn Delay>) -> Self {
        Self { store, delay }
    }

    // ----- write path -----

    /// Upload a record, overwriting any existing record of the same name.
    ///
    /// The write goes out as a non-atomic single-record batch registered
    /// as a long-lived background operation, so it survives process
    /// suspension. Returns the record name on success.
    pub async fn save(&self, name: &str, payload: &[u8]) -> SyncResult<String> {
        let options = WriteOptions::background();
        let saved = drive("save", self.delay.as_ref(), || {
            self.store.put_record(name, RECORD_TYPE, payload, options)
        })
        .await?;
        match saved {
            Fetched::Found(()) => {
                tracing::debug!(record = %name, bytes = payload.len(), "saved record");
                Ok(name.to_string())
            }
            // The store's own success signal contradicts the write.
            Fetched::Missing => Err(SyncError::InvalidResponse(format!(
                "record {name} reported missing during save"
            ))),
        }
    }

    /// Create or replace: checks existence first, then writes either way.
    ///
    /// The store offers no conditional-write primitive, so this is a full
    /// existence round trip followed by a plain save. The window between
    /// check and write is tolerated: upserted names are recipient
    /// exclusive.
    pub async fn upsert(&self, name: &str, payload: &[u8]) -> SyncResult<String> {
        if self.exists(name).await? {
            tracing::debug!(record = %name, "upsert replacing existing record");
        } else {
            tracing::debug!(record = %name, "upsert creating record");
        }
        self.save(name, payload).await
    }

    /// Create-only: if the record already exists, return its name without
    /// uploading and without invoking the producer.
    ///
    /// The producer is the deferred "what would we upload" computation;
    /// it runs at most once, only when no record exists. Yielding `None`
    /// is an export-preparation failure.
    pub async fn save_once<F>(&self, name: &str, producer: F) -> SyncResult<String>
    where
        F: FnOnce() -> Option<Vec<u8>> + Send,
    {
        if self.exists(name).await? {
            tracing::debug!(record = %name, "record already present, skipping upload");
            return Ok(name.to_string());
        }
        let Some(payload) = producer() else {
            return Err(SyncError::NothingToUpload);
        };
        self.save(name, &payload).await
    }

    /// Delete a batch of records. Names that are already absent count as
    /// deleted; an empty set is a no-op.
    pub async fn delete(&self, names: &[String]) -> SyncResult<()> {
        if names.is_empty() {
            return Ok(());
        }
        let deleted = drive("delete", self.delay.as_ref(), || {
            self.store.delete_records(names)
        })
        .await?;
        if matches!(deleted, Fetched::Missing) {
            tracing::debug!("delete target already absent");
        }
        tracing::debug!(count = names.len(), "deleted records");
        Ok(())
    }

    // ----- read path -----

    /// Check whether a record exists. Fetches metadata only, so no
    /// payload bytes are transferred.
    pub async fn exists(&self, name: &str) -> SyncResult<bool> {
        let fetched = drive("exists", self.delay.as_ref(), || {
            self.store.fetch_record(name, Projection::MetadataOnly)
        })
        .await?;
        Ok(matches!(fetched, Fetched::Found(_)))
    }

    /// Download a record's payload into memory.
    ///
    /// A record that fetches successfully but lacks its payload slot is
    /// an invalid response: the store's success signal is inconsistent
    /// with the data, and retrying cannot fix a contract mismatch.
    pub async fn download(&self, name: &str) -> SyncResult<Vec<u8>> {
        let fetched = drive("download", self.delay.as_ref(), || {
            self.store.fetch_record(name, Projection::Full)
        })
        .await?;
        match fetched {
            Fetched::Found(record) => record.payload.ok_or_else(|| {
                SyncError::InvalidResponse(format!("record {name} fetched without its payload"))
            }),
            Fetched::Missing => Err(SyncError::RecordMissing(name.to_string())),
        }
    }

    /// Download a record's payload straight to a destination file.
    pub async fn download_to(&self, name: &str, dest: &Path) -> SyncResult<()> {
        let payload = self.download(name).await?;
        tokio::fs::write(dest, payload).await?;
        tracing::debug!(record = %name, dest = %dest.display(), "downloaded record to file");
        Ok(())
    }

    /// List the names of all backup records, optionally scoped to one
    /// recipient.
    ///
    /// Pages through the store's cursor chain in page order. Each page
    /// request gets a fresh retry budget, shared across retries of that
    /// same page. Names that do not carry the recipient's prefix are
    /// skipped with a diagnostic.
    pub async fn list_all(&self, recipient: Option<&RecipientId>) -> SyncResult<Vec<String>> {
        let prefix = recipient.map(namespace::record_prefix);
        let mut names = Vec::new();
        let mut cursor: Option<Cursor> = None;
        loop {
            let page_cursor = cursor.clone();
            let fetched = drive("list", self.delay.as_ref(), || {
                self.store.query_page(RECORD_TYPE, page_cursor.clone())
            })
            .await?;
            let page = match fetched {
                Fetched::Found(page) => page,
                // The store does not know the record type; nothing to list.
                Fetched::Missing => break,
            };
            for name in page.names {
                match &prefix {
                    Some(p) if !name.starts_with(p.as_str()) => {
                        tracing::debug!(record = %name, "skipping record of another recipient");
                    }
                    _ => names.push(name),
                }
            }
            match page.cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        Ok(names)
    }

    /// Recipient ids that own a manifest record.
    ///
    /// Names without a valid recipient prefix are dropped with a
    /// diagnostic, not an error.
    pub async fn list_manifest_recipients(&self) -> SyncResult<Vec<RecipientId>> {
        let names = self.list_all(None).await?;
        let mut recipients = Vec::new();
        for name in names.into_iter().filter(|n| namespace::is_manifest(n)) {
            match namespace::recipient_id(&name) {
                Some(recipient) => recipients.push(recipient),
                None => {
                    tracing::debug!(record = %name, "manifest name without a recipient prefix");
                }
            }
        }
        Ok(recipients)
    }

    // ----- role-shaped operations -----

    /// Create or replace the recipient's single manifest record.
    pub async fn save_manifest(
        &self,
        recipient: &RecipientId,
        payload: &[u8],
    ) -> SyncResult<String> {
        self.upsert(&namespace::manifest_name(recipient), payload)
            .await
    }

    /// Create a persistent file record once; later calls with the same
    /// file id leave the existing record untouched.
    pub async fn save_persistent_file<F>(
        &self,
        recipient: &RecipientId,
        file_id: &str,
        producer: F,
    ) -> SyncResult<String>
    where
        F: FnOnce() -> Option<Vec<u8>> + Send,
    {
        self.save_once(
            &namespace::persistent_file_name(recipient, file_id),
            producer,
        )
        .await
    }

    /// Upload a freshly named ephemeral record for this export attempt.
    pub async fn save_ephemeral_file(
        &self,
        recipient: &RecipientId,
        payload: &[u8],
    ) -> SyncResult<String> {
        self.save(&namespace::ephemeral_file_name(recipient), payload)
            .await
    }

    /// Upload a freshly named diagnostic record.
    pub async fn save_test_record(
        &self,
        recipient: &RecipientId,
        payload: &[u8],
    ) -> SyncResult<String> {
        self.save(&namespace::test_record_name(recipient), payload)
            .await
    }

    /// Delete every record the recipient owns. Returns how many records
    /// were named in the delete.
    pub async fn delete_all_for(&self, recipient: &RecipientId) -> SyncResult<usize> {
        let names = self.list_all(Some(recipient)).await?;
        let count = names.len();
        self.delete(&names).await?;
        tracing::info!(recipient = %recipient, count, "deleted all records for recipient");
        Ok(count)
    }

    // ----- availability & reconciliation -----

    /// Check that the remote store can accept backups for this session.
    ///
    /// Account state is configuration, not a transient fault: each
    /// failure maps to a distinct reason and nothing is retried.
    pub async fn check_available(&self) -> SyncResult<()> {
        let status = match self.store.account_status().await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!("account status query failed: {e}");
                return Err(SyncError::Unavailable(AvailabilityReason::Unreachable));
            }
        };
        match status {
            AccountStatus::Available => Ok(()),
            AccountStatus::CouldNotDetermine => Err(SyncError::Unavailable(
                AvailabilityReason::CouldNotDetermine,
            )),
            AccountStatus::NoAccount => Err(SyncError::Unavailable(AvailabilityReason::NoAccount)),
            AccountStatus::Restricted => {
                Err(SyncError::Unavailable(AvailabilityReason::Restricted))
            }
        }
    }

    /// Cancel long-lived operations left registered by a previous process
    /// instance, e.g. after a crash or forced termination.
    ///
    /// Best-effort hygiene: failures to enumerate or cancel are logged
    /// and swallowed. Returns the number of operations cancelled.
    pub async fn reconcile_startup(&self) -> usize {
        let pending = match self.store.pending_operations().await {
            Ok(ops) => ops,
            Err(e) => {
                tracing::warn!("could not enumerate pending operations: {e}");
                return 0;
            }
        };
        let mut cancelled = 0;
        for id in pending {
            match self.store.cancel_operation(&id).await {
                Ok(()) => {
                    tracing::info!(operation = %id, "cancelled stale operation");
                    cancelled += 1;
                }
                Err(e) => {
                    tracing::warn!(operation = %id, "could not cancel stale operation: {e}");
                }
            }
        }
        cancelled
    }
}
