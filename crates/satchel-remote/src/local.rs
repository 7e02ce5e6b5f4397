//! Directory-backed record store for local testing and the CLI.
//!
//! Records live under `<root>/records/` as a payload file plus a JSON
//! metadata sidecar; long-lived writes leave a marker under
//! `<root>/ops/` for the duration of the write, so markers that survive
//! a crash show up as pending operations.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{RemoteError, RemoteResult};
use crate::store::{
    AccountStatus, Cursor, Projection, RecordPage, RecordStore, RemoteRecord, WriteOptions,
};

const META_SUFFIX: &str = ".meta.json";
const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Serialize, Deserialize)]
struct RecordMeta {
    record_type: String,
    created_at: chrono::DateTime<Utc>,
}

/// Pagination state: resume strictly after this name.
#[derive(Debug, Serialize, Deserialize)]
struct LocalCursor {
    after: String,
}

/// Filesystem-based record store.
pub struct LocalRecordStore {
    root: PathBuf,
    page_size: usize,
}

impl LocalRecordStore {
    pub fn open(root: &Path) -> RemoteResult<Self> {
        std::fs::create_dir_all(root.join("records"))?;
        std::fs::create_dir_all(root.join("ops"))?;
        Ok(Self {
            root: root.to_path_buf(),
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Override the query page size (tests use small pages).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn record_path(&self, name: &str) -> PathBuf {
        self.root.join("records").join(name)
    }

    fn meta_path(&self, name: &str) -> PathBuf {
        self.root.join("records").join(format!("{name}{META_SUFFIX}"))
    }

    fn ops_dir(&self) -> PathBuf {
        self.root.join("ops")
    }

    fn read_meta(&self, name: &str) -> RemoteResult<RecordMeta> {
        let raw = std::fs::read(self.meta_path(name))?;
        serde_json::from_slice(&raw)
            .map_err(|e| RemoteError::Service(format!("malformed record metadata: {e}")))
    }

    /// Sorted names of all records of `record_type`.
    fn sorted_names(&self, record_type: &str) -> RemoteResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(self.root.join("records"))? {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if file_name.ends_with(META_SUFFIX) {
                continue;
            }
            if self.read_meta(&file_name)?.record_type == record_type {
                names.push(file_name);
            }
        }
        names.sort();
        Ok(names)
    }
}

#[async_trait]
impl RecordStore for LocalRecordStore {
    async fn put_record(
        &self,
        name: &str,
        record_type: &str,
        payload: &[u8],
        options: WriteOptions,
    ) -> RemoteResult<()> {
        let marker = options
            .long_lived
            .then(|| self.ops_dir().join(uuid::Uuid::new_v4().to_string()));
        if let Some(marker) = &marker {
            std::fs::write(marker, name)?;
        }

        let meta = RecordMeta {
            record_type: record_type.to_string(),
            created_at: Utc::now(),
        };
        let meta_json = serde_json::to_vec(&meta)
            .map_err(|e| RemoteError::Service(format!("metadata encoding failed: {e}")))?;
        std::fs::write(self.record_path(name), payload)?;
        std::fs::write(self.meta_path(name), meta_json)?;

        // The write completed, so the operation is no longer in flight.
        if let Some(marker) = &marker {
            let _ = std::fs::remove_file(marker);
        }
        Ok(())
    }

    async fn fetch_record(&self, name: &str, projection: Projection) -> RemoteResult<RemoteRecord> {
        let path = self.record_path(name);
        if !path.exists() {
            return Err(RemoteError::NotFound);
        }
        let payload = match projection {
            Projection::MetadataOnly => None,
            Projection::Full => Some(std::fs::read(&path)?),
        };
        Ok(RemoteRecord {
            name: name.to_string(),
            payload,
        })
    }

    async fn delete_records(&self, names: &[String]) -> RemoteResult<()> {
        let mut missing = 0;
        for name in names {
            let path = self.record_path(name);
            if path.exists() {
                std::fs::remove_file(&path)?;
                let _ = std::fs::remove_file(self.meta_path(name));
            } else {
                missing += 1;
            }
        }
        // A batch naming only absent records reports NotFound, the way
        // the remote service does.
        if missing == names.len() && !names.is_empty() {
            return Err(RemoteError::NotFound);
        }
        Ok(())
    }

    async fn query_page(
        &self,
        record_type: &str,
        cursor: Option<Cursor>,
    ) -> RemoteResult<RecordPage> {
        let names = self.sorted_names(record_type)?;
        let start = match cursor {
            Some(cursor) => {
                let state: LocalCursor = serde_json::from_slice(cursor.as_bytes())
                    .map_err(|e| RemoteError::Service(format!("malformed cursor: {e}")))?;
                names.partition_point(|n| *n <= state.after)
            }
            None => 0,
        };
        let page: Vec<String> = names[start..]
            .iter()
            .take(self.page_size)
            .cloned()
            .collect();
        let cursor = if start + page.len() < names.len() {
            let state = LocalCursor {
                after: page.last().cloned().unwrap_or_default(),
            };
            let raw = serde_json::to_vec(&state)
                .map_err(|e| RemoteError::Service(format!("cursor encoding failed: {e}")))?;
            Some(Cursor::new(raw))
        } else {
            None
        };
        Ok(RecordPage {
            names: page,
            cursor,
        })
    }

    async fn account_status(&self) -> RemoteResult<AccountStatus> {
        Ok(AccountStatus::Available)
    }

    async fn pending_operations(&self) -> RemoteResult<Vec<String>> {
        let mut ops = Vec::new();
        for entry in std::fs::read_dir(self.ops_dir())? {
            ops.push(entry?.file_name().to_string_lossy().into_owned());
        }
        ops.sort();
        Ok(ops)
    }

    async fn cancel_operation(&self, id: &str) -> RemoteResult<()> {
        let path = self.ops_dir().join(id);
        if !path.exists() {
            return Err(RemoteError::NotFound);
        }
        std::fs::remove_file(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TYPE: &str = "backup";

    #[tokio::test]
    async fn put_fetch_delete_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let store = LocalRecordStore::open(tmp.path()).unwrap();

        let name = "+15551234567-manifest";
        store
            .put_record(name, TYPE, b"manifest bytes", WriteOptions::background())
            .await
            .unwrap();

        let record = store.fetch_record(name, Projection::Full).await.unwrap();
        assert_eq!(record.payload.as_deref(), Some(b"manifest bytes".as_ref()));

        store.delete_records(&[name.to_string()]).await.unwrap();
        assert!(matches!(
            store.fetch_record(name, Projection::Full).await,
            Err(RemoteError::NotFound)
        ));
    }

    #[tokio::test]
    async fn metadata_projection_carries_no_payload() {
        let tmp = TempDir::new().unwrap();
        let store = LocalRecordStore::open(tmp.path()).unwrap();

        store
            .put_record("+1-manifest", TYPE, b"data", WriteOptions::background())
            .await
            .unwrap();
        let record = store
            .fetch_record("+1-manifest", Projection::MetadataOnly)
            .await
            .unwrap();
        assert!(record.payload.is_none());
    }

    #[tokio::test]
    async fn deleting_only_absent_records_reports_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = LocalRecordStore::open(tmp.path()).unwrap();
        let result = store.delete_records(&["+1-ghost".to_string()]).await;
        assert!(matches!(result, Err(RemoteError::NotFound)));
    }

    #[tokio::test]
    async fn query_pages_in_sorted_order_with_cursor_chain() {
        let tmp = TempDir::new().unwrap();
        let store = LocalRecordStore::open(tmp.path()).unwrap().with_page_size(2);

        for i in 0..5 {
            store
                .put_record(
                    &format!("+1-persistentFile-{i}"),
                    TYPE,
                    b"x",
                    WriteOptions::background(),
                )
                .await
                .unwrap();
        }

        let mut all = Vec::new();
        let mut cursor = None;
        let mut pages = 0;
        loop {
            let page = store.query_page(TYPE, cursor).await.unwrap();
            pages += 1;
            all.extend(page.names);
            match page.cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        assert_eq!(pages, 3);
        assert_eq!(all.len(), 5);
        let mut sorted = all.clone();
        sorted.sort();
        assert_eq!(all, sorted);
    }

    #[tokio::test]
    async fn query_scopes_by_record_type() {
        let tmp = TempDir::new().unwrap();
        let store = LocalRecordStore::open(tmp.path()).unwrap();

        store
            .put_record("+1-manifest", TYPE, b"x", WriteOptions::background())
            .await
            .unwrap();
        store
            .put_record("note-1", "note", b"y", WriteOptions::background())
            .await
            .unwrap();

        let page = store.query_page(TYPE, None).await.unwrap();
        assert_eq!(page.names, vec!["+1-manifest".to_string()]);
    }

    #[tokio::test]
    async fn completed_writes_leave_no_pending_operations() {
        let tmp = TempDir::new().unwrap();
        let store = LocalRecordStore::open(tmp.path()).unwrap();
        store
            .put_record("+1-manifest", TYPE, b"x", WriteOptions::background())
            .await
            .unwrap();
        assert!(store.pending_operations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stale_operation_markers_can_be_cancelled() {
        let tmp = TempDir::new().unwrap();
        let store = LocalRecordStore::open(tmp.path()).unwrap();

        // A marker left behind by a crashed writer.
        std::fs::write(tmp.path().join("ops").join("op-stale"), "+1-manifest").unwrap();

        let pending = store.pending_operations().await.unwrap();
        assert_eq!(pending, vec!["op-stale".to_string()]);

        store.cancel_operation("op-stale").await.unwrap();
        assert!(store.pending_operations().await.unwrap().is_empty());
        assert!(matches!(
            store.cancel_operation("op-stale").await,
            Err(RemoteError::NotFound)
        ));
    }
}
