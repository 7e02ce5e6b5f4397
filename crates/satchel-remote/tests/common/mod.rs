//! Scripted in-memory record store for driving the sync client through
//! failure sequences without a network.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use satchel_remote::error::{RemoteError, RemoteResult};
use satchel_remote::retry::Delay;
use satchel_remote::store::{
    AccountStatus, Cursor, Projection, RecordPage, RecordStore, RemoteRecord, WriteOptions,
};

/// In-memory store whose operations fail with scripted errors before
/// falling back to plain map semantics. Each scripted error is consumed
/// by exactly one call, so a queue of two transient errors makes the
/// third attempt succeed.
pub struct MockRecordStore {
    pub records: Mutex<HashMap<String, Vec<u8>>>,

    pub put_errors: Mutex<VecDeque<RemoteError>>,
    pub fetch_errors: Mutex<VecDeque<RemoteError>>,
    pub delete_errors: Mutex<VecDeque<RemoteError>>,
    pub cancel_errors: Mutex<VecDeque<RemoteError>>,

    /// Scripted query results, drained front to back, so errors and
    /// pages interleave exactly as queued. When empty, a query answers
    /// with a single page of all record names.
    pub query_script: Mutex<VecDeque<RemoteResult<RecordPage>>>,
    /// Cursor bytes received by each query_page call.
    pub query_cursors: Mutex<Vec<Option<Vec<u8>>>>,

    pub status: Mutex<AccountStatus>,
    pub status_error: Mutex<Option<RemoteError>>,
    pub pending: Mutex<Vec<String>>,
    pub pending_error: Mutex<Option<RemoteError>>,
    pub cancelled: Mutex<Vec<String>>,

    /// When set, full fetches return records without their payload slot.
    pub strip_payloads: AtomicBool,
    pub last_write_options: Mutex<Option<WriteOptions>>,

    pub put_calls: AtomicU32,
    pub fetch_calls: AtomicU32,
    pub delete_calls: AtomicU32,
    pub query_calls: AtomicU32,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            put_errors: Mutex::new(VecDeque::new()),
            fetch_errors: Mutex::new(VecDeque::new()),
            delete_errors: Mutex::new(VecDeque::new()),
            cancel_errors: Mutex::new(VecDeque::new()),
            query_script: Mutex::new(VecDeque::new()),
            query_cursors: Mutex::new(Vec::new()),
            status: Mutex::new(AccountStatus::Available),
            status_error: Mutex::new(None),
            pending: Mutex::new(Vec::new()),
            pending_error: Mutex::new(None),
            cancelled: Mutex::new(Vec::new()),
            strip_payloads: AtomicBool::new(false),
            last_write_options: Mutex::new(None),
            put_calls: AtomicU32::new(0),
            fetch_calls: AtomicU32::new(0),
            delete_calls: AtomicU32::new(0),
            query_calls: AtomicU32::new(0),
        }
    }

    pub fn insert(&self, name: &str, payload: &[u8]) {
        self.records
            .lock()
            .unwrap()
            .insert(name.to_string(), payload.to_vec());
    }

    pub fn payload_of(&self, name: &str) -> Option<Vec<u8>> {
        self.records.lock().unwrap().get(name).cloned()
    }

    pub fn script(queue: &Mutex<VecDeque<RemoteError>>, errors: Vec<RemoteError>) {
        queue.lock().unwrap().extend(errors);
    }

    fn pop(queue: &Mutex<VecDeque<RemoteError>>) -> Option<RemoteError> {
        queue.lock().unwrap().pop_front()
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn put_record(
        &self,
        name: &str,
        _record_type: &str,
        payload: &[u8],
        options: WriteOptions,
    ) -> RemoteResult<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_write_options.lock().unwrap() = Some(options);
        if let Some(error) = Self::pop(&self.put_errors) {
            return Err(error);
        }
        self.insert(name, payload);
        Ok(())
    }

    async fn fetch_record(&self, name: &str, projection: Projection) -> RemoteResult<RemoteRecord> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = Self::pop(&self.fetch_errors) {
            return Err(error);
        }
        let records = self.records.lock().unwrap();
        let Some(payload) = records.get(name) else {
            return Err(RemoteError::NotFound);
        };
        let payload = match projection {
            Projection::MetadataOnly => None,
            Projection::Full if self.strip_payloads.load(Ordering::SeqCst) => None,
            Projection::Full => Some(payload.clone()),
        };
        Ok(RemoteRecord {
            name: name.to_string(),
            payload,
        })
    }

    async fn delete_records(&self, names: &[String]) -> RemoteResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = Self::pop(&self.delete_errors) {
            return Err(error);
        }
        let mut records = self.records.lock().unwrap();
        for name in names {
            records.remove(name);
        }
        Ok(())
    }

    async fn query_page(
        &self,
        _record_type: &str,
        cursor: Option<Cursor>,
    ) -> RemoteResult<RecordPage> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.query_cursors
            .lock()
            .unwrap()
            .push(cursor.map(|c| c.as_bytes().to_vec()));
        if let Some(result) = self.query_script.lock().unwrap().pop_front() {
            return result;
        }
        let mut names: Vec<String> = self.records.lock().unwrap().keys().cloned().collect();
        names.sort();
        Ok(RecordPage {
            names,
            cursor: None,
        })
    }

    async fn account_status(&self) -> RemoteResult<AccountStatus> {
        if let Some(error) = self.status_error.lock().unwrap().take() {
            return Err(error);
        }
        Ok(*self.status.lock().unwrap())
    }

    async fn pending_operations(&self) -> RemoteResult<Vec<String>> {
        if let Some(error) = self.pending_error.lock().unwrap().take() {
            return Err(error);
        }
        Ok(self.pending.lock().unwrap().clone())
    }

    async fn cancel_operation(&self, id: &str) -> RemoteResult<()> {
        if let Some(error) = Self::pop(&self.cancel_errors) {
            return Err(error);
        }
        self.cancelled.lock().unwrap().push(id.to_string());
        Ok(())
    }
}

/// Delay that records requested sleeps and returns immediately.
pub struct InstantDelay {
    pub slept: Mutex<Vec<Duration>>,
}

impl InstantDelay {
    pub fn new() -> Self {
        Self {
            slept: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Delay for InstantDelay {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}
