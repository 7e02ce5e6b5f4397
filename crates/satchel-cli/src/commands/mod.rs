pub mod check;
pub mod delete;
pub mod init;
pub mod list;
pub mod reconcile;
pub mod status;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use satchel_core::config::SatchelConfig;
use satchel_remote::SyncClient;
use satchel_remote::local::LocalRecordStore;

/// Open the configured record store and wrap it in a sync client.
pub fn open_client(base_dir: &Path) -> Result<SyncClient> {
    let config = SatchelConfig::load(&SatchelConfig::default_path(base_dir))?;
    let store = LocalRecordStore::open(Path::new(&config.satchel.store_root))?;
    Ok(SyncClient::new(Arc::new(store)))
}
