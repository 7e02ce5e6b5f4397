//! Client for synchronizing backup records with a remote, eventually
//! consistent record store: the store connection trait, the outcome
//! classifier and retry driver, and the sync client built on them.

pub mod client;
pub mod error;
pub mod local;
pub mod outcome;
pub mod retry;
pub mod store;

pub use client::SyncClient;
pub use error::{AvailabilityReason, RemoteError, SyncError};
