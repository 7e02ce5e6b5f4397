//! Record naming scheme for the remote store.
//!
//! Every record name is `<recipientId>-<role>[suffix]`. The role tags and
//! the record type below are the on-the-wire naming contract: records
//! written by any client version must stay parseable by every later one,
//! so none of these constants may change.

use crate::types::RecipientId;

/// Record type under which all satchel records are stored.
pub const RECORD_TYPE: &str = "backup";

/// Suffix of the single per-recipient manifest record.
pub const MANIFEST_SUFFIX: &str = "manifest";

/// Role prefix for create-once records shared across backup runs.
pub const PERSISTENT_FILE_PREFIX: &str = "persistentFile-";

/// Role prefix for records created fresh on every export attempt.
pub const EPHEMERAL_FILE_PREFIX: &str = "ephemeralFile-";

/// Role prefix for diagnostic records.
pub const TEST_RECORD_PREFIX: &str = "test-";

/// Name prefix shared by all records of one recipient: `"<id>-"`.
pub fn record_prefix(recipient: &RecipientId) -> String {
    format!("{recipient}-")
}

/// Name of the recipient's manifest record. Exactly one exists per
/// recipient; it is always upserted.
pub fn manifest_name(recipient: &RecipientId) -> String {
    format!("{}{MANIFEST_SUFFIX}", record_prefix(recipient))
}

/// Name of a persistent file record. At most one exists per
/// (recipient, file id); it is created once and never overwritten.
pub fn persistent_file_name(recipient: &RecipientId, file_id: &str) -> String {
    format!("{}{PERSISTENT_FILE_PREFIX}{file_id}", record_prefix(recipient))
}

/// Fresh name for an ephemeral file record. A new random suffix is drawn
/// on every call, so each export attempt writes a distinct record.
pub fn ephemeral_file_name(recipient: &RecipientId) -> String {
    format!(
        "{}{EPHEMERAL_FILE_PREFIX}{}",
        record_prefix(recipient),
        uuid::Uuid::new_v4()
    )
}

/// Fresh name for a diagnostic test record.
pub fn test_record_name(recipient: &RecipientId) -> String {
    format!(
        "{}{TEST_RECORD_PREFIX}{}",
        record_prefix(recipient),
        uuid::Uuid::new_v4()
    )
}

/// True iff `name` names a manifest record.
pub fn is_manifest(name: &str) -> bool {
    name.ends_with(MANIFEST_SUFFIX)
}

/// Recover the owning recipient id from a record name.
///
/// The match is anchored at the start of the name: a leading `+`, one or
/// more digits, then `-`. A name without that prefix belongs to no
/// recipient and yields `None`; callers doing recipient-scoped
/// aggregation drop such names.
pub fn recipient_id(name: &str) -> Option<RecipientId> {
    let rest = name.strip_prefix('+')?;
    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 || !rest[digits..].starts_with('-') {
        return None;
    }
    Some(RecipientId(name[..digits + 1].to_string()))
}
