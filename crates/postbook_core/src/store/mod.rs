//! Record persistence contracts and snapshot bookkeeping.
//!
//! # Responsibility
//! - Define the storage contract shared by the filesystem and in-memory
//!   backends.
//! - Own snapshot naming: second-resolution timestamps with collision
//!   bumping.
//!
//! # Invariants
//! - Saving over an existing record appends exactly one snapshot of the
//!   prior persisted state; the first write of a key appends none.
//! - Snapshot names parse with `SNAPSHOT_TIMESTAMP_FORMAT`; anything else
//!   is skipped by listings and rejected as a restore reference.

use crate::model::record::AddressRecord;
use chrono::NaiveDateTime;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod fs;
pub mod memory;

/// Snapshot name format. Lexicographic order matches chronological order.
pub const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer error shared by all backends.
#[derive(Debug)]
pub enum StoreError {
    /// No live record under the key.
    NotFound(String),
    /// No snapshot with this reference under the key.
    SnapshotNotFound { key: String, reference: String },
    /// Reference does not parse as a snapshot timestamp.
    InvalidSnapshotRef(String),
    /// Rename target already holds a different live record.
    Occupied(String),
    /// Underlying I/O failure. Fatal, never retried.
    Io(std::io::Error),
    /// Record body failed to (de)serialize.
    Json(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(key) => write!(f, "record not found: {key}"),
            Self::SnapshotNotFound { key, reference } => {
                write!(f, "snapshot {reference} not found for record {key}")
            }
            Self::InvalidSnapshotRef(reference) => {
                write!(f, "invalid snapshot reference: `{reference}`")
            }
            Self::Occupied(key) => write!(f, "record key already in use: {key}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Reference to one stored snapshot of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRef {
    /// Timestamp-formatted name, unique per key.
    pub name: String,
    /// Parsed creation time, second resolution.
    pub taken_at: NaiveDateTime,
}

impl SnapshotRef {
    /// Parses a snapshot name; `None` when it does not match the format.
    pub fn parse(name: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(name, SNAPSHOT_TIMESTAMP_FORMAT)
            .ok()
            .map(|taken_at| Self {
                name: name.to_string(),
                taken_at,
            })
    }
}

/// Storage contract for address records and their snapshot history.
///
/// Implementations are synchronous and single-writer by assumption; no
/// locking is provided.
pub trait RecordStore {
    /// Loads the live record. `StoreError::NotFound` when absent.
    fn load(&self, key: &str) -> StoreResult<AddressRecord>;

    /// Reports whether a live record exists without loading it.
    fn exists(&self, key: &str) -> bool;

    /// Persists `record`, snapshotting the prior persisted state first when
    /// the key is already occupied.
    fn save(&self, key: &str, record: &AddressRecord) -> StoreResult<()>;

    /// Removes the live record and every snapshot under `key`. A missing
    /// snapshot area is not an error.
    fn delete(&self, key: &str) -> StoreResult<()>;

    /// Moves the live record and its history to `new_key`.
    ///
    /// Refuses an occupied target with `StoreError::Occupied`;
    /// `old_key == new_key` is a no-op.
    fn rename(&self, old_key: &str, new_key: &str) -> StoreResult<()>;

    /// All live record keys, sorted. Empty when nothing was stored yet.
    fn list_keys(&self) -> StoreResult<Vec<String>>;

    /// Snapshots under `key`, newest first. Unparseable names are skipped.
    fn list_snapshots(&self, key: &str) -> StoreResult<Vec<SnapshotRef>>;

    /// Loads one snapshot body by reference name.
    fn load_snapshot(&self, key: &str, reference: &str) -> StoreResult<AddressRecord>;

    /// Replaces the live record with a snapshot body.
    ///
    /// Goes through `save`, so the state live immediately before the
    /// restore is itself snapshotted.
    fn restore(&self, key: &str, reference: &str) -> StoreResult<()> {
        let body = self.load_snapshot(key, reference)?;
        self.save(key, &body)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn load(&self, key: &str) -> StoreResult<AddressRecord> {
        (**self).load(key)
    }

    fn exists(&self, key: &str) -> bool {
        (**self).exists(key)
    }

    fn save(&self, key: &str, record: &AddressRecord) -> StoreResult<()> {
        (**self).save(key, record)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        (**self).delete(key)
    }

    fn rename(&self, old_key: &str, new_key: &str) -> StoreResult<()> {
        (**self).rename(old_key, new_key)
    }

    fn list_keys(&self) -> StoreResult<Vec<String>> {
        (**self).list_keys()
    }

    fn list_snapshots(&self, key: &str) -> StoreResult<Vec<SnapshotRef>> {
        (**self).list_snapshots(key)
    }

    fn load_snapshot(&self, key: &str, reference: &str) -> StoreResult<AddressRecord> {
        (**self).load_snapshot(key, reference)
    }
}

/// Picks the snapshot name for a save happening at `now`.
///
/// When the second-resolution slot is taken the timestamp advances to the
/// next free second, keeping names parseable and strictly increasing even
/// for back-to-back saves.
pub(crate) fn next_snapshot_slot<F>(now: NaiveDateTime, is_taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut candidate = now;
    loop {
        let name = candidate.format(SNAPSHOT_TIMESTAMP_FORMAT).to_string();
        if !is_taken(&name) {
            return name;
        }
        candidate = candidate + chrono::Duration::seconds(1);
    }
}
