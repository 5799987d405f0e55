//! Snapshot history use-case service.
//!
//! # Responsibility
//! - List a record's snapshots for display and restore one by reference.
//!
//! # Invariants
//! - Listing and restore require the live record to exist.
//! - Restore persists through `save`, so the pre-restore live state is
//!   snapshotted before being replaced.

use crate::store::{RecordStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors from history operations.
#[derive(Debug)]
pub enum HistoryServiceError {
    /// No live record under this key.
    AddressNotFound(String),
    /// Storage-layer failure.
    Store(StoreError),
}

impl Display for HistoryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AddressNotFound(key) => write!(f, "address not found: {key}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for HistoryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::AddressNotFound(_) => None,
        }
    }
}

impl From<StoreError> for HistoryServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(key) => Self::AddressNotFound(key),
            other => Self::Store(other),
        }
    }
}

/// One listed snapshot, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Reference accepted by `restore`.
    pub reference: String,
    /// Creation time rendered for humans.
    pub display_time: String,
}

/// History service facade over a record store.
pub struct HistoryService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> HistoryService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists snapshots for `key`, newest first.
    pub fn list(&self, key: &str) -> Result<Vec<HistoryEntry>, HistoryServiceError> {
        if !self.store.exists(key) {
            return Err(HistoryServiceError::AddressNotFound(key.to_string()));
        }
        let snapshots = self.store.list_snapshots(key)?;
        Ok(snapshots
            .into_iter()
            .map(|snapshot| HistoryEntry {
                display_time: snapshot.taken_at.format(DISPLAY_TIME_FORMAT).to_string(),
                reference: snapshot.name,
            })
            .collect())
    }

    /// Restores the snapshot at `reference` as the new live record.
    pub fn restore(&self, key: &str, reference: &str) -> Result<(), HistoryServiceError> {
        if !self.store.exists(key) {
            return Err(HistoryServiceError::AddressNotFound(key.to_string()));
        }
        self.store.restore(key, reference)?;
        info!("event=record_restore module=service status=ok key={key} reference={reference}");
        Ok(())
    }
}
