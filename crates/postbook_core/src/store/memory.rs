//! In-memory record store.
//!
//! # Responsibility
//! - Provide a storage double with the exact `RecordStore` semantics, so
//!   services can be exercised without touching a filesystem.
//!
//! # Invariants
//! - Snapshot-on-save behaves identically to the filesystem backend.
//! - BTreeMap keys give deterministic iteration order.

use crate::model::record::AddressRecord;
use crate::store::{next_snapshot_slot, RecordStore, SnapshotRef, StoreError, StoreResult};
use chrono::Local;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Record store keeping everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    records: BTreeMap<String, AddressRecord>,
    snapshots: BTreeMap<String, BTreeMap<String, AddressRecord>>,
}

impl MemoryRecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots currently held for `key`.
    pub fn snapshot_count(&self, key: &str) -> usize {
        self.lock().snapshots.get(key).map_or(0, BTreeMap::len)
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().expect("record store mutex poisoned")
    }
}

impl RecordStore for MemoryRecordStore {
    fn load(&self, key: &str) -> StoreResult<AddressRecord> {
        self.lock()
            .records
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn exists(&self, key: &str) -> bool {
        self.lock().records.contains_key(key)
    }

    fn save(&self, key: &str, record: &AddressRecord) -> StoreResult<()> {
        let mut state = self.lock();
        if let Some(current) = state.records.get(key).cloned() {
            let history = state.snapshots.entry(key.to_string()).or_default();
            let name = next_snapshot_slot(Local::now().naive_local(), |candidate| {
                history.contains_key(candidate)
            });
            history.insert(name, current);
        }
        state.records.insert(key.to_string(), record.clone());
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        let mut state = self.lock();
        if state.records.remove(key).is_none() {
            return Err(StoreError::NotFound(key.to_string()));
        }
        state.snapshots.remove(key);
        Ok(())
    }

    fn rename(&self, old_key: &str, new_key: &str) -> StoreResult<()> {
        if old_key == new_key {
            return Ok(());
        }
        let mut state = self.lock();
        if !state.records.contains_key(old_key) {
            return Err(StoreError::NotFound(old_key.to_string()));
        }
        if state.records.contains_key(new_key) {
            return Err(StoreError::Occupied(new_key.to_string()));
        }
        if let Some(record) = state.records.remove(old_key) {
            state.records.insert(new_key.to_string(), record);
        }
        if let Some(history) = state.snapshots.remove(old_key) {
            state.snapshots.insert(new_key.to_string(), history);
        }
        Ok(())
    }

    fn list_keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.lock().records.keys().cloned().collect())
    }

    fn list_snapshots(&self, key: &str) -> StoreResult<Vec<SnapshotRef>> {
        let state = self.lock();
        let mut snapshots: Vec<SnapshotRef> = state
            .snapshots
            .get(key)
            .map(|history| {
                history
                    .keys()
                    .filter_map(|name| SnapshotRef::parse(name))
                    .collect()
            })
            .unwrap_or_default();
        snapshots.sort_by(|a, b| b.taken_at.cmp(&a.taken_at));
        Ok(snapshots)
    }

    fn load_snapshot(&self, key: &str, reference: &str) -> StoreResult<AddressRecord> {
        if SnapshotRef::parse(reference).is_none() {
            return Err(StoreError::InvalidSnapshotRef(reference.to_string()));
        }
        self.lock()
            .snapshots
            .get(key)
            .and_then(|history| history.get(reference))
            .cloned()
            .ok_or_else(|| StoreError::SnapshotNotFound {
                key: key.to_string(),
                reference: reference.to_string(),
            })
    }
}
