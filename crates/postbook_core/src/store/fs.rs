//! Filesystem-backed record store.
//!
//! # Responsibility
//! - Persist one JSON body per record under the data directory.
//! - Keep per-key snapshot directories under the history directory.
//!
//! # Invariants
//! - `save` copies the bytes currently on disk into a snapshot before
//!   overwriting them.
//! - Snapshot files carry `SNAPSHOT_TIMESTAMP_FORMAT` names; references are
//!   validated before touching any path.

use crate::model::record::AddressRecord;
use crate::store::{next_snapshot_slot, RecordStore, SnapshotRef, StoreError, StoreResult};
use chrono::Local;
use log::{error, info};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Record store writing JSON files under a data/history directory pair.
pub struct FsRecordStore {
    data_dir: PathBuf,
    history_dir: PathBuf,
}

impl FsRecordStore {
    /// Creates a store rooted at the given directories.
    ///
    /// Directories are created lazily on first write, so constructing the
    /// store performs no I/O.
    pub fn new(data_dir: impl Into<PathBuf>, history_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            history_dir: history_dir.into(),
        }
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }

    fn key_history_dir(&self, key: &str) -> PathBuf {
        self.history_dir.join(key)
    }

    fn snapshot_path(&self, key: &str, name: &str) -> PathBuf {
        self.key_history_dir(key).join(format!("{name}.json"))
    }

    /// Copies the currently persisted body into a new snapshot.
    ///
    /// Returns the snapshot name, or `None` when no live record exists yet.
    fn snapshot_current(&self, key: &str) -> StoreResult<Option<String>> {
        let current = match fs::read_to_string(self.record_path(key)) {
            Ok(body) => body,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        fs::create_dir_all(self.key_history_dir(key))?;
        let name = next_snapshot_slot(Local::now().naive_local(), |candidate| {
            self.snapshot_path(key, candidate).exists()
        });
        fs::write(self.snapshot_path(key, &name), current)?;
        Ok(Some(name))
    }
}

impl RecordStore for FsRecordStore {
    fn load(&self, key: &str) -> StoreResult<AddressRecord> {
        let body = match fs::read_to_string(self.record_path(key)) {
            Ok(body) => body,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(key.to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&body)?)
    }

    fn exists(&self, key: &str) -> bool {
        self.record_path(key).exists()
    }

    fn save(&self, key: &str, record: &AddressRecord) -> StoreResult<()> {
        let snapshot = self.snapshot_current(key)?;
        fs::create_dir_all(&self.data_dir)?;
        let body = serde_json::to_string_pretty(record)?;
        fs::write(self.record_path(key), body)?;
        info!(
            "event=record_save module=store status=ok key={key} snapshot={}",
            snapshot.as_deref().unwrap_or("none")
        );
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        match fs::remove_file(self.record_path(key)) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(key.to_string()));
            }
            Err(err) => return Err(err.into()),
        }
        match fs::remove_dir_all(self.key_history_dir(key)) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        info!("event=record_delete module=store status=ok key={key}");
        Ok(())
    }

    fn rename(&self, old_key: &str, new_key: &str) -> StoreResult<()> {
        if old_key == new_key {
            return Ok(());
        }
        if !self.exists(old_key) {
            return Err(StoreError::NotFound(old_key.to_string()));
        }
        if self.exists(new_key) {
            error!(
                "event=record_rename module=store status=error old={old_key} new={new_key} \
                 error_code=target_occupied"
            );
            return Err(StoreError::Occupied(new_key.to_string()));
        }

        fs::rename(self.record_path(old_key), self.record_path(new_key))?;
        let old_history = self.key_history_dir(old_key);
        if old_history.exists() {
            fs::rename(old_history, self.key_history_dir(new_key))?;
        }
        info!("event=record_rename module=store status=ok old={old_key} new={new_key}");
        Ok(())
    }

    fn list_keys(&self) -> StoreResult<Vec<String>> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let file_name = entry?.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if let Some(key) = name.strip_suffix(".json") {
                keys.push(key.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn list_snapshots(&self, key: &str) -> StoreResult<Vec<SnapshotRef>> {
        let entries = match fs::read_dir(self.key_history_dir(key)) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut snapshots = Vec::new();
        for entry in entries {
            let file_name = entry?.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let Some(stem) = name.strip_suffix(".json") else {
                continue;
            };
            if let Some(snapshot) = SnapshotRef::parse(stem) {
                snapshots.push(snapshot);
            }
        }
        snapshots.sort_by(|a, b| b.taken_at.cmp(&a.taken_at));
        Ok(snapshots)
    }

    fn load_snapshot(&self, key: &str, reference: &str) -> StoreResult<AddressRecord> {
        if SnapshotRef::parse(reference).is_none() {
            return Err(StoreError::InvalidSnapshotRef(reference.to_string()));
        }
        let body = match fs::read_to_string(self.snapshot_path(key, reference)) {
            Ok(body) => body,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StoreError::SnapshotNotFound {
                    key: key.to_string(),
                    reference: reference.to_string(),
                });
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&body)?)
    }
}
