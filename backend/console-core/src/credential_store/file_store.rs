//! JSON-file backed key/value store.
//!
//! Each `set`/`remove` rewrites the whole map through a temp file and a
//! rename, so a crash never leaves a half-written file. Writes to two keys
//! are still two separate writes.

use crate::credential_store::KeyValueStore;
use crate::error::StoreError;

use common::ErrorLocation;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use log::{debug, warn};

type Entries = BTreeMap<String, String>;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (but do not create) the store file. Parent directories are created.
    #[track_caller]
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let location = ErrorLocation::caller();
        let path = path.into();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Write {
                location,
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[track_caller]
    fn read_entries(&self) -> Result<Entries, StoreError> {
        let location = ErrorLocation::caller();
        if !self.path.exists() {
            return Ok(Entries::new());
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| StoreError::Read {
            location,
            path: self.path.clone(),
            source: e,
        })?;

        if contents.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            warn!("Corrupted store file {}: {}", self.path.display(), e);
            StoreError::Parse {
                location,
                path: self.path.clone(),
                reason: e.to_string(),
            }
        })
    }

    #[track_caller]
    fn write_entries(&self, entries: &Entries) -> Result<(), StoreError> {
        let location = ErrorLocation::caller();
        let json = serde_json::to_string_pretty(entries).map_err(|e| StoreError::Parse {
            location,
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let temp_path = self.path.with_extension("json.tmp");

        std::fs::write(&temp_path, json).map_err(|e| StoreError::Write {
            location,
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &self.path).map_err(|e| StoreError::Write {
            location,
            path: self.path.clone(),
            source: e,
        })
    }
}

impl KeyValueStore for FileStore {
    #[track_caller]
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock();
        Ok(self.read_entries()?.remove(key))
    }

    #[track_caller]
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock();
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)?;
        debug!("Stored '{}' in {}", key, self.path.display());
        Ok(())
    }

    #[track_caller]
    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock();
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
            debug!("Removed '{}' from {}", key, self.path.display());
        }
        Ok(())
    }
}
