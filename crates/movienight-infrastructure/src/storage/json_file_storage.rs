//! File-backed local storage.
//!
//! All keys live in one JSON object file. Writes go through a temporary file,
//! fsync and an atomic rename, so a reader in another process sees either the
//! old or the new object, never a torn one. Every read-modify-write holds an
//! exclusive lock on a sibling `.lock` file, so handles writing different
//! keys never drop each other's updates.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use fs2::FileExt;
use movienight_core::MovieNightError;
use movienight_core::error::Result;
use movienight_core::observer::{ObserverRegistry, Subscription};
use movienight_core::storage::{KeyValueStorage, StorageChange, StorageListener};

type Entries = BTreeMap<String, String>;

/// A handle onto a JSON storage file.
///
/// Each handle acts as one tab; share it through an `Arc` to stay in the same
/// tab. Changes written by other handles become visible to this handle's
/// listeners when [`refresh`](Self::refresh) is called.
pub struct JsonFileStorage {
    path: PathBuf,
    /// Durable state as last seen by this handle.
    snapshot: Mutex<Entries>,
    listeners: ObserverRegistry<StorageChange>,
    local_listeners: ObserverRegistry<StorageChange>,
}

impl JsonFileStorage {
    pub const FILE_NAME: &'static str = "local_storage.json";

    /// Opens (without creating) the storage file at `path`.
    pub fn new(path: PathBuf) -> Self {
        let snapshot = match read_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Ignoring unreadable storage file {:?}: {}", path, e);
                Entries::new()
            }
        };

        Self {
            path,
            snapshot: Mutex::new(snapshot),
            listeners: ObserverRegistry::new(),
            local_listeners: ObserverRegistry::new(),
        }
    }

    /// Opens the storage file inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-reads the file and notifies listeners about every key that changed
    /// since this handle last looked.
    ///
    /// Returns the changes that were delivered.
    pub fn refresh(&self) -> Result<Vec<StorageChange>> {
        let current = read_entries(&self.path)?;

        let changes = {
            let mut snapshot = self.snapshot();
            let changes = diff(&snapshot, &current);
            *snapshot = current;
            changes
        };

        for change in &changes {
            tracing::debug!("External change to storage key '{}'", change.key);
            self.listeners.notify(change);
        }
        Ok(changes)
    }

    fn snapshot(&self) -> MutexGuard<'_, Entries> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Loads the current entries for a read-modify-write. A corrupt file is
    /// replaced rather than blocking every future write.
    fn entries_for_update(&self) -> Entries {
        read_entries(&self.path).unwrap_or_else(|e| {
            tracing::warn!("Storage file {:?} is corrupt, starting over: {}", self.path, e);
            Entries::new()
        })
    }

    /// Applies `update` to the current entries and saves them, all under the
    /// file lock. Returns the resulting change, if the value differs.
    fn update<F>(&self, key: &str, update: F) -> Result<Option<StorageChange>>
    where
        F: FnOnce(&mut Entries) -> Option<String>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut entries = self.entries_for_update();
        let old_value = update(&mut entries);
        let new_value = entries.get(key).cloned();
        if old_value == new_value {
            return Ok(None);
        }
        self.save(&entries)?;

        // Own writes are not reported back to this handle by refresh()
        {
            let mut snapshot = self.snapshot();
            match &new_value {
                Some(value) => snapshot.insert(key.to_string(), value.clone()),
                None => snapshot.remove(key),
            };
        }

        Ok(Some(StorageChange {
            key: key.to_string(),
            old_value,
            new_value,
        }))
    }

    fn save(&self, entries: &Entries) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;

        // Write to temporary file in the same directory
        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;

        // Ensure data is written to disk
        tmp_file.sync_all()?;
        drop(tmp_file);

        // Atomic rename
        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| MovieNightError::storage("Path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| MovieNightError::storage("Path has no file name"))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(read_entries(&self.path)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let change = self.update(key, |entries| {
            entries.insert(key.to_string(), value.to_string())
        })?;
        // The lock is released before listeners run; they may write again.
        if let Some(change) = change {
            self.local_listeners.notify(&change);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let change = self.update(key, |entries| entries.remove(key))?;
        if let Some(change) = change {
            self.local_listeners.notify(&change);
        }
        Ok(())
    }

    fn subscribe(&self, listener: StorageListener) -> Subscription {
        self.listeners.subscribe(listener)
    }

    fn subscribe_local(&self, listener: StorageListener) -> Subscription {
        self.local_listeners.subscribe(listener)
    }
}

/// Exclusive lock on `<storage file>.lock`, released when dropped.
///
/// The lock file is left in place. Deleting it would let a waiter hold a lock
/// on an unlinked file while a newcomer locks a fresh one.
struct FileLock {
    _file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        // Ensure parent directory exists
        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        file.lock_exclusive().map_err(|e| {
            MovieNightError::storage_write(format!("Failed to lock {:?}: {}", lock_path, e))
        })?;

        Ok(Self { _file: file })
    }
}

fn read_entries(path: &Path) -> Result<Entries> {
    if !path.exists() {
        return Ok(Entries::new());
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Entries::new());
    }

    Ok(serde_json::from_str(&content)?)
}

fn diff(before: &Entries, after: &Entries) -> Vec<StorageChange> {
    let mut changes = Vec::new();

    for (key, new_value) in after {
        let old_value = before.get(key);
        if old_value != Some(new_value) {
            changes.push(StorageChange {
                key: key.clone(),
                old_value: old_value.cloned(),
                new_value: Some(new_value.clone()),
            });
        }
    }
    for (key, old_value) in before {
        if !after.contains_key(key) {
            changes.push(StorageChange {
                key: key.clone(),
                old_value: Some(old_value.clone()),
                new_value: None,
            });
        }
    }

    changes
}
