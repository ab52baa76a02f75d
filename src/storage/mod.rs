// Persistent key-value storage for mockchat
// Every piece of state lives under one string key as a JSON-encoded value,
// the same shape a browser keeps in local storage.

use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub mod contacts;
pub mod history;
pub mod settings;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("stored value under '{key}' is not valid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode value: {0}")]
    Serialize(#[source] serde_json::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A flat string-to-string store. Values are whole JSON documents; there is no
/// partial update, so callers always read, modify and write the entire value.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic while holding the lock leaves the map itself intact
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Ephemeral store, used by tests and `--memory` sessions
#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(lock(&self.values).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        lock(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        lock(&self.values).remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object on disk.
///
/// The whole file is rewritten on every mutation (temp file + rename), so a
/// write is all-or-nothing. Two processes sharing the file still race: the
/// last one to write wins.
pub struct FileStorage {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    pub fn open(path: &Path) -> StoreResult<Self> {
        let values = if path.exists() {
            let contents = fs::read_to_string(path)?;
            if contents.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
                    key: path.display().to_string(),
                    source,
                })?
            }
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            HashMap::new()
        };

        info!("Opened storage file {} ({} keys)", path.display(), values.len());
        Ok(FileStorage {
            path: path.to_path_buf(),
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, values: &HashMap<String, String>) -> StoreResult<()> {
        let encoded = serde_json::to_string_pretty(values).map_err(StoreError::Serialize)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, encoded)?;
        fs::rename(&tmp_path, &self.path)?;
        debug!("Flushed {} keys to {}", values.len(), self.path.display());
        Ok(())
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(lock(&self.values).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut values = lock(&self.values);
        values.insert(key.to_string(), value.to_string());
        self.flush(&values)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut values = lock(&self.values);
        if values.remove(key).is_some() {
            self.flush(&values)?;
        }
        Ok(())
    }
}

/// Names of the persisted keys. Defaults match the keys the web mockup used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct StorageKeys {
    pub contacts: String,
    pub history: String,
    pub legacy_messages: String,
    pub selected_contact: String,
    pub dark_mode: String,
    pub online_status: String,
    pub list_wallpaper: String,
    pub interface_wallpaper: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        StorageKeys {
            contacts: "chatContacts".to_string(),
            history: "chatHistory".to_string(),
            legacy_messages: "chatMessages".to_string(),
            selected_contact: "currentChatContact".to_string(),
            dark_mode: "darkMode".to_string(),
            online_status: "onlineStatus".to_string(),
            list_wallpaper: "chatWallpaper".to_string(),
            interface_wallpaper: "interfaceWallpaper".to_string(),
        }
    }
}

/// Typed access to the contact list, history map and settings.
///
/// Cloning is cheap and every clone shares the same backend. Read-modify-write
/// sequences are serialized within this process; nothing coordinates separate
/// processes sharing one file.
#[derive(Clone)]
pub struct ChatStore {
    backend: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
    update_lock: Arc<Mutex<()>>,
}

impl ChatStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        ChatStore {
            backend,
            keys,
            update_lock: Arc::new(Mutex::new(())),
        }
    }

    /// In-memory store with the default key names
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), StorageKeys::default())
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
        &self.backend
    }

    pub(crate) fn begin_update(&self) -> MutexGuard<'_, ()> {
        lock(&self.update_lock)
    }

    pub(crate) fn read_json<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        match self.backend.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StoreError::Corrupt {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    pub(crate) fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StoreResult<()> {
        let encoded = serde_json::to_string(value).map_err(StoreError::Serialize)?;
        self.backend.set(key, &encoded)
    }

    pub(crate) fn read_raw(&self, key: &str) -> StoreResult<Option<String>> {
        self.backend.get(key)
    }

    pub(crate) fn write_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        self.backend.set(key, value)
    }

    pub(crate) fn remove_key(&self, key: &str) -> StoreResult<()> {
        self.backend.remove(key)
    }

    /// Drop contacts, history, the legacy list and the selected contact,
    /// as the landing page does for a fresh start. Settings are kept.
    pub fn reset_for_fresh_start(&self) -> StoreResult<()> {
        let _guard = self.begin_update();
        self.remove_key(&self.keys.contacts)?;
        self.remove_key(&self.keys.history)?;
        self.remove_key(&self.keys.legacy_messages)?;
        self.remove_key(&self.keys.selected_contact)?;
        info!("Storage cleared for fresh start");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_basic_operations() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("missing").unwrap(), None);

        storage.set("key", "value").unwrap();
        assert_eq!(storage.get("key").unwrap().as_deref(), Some("value"));

        storage.set("key", "other").unwrap();
        assert_eq!(storage.get("key").unwrap().as_deref(), Some("other"));

        storage.remove("key").unwrap();
        assert_eq!(storage.get("key").unwrap(), None);
    }

    #[test]
    fn test_file_storage_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        {
            let storage = FileStorage::open(&path).unwrap();
            storage.set("darkMode", "true").unwrap();
            storage.set("chatWallpaper", "blue").unwrap();
            storage.remove("chatWallpaper").unwrap();
        }

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("darkMode").unwrap().as_deref(), Some("true"));
        assert_eq!(reopened.get("chatWallpaper").unwrap(), None);
    }

    #[test]
    fn test_file_storage_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();

        match FileStorage::open(&path) {
            Err(StoreError::Corrupt { .. }) => (),
            Err(other) => panic!("Expected Corrupt error, got {}", other),
            Ok(_) => panic!("Expected corrupt file to be rejected"),
        }
    }

    #[test]
    fn test_read_json_reports_corrupt_key() {
        let store = ChatStore::in_memory();
        store.write_raw("chatContacts", "[{broken").unwrap();

        let result: StoreResult<Option<Vec<u32>>> = store.read_json("chatContacts");
        match result {
            Err(StoreError::Corrupt { key, .. }) => assert_eq!(key, "chatContacts"),
            other => panic!("Expected Corrupt error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_custom_key_names_are_used() {
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStorage::new());
        let keys = StorageKeys {
            contacts: "people".to_string(),
            ..StorageKeys::default()
        };
        let store = ChatStore::new(backend.clone(), keys);
        store.write_json("people", &vec!["a", "b"]).unwrap();

        assert!(backend.get("people").unwrap().is_some());
        assert!(backend.get("chatContacts").unwrap().is_none());
    }
}
