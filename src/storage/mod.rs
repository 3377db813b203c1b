//! Best-effort persistent key-value storage
//!
//! Backs the theme preference and per-post heart state. Failures are
//! swallowed with a warning; the features degrade to non-persistent.

mod hearts;
mod theme;

pub use hearts::HeartStore;
pub use theme::{ThemePreference, AVAILABLE_THEMES, DEFAULT_THEME};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// String key-value store with best-effort persistence
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when absent or unreadable
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value; failures are swallowed
    fn set(&self, key: &str, value: &str);
}

/// Key-value store persisted as a pretty JSON file
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Open a store at `path`, loading existing entries. A missing or
    /// unparseable file starts empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!("discarding unreadable store {:?}: {}", path, err);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                tracing::warn!("cannot create store directory {:?}: {}", parent, err);
                return;
            }
        }
        match serde_json::to_string_pretty(entries) {
            Ok(content) => {
                if let Err(err) = fs::write(&self.path, content) {
                    tracing::warn!("cannot persist store {:?}: {}", self.path, err);
                }
            }
            Err(err) => tracing::warn!("cannot serialize store: {}", err),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }
}

/// Purely in-memory store; also the non-persistent fallback
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = JsonFileStore::open(&path);
        store.set("theme", "gray");
        drop(store);

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get("theme"), Some("gray".to_string()));
        assert_eq!(reopened.get("missing"), None);
    }

    #[test]
    fn test_json_file_store_tolerates_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::open(&path);
        assert_eq!(store.get("anything"), None);
        store.set("k", "v");
        assert_eq!(store.get("k"), Some("v".to_string()));
    }

    #[test]
    fn test_json_file_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/state.json");

        let store = JsonFileStore::open(&path);
        store.set("k", "v");
        assert!(path.exists());
    }
}
