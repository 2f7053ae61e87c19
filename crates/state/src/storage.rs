//! Key-value storage backends
//!
//! Durable storage is strictly best-effort: every implementation catches and
//! logs its own I/O failures instead of surfacing them, because in-memory
//! state must never depend on a storage write succeeding.

use std::collections::HashMap;
use std::path::PathBuf;

use parking_lot::RwLock;
use tracing::warn;

use crate::error::Result;

/// A best-effort string key-value store
///
/// Implementations take `&self`: stores are shared between the container and
/// the embedding host.
pub trait Storage: Send + Sync {
    /// Read a value; `None` covers both "absent" and "unreadable"
    fn get(&self, key: &str) -> Option<String>;
    /// Write a value; failures are logged and swallowed
    fn set(&self, key: &str, value: &str);
    /// Delete a value; failures are logged and swallowed
    fn remove(&self, key: &str);
}

/// In-memory storage for tests and hosts without durable storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

/// File-backed storage: one file per key under a directory
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are fixed constants, but keep filenames tame anyway
        let name: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(name)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Some(value),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(key, error = %err, "storage read failed");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(err) = std::fs::write(self.path_for(key), value) {
            warn!(key, error = %err, "storage write failed");
        }
    }

    fn remove(&self, key: &str) {
        let path = self.path_for(key);
        if let Err(err) = std::fs::remove_file(&path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(key, error = %err, "storage remove failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("k"), None);
        storage.set("k", "v");
        assert_eq!(storage.get("k"), Some("v".to_string()));
        storage.remove("k");
        assert_eq!(storage.get("k"), None);
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        storage.set("glance.workspace", "{\"version\":1}");
        assert_eq!(
            storage.get("glance.workspace"),
            Some("{\"version\":1}".to_string())
        );
        storage.remove("glance.workspace");
        assert_eq!(storage.get("glance.workspace"), None);
        // Removing a missing key is a no-op
        storage.remove("glance.workspace");
    }

    #[test]
    fn test_file_storage_sanitizes_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        storage.set("odd/key name", "x");
        assert_eq!(storage.get("odd/key name"), Some("x".to_string()));
    }
}
