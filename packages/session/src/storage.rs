//! Durable key-value storage backends for the session record.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::SessionError;

/// A string key-value store with browser local-storage semantics.
///
/// Writes replace the previous value. Removing a missing key is not an
/// error.
pub trait KeyValueStorage: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// Stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Removes `key`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), SessionError>;
}

/// In-process storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<BTreeMap<String, String>>>,
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), SessionError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
        Ok(())
    }
}

/// Storage backed by one `<key>.json` file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Default directory for persisted client state.
    pub const DEFAULT_DIR: &'static str = "data/client";

    /// Creates a storage rooted at `dir`. The directory is created on the
    /// first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the stored files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    /// Bytes that are not UTF-8 are returned lossily decoded, so callers
    /// see them as a corrupted value rather than a read failure.
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(match String::from_utf8(bytes) {
                Ok(contents) => contents,
                Err(e) => {
                    log::debug!("{key}.json is not UTF-8: {e}");
                    String::from_utf8_lossy(e.as_bytes()).into_owned()
                }
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError> {
        std::fs::create_dir_all(&self.dir)?;

        // Write to a temp file, then rename over the record
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;

        log::trace!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), SessionError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SESSION_KEY, SessionStore};

    #[test]
    fn memory_storage_clones_share_state() {
        let a = MemoryStorage::default();
        let b = a.clone();
        a.set_item("k", "v").unwrap();
        assert_eq!(b.get_item("k").unwrap().as_deref(), Some("v"));
        b.remove_item("k").unwrap();
        assert_eq!(a.get_item("k").unwrap(), None);
    }

    #[test]
    fn file_storage_roundtrip() {
        let tmp = std::env::temp_dir().join("road_safety_file_storage_roundtrip");
        let _ = std::fs::remove_dir_all(&tmp);

        let storage = FileStorage::new(&tmp);
        assert_eq!(storage.get_item("user").unwrap(), None);
        storage.set_item("user", "{}").unwrap();
        storage.set_item("user", r#"{"a":1}"#).unwrap();
        assert_eq!(storage.get_item("user").unwrap().as_deref(), Some(r#"{"a":1}"#));

        storage.remove_item("user").unwrap();
        storage.remove_item("user").unwrap();
        assert_eq!(storage.get_item("user").unwrap(), None);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn corrupted_file_is_removed_on_read() {
        let tmp = std::env::temp_dir().join("road_safety_file_storage_corrupt");
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(&tmp).unwrap();
        std::fs::write(tmp.join(format!("{SESSION_KEY}.json")), "{truncated").unwrap();

        let store = SessionStore::new(Box::new(FileStorage::new(&tmp)));
        assert_eq!(store.get_current_session(), None);
        assert!(!tmp.join(format!("{SESSION_KEY}.json")).exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn non_utf8_file_is_removed_on_read() {
        let tmp = std::env::temp_dir().join("road_safety_file_storage_non_utf8");
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(&tmp).unwrap();
        let path = tmp.join(format!("{SESSION_KEY}.json"));
        std::fs::write(&path, [0xff, 0xfe, 0x7b]).unwrap();

        let store = SessionStore::new(Box::new(FileStorage::new(&tmp)));
        assert_eq!(store.get_current_session(), None);
        assert!(!path.exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
