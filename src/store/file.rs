use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use super::ScratchStore;
use crate::error::StoreError;

/// A store persisted as one JSON object file per named session.
///
/// Every mutation rewrites the file, so a restarted process resumes exactly
/// where the previous one stopped.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the session file at `path`, starting empty if it is missing or unreadable.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let entries = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), "discarding unreadable session file: {}", e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), keys = entries.len(), "opened session store");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ScratchStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.entries();
        let mut staged = entries.clone();
        staged.insert(key.to_string(), value);
        self.flush(&staged)?;
        *entries = staged;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.clear_keys(&[key])
    }

    fn clear_keys(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut entries = self.entries();
        let mut staged = entries.clone();
        for key in keys {
            staged.remove(*key);
        }
        if staged.len() != entries.len() {
            self.flush(&staged)?;
            *entries = staged;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions").join("default.json");

        let store = FileStore::open(&path).unwrap();
        store.set("quizEmail", "a@b.com".to_string()).unwrap();
        store.set("quizCurrentIndex", "4".to_string()).unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("quizEmail").as_deref(), Some("a@b.com"));
        assert_eq!(reopened.get("quizCurrentIndex").as_deref(), Some("4"));
    }

    #[test]
    fn test_clearing_every_key_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.json");

        let store = FileStore::open(&path).unwrap();
        store.set("a", "1".to_string()).unwrap();
        store.set("b", "2".to_string()).unwrap();
        assert!(path.exists());

        store.clear_keys(&["a", "b"]).unwrap();
        assert!(!path.exists());
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn test_corrupted_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.json");
        fs::write(&path, "{ not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("quizEmail"), None);
    }

    #[test]
    fn test_failed_flush_keeps_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.json");

        let store = FileStore::open(&path).unwrap();
        store.set("quizEmail", "a@b.com".to_string()).unwrap();

        // A directory in place of the file makes the rename fail.
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(store.set("quizEmail", "c@d.org".to_string()).is_err());
        assert!(store.set("quizCurrentIndex", "2".to_string()).is_err());
        assert_eq!(store.get("quizEmail").as_deref(), Some("a@b.com"));
        assert_eq!(store.get("quizCurrentIndex"), None);
    }
}
