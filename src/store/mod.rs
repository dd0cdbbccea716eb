//! Tab-scoped scratch storage.
//!
//! A session lives in a small string key-value store. Values are JSON
//! documents under the keys in [`keys`]. Backends only need to provide raw
//! string access; the typed helpers here handle (de)serialization.

mod file;
mod memory;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::StoreError;

pub use file::FileStore;
pub use memory::MemoryStore;

pub mod keys {
    pub const EMAIL: &str = "quizEmail";
    pub const QUESTIONS: &str = "quizQuestions";
    pub const START_TIME: &str = "quizStartTime";
    pub const ANSWERS: &str = "quizAnswers";
    pub const VISITED: &str = "quizVisited";
    pub const CURRENT_INDEX: &str = "quizCurrentIndex";
    pub const RESULT: &str = "quizResult";

    /// Keys holding in-progress interaction state.
    pub const IN_PROGRESS: &[&str] = &[ANSWERS, VISITED, CURRENT_INDEX];

    /// Every key owned by the quiz.
    pub const ALL: &[&str] = &[
        EMAIL,
        QUESTIONS,
        START_TIME,
        RESULT,
        ANSWERS,
        VISITED,
        CURRENT_INDEX,
    ];
}

/// A key-value scratch space with page-lifetime semantics.
///
/// All writes come from one sequential event stream, so last write wins.
pub trait ScratchStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Remove several keys at once. Backends may override to batch the write.
    fn clear_keys(&self, keys: &[&str]) -> Result<(), StoreError> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

impl<S: ScratchStore + ?Sized> ScratchStore for Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn clear_keys(&self, keys: &[&str]) -> Result<(), StoreError> {
        (**self).clear_keys(keys)
    }
}

/// Read a JSON value. Unparsable values are treated as absent.
pub fn read_json<T: DeserializeOwned>(
    store: &(impl ScratchStore + ?Sized),
    key: &str,
) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, "ignoring corrupted session value: {}", e);
            None
        }
    }
}

pub fn write_json<T: Serialize + ?Sized>(
    store: &(impl ScratchStore + ?Sized),
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    store.set(key, serde_json::to_string(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_helpers() {
        let store = MemoryStore::new();
        write_json(&store, keys::VISITED, &vec![0usize, 3]).unwrap();
        assert_eq!(store.get(keys::VISITED).as_deref(), Some("[0,3]"));
        assert_eq!(read_json::<Vec<usize>>(&store, keys::VISITED), Some(vec![0, 3]));
    }

    #[test]
    fn test_corrupted_value_reads_as_absent() {
        let store = MemoryStore::new();
        store.set(keys::CURRENT_INDEX, "not a number".to_string()).unwrap();
        assert_eq!(read_json::<usize>(&store, keys::CURRENT_INDEX), None);
    }

    #[test]
    fn test_arc_store_shares_state() {
        let store = Arc::new(MemoryStore::new());
        let handle: Arc<dyn ScratchStore> = store.clone();
        handle.set(keys::EMAIL, "a@b.com".to_string()).unwrap();
        assert_eq!(store.get(keys::EMAIL).as_deref(), Some("a@b.com"));

        handle.clear_keys(keys::ALL).unwrap();
        assert!(store.is_empty());
    }
}
