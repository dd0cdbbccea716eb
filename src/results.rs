//! Results screen data: loading the frozen result and retaking.

use tracing::info;

use crate::error::StoreError;
use crate::models::QuizResult;
use crate::session::Route;
use crate::store::{keys, read_json, ScratchStore};

/// Load the submitted result, or redirect to landing if there is none.
pub fn load_result(store: &(impl ScratchStore + ?Sized)) -> Result<QuizResult, Route> {
    read_json(store, keys::RESULT).ok_or(Route::Landing)
}

/// Clear every quiz key. The caller returns to landing.
pub fn retake(store: &(impl ScratchStore + ?Sized)) -> Result<Route, StoreError> {
    store.clear_keys(keys::ALL)?;
    info!("quiz data cleared for retake");
    Ok(Route::Landing)
}

/// Decide which screen a fresh process should show, as a reload would.
pub fn resume_route(store: &(impl ScratchStore + ?Sized)) -> Route {
    if store.get(keys::RESULT).is_some() {
        Route::Results
    } else if store.get(keys::QUESTIONS).is_some() && store.get(keys::START_TIME).is_some() {
        Route::Quiz
    } else {
        Route::Landing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{write_json, MemoryStore};
    use std::collections::BTreeMap;

    fn sample_result() -> QuizResult {
        QuizResult {
            email: "a@b.com".to_string(),
            questions: Vec::new(),
            user_answers: BTreeMap::new(),
        }
    }

    #[test]
    fn test_missing_result_redirects() {
        let store = MemoryStore::new();
        assert_eq!(load_result(&store), Err(Route::Landing));

        store.set(keys::RESULT, "garbage".to_string()).unwrap();
        assert_eq!(load_result(&store), Err(Route::Landing));
    }

    #[test]
    fn test_retake_clears_every_key() {
        let store = MemoryStore::new();
        for key in keys::ALL {
            store.set(key, "1".to_string()).unwrap();
        }
        write_json(&store, keys::RESULT, &sample_result()).unwrap();
        assert!(load_result(&store).is_ok());

        assert_eq!(retake(&store).unwrap(), Route::Landing);
        for key in keys::ALL {
            assert_eq!(store.get(key), None);
        }
    }

    #[test]
    fn test_resume_route() {
        let store = MemoryStore::new();
        assert_eq!(resume_route(&store), Route::Landing);

        store.set(keys::QUESTIONS, "[]".to_string()).unwrap();
        assert_eq!(resume_route(&store), Route::Landing);

        store.set(keys::START_TIME, "0".to_string()).unwrap();
        assert_eq!(resume_route(&store), Route::Quiz);

        write_json(&store, keys::RESULT, &sample_result()).unwrap();
        assert_eq!(resume_route(&store), Route::Results);
    }
}
