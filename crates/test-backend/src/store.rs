use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use news_nest_model::{HistoryTurn, SessionStore, StoreError};

/// An in-memory session store.
///
/// Saved sessions can be inspected with [`MemoryStore::saved`], and saves
/// can be forced to fail for error-path tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: Mutex<HashMap<(String, String), Vec<HistoryTurn>>>,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    /// Returns the turns saved for the given user and session, if any.
    pub fn saved(&self, user: &str, session: &str) -> Option<Vec<HistoryTurn>> {
        let sessions = self.sessions.lock().unwrap();
        sessions.get(&(user.to_owned(), session.to_owned())).cloned()
    }

    /// Makes every subsequent save fail when `fail` is true.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::Relaxed);
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn load_session(
        &self,
        user: &str,
        session: &str,
    ) -> Result<Vec<HistoryTurn>, StoreError> {
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions
            .get(&(user.to_owned(), session.to_owned()))
            .cloned()
            .unwrap_or_default())
    }

    async fn save_session(
        &self,
        user: &str,
        session: &str,
        turns: &[HistoryTurn],
    ) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::Relaxed) {
            return Err(StoreError::new("scripted save failure"));
        }
        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert((user.to_owned(), session.to_owned()), turns.to_vec());
        Ok(())
    }
}
