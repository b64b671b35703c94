use std::error::Error;
use std::fmt;

use async_trait::async_trait;

use crate::history::HistoryTurn;

/// Error returned by a session store.
#[derive(Debug)]
pub struct StoreError {
    message: String,
}

impl StoreError {
    /// Creates a new error with the given message.
    #[inline]
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.message.fmt(f)
    }
}

impl Error for StoreError {}

/// Backend persistence of chat sessions, keyed by user email and
/// session id.
///
/// The store is an external collaborator: the screen loads a session's
/// turns when it opens and saves them when it exits. Save failures are
/// reported but never block navigation, so implementations should not
/// retry internally.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the persisted turns of one session.
    async fn load_session(
        &self,
        user: &str,
        session: &str,
    ) -> Result<Vec<HistoryTurn>, StoreError>;

    /// Replaces the persisted turns of one session.
    async fn save_session(
        &self,
        user: &str,
        session: &str,
        turns: &[HistoryTurn],
    ) -> Result<(), StoreError>;
}
