use std::sync::{Arc, Mutex};
use std::collections::HashMap;
use tracing::debug;

use crate::models::session::SessionRecord;
use super::errors::RepositoryError;

/// Most sessions kept in memory before the oldest are evicted
pub const DEFAULT_MAX_SESSIONS: usize = 5_000;

/// In-memory storage implementation for session results
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    /// Session records keyed by session id
    sessions: Arc<Mutex<HashMap<String, SessionRecord>>>,
    max_sessions: usize,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create a new in-memory storage holding at most [`DEFAULT_MAX_SESSIONS`]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_SESSIONS)
    }

    /// Create a new in-memory storage holding at most `max_sessions` records
    pub fn with_capacity(max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Store a record, replacing any previous record for the session.
    /// A new session arriving at capacity evicts the oldest one.
    pub async fn store(&self, record: &SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut store = self.sessions.lock()?;

        if !store.contains_key(&record.session_id) && store.len() >= self.max_sessions {
            let oldest = store
                .values()
                .min_by(|a, b| a.created_at.cmp(&b.created_at))
                .map(|r| r.session_id.clone());
            if let Some(oldest) = oldest {
                debug!("In-memory session limit reached, evicting session {}", oldest);
                store.remove(&oldest);
            }
        }

        store.insert(record.session_id.clone(), record.clone());
        Ok(record.clone())
    }

    /// Get the record for a session
    pub async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, RepositoryError> {
        let store = self.sessions.lock()?;
        Ok(store.get(session_id).cloned())
    }

    /// Remove the record for a session, returning whether one existed
    pub async fn delete(&self, session_id: &str) -> Result<bool, RepositoryError> {
        let mut store = self.sessions.lock()?;
        Ok(store.remove(session_id).is_some())
    }

    /// Remove records created before `cutoff` (a storage timestamp), returning how many
    pub async fn prune_older_than(&self, cutoff: &str) -> Result<usize, RepositoryError> {
        let mut store = self.sessions.lock()?;
        let before = store.len();
        store.retain(|_, record| record.created_at.as_str() >= cutoff);
        Ok(before - store.len())
    }

    /// Number of stored sessions
    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.sessions.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }
}
