use chrono::{DateTime, Utc};
use tracing::{debug, error};
use async_trait::async_trait;

use crate::models::session::{storage_timestamp, SessionRecord};
use crate::database::get_db_pool;
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::DatabaseStorage;

/// Repository trait for per-session analysis results
#[async_trait]
pub trait SessionRepositoryTrait {
    /// Store the latest result for a session, replacing any previous one
    async fn save(&self, session_id: &str, name: &str, result_json: String) -> Result<SessionRecord, RepositoryError>;

    /// Get the stored result for a session
    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, RepositoryError>;

    /// Remove the stored result for a session
    async fn delete(&self, session_id: &str) -> Result<bool, RepositoryError>;

    /// Remove every result stored before `cutoff`, returning how many were removed
    async fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, RepositoryError>;
}

/// Repository for session results.
/// Uses the SQLite pool when it has been initialized and falls back to
/// process-local memory otherwise.
#[derive(Debug, Clone, Default)]
pub struct SessionRepository {
    /// In-memory storage for when database is not available
    storage: InMemoryStorage,
}

impl SessionRepository {
    /// Create a new repository
    pub fn new() -> Self {
        Self {
            storage: InMemoryStorage::new(),
        }
    }
}

#[async_trait]
impl SessionRepositoryTrait for SessionRepository {
    async fn save(&self, session_id: &str, name: &str, result_json: String) -> Result<SessionRecord, RepositoryError> {
        let record = SessionRecord {
            session_id: session_id.to_string(),
            name: name.to_string(),
            result_json,
            created_at: storage_timestamp(Utc::now()),
        };

        match get_db_pool() {
            Ok(pool) => match DatabaseStorage::store(&pool, &record).await {
                Ok(()) => Ok(record),
                Err(e) => {
                    error!("Failed to store session result in database: {}", e);
                    self.storage.store(&record).await
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                self.storage.store(&record).await
            }
        }
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, RepositoryError> {
        match get_db_pool() {
            Ok(pool) => match DatabaseStorage::get(&pool, session_id).await {
                // A result may have landed in memory during a database outage
                Ok(None) => self.storage.get(session_id).await,
                Ok(record) => Ok(record),
                Err(e) => {
                    error!("Failed to get session result from database: {}", e);
                    self.storage.get(session_id).await
                }
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for get", e);
                self.storage.get(session_id).await
            }
        }
    }

    async fn delete(&self, session_id: &str) -> Result<bool, RepositoryError> {
        let in_memory = self.storage.delete(session_id).await?;

        match get_db_pool() {
            Ok(pool) => {
                let in_database = DatabaseStorage::delete(&pool, session_id).await?;
                Ok(in_memory || in_database)
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for delete", e);
                Ok(in_memory)
            }
        }
    }

    async fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, RepositoryError> {
        let cutoff = storage_timestamp(cutoff);
        let in_memory = self.storage.prune_older_than(&cutoff).await?;

        match get_db_pool() {
            Ok(pool) => {
                let in_database = DatabaseStorage::prune_older_than(&pool, &cutoff).await?;
                Ok(in_memory + in_database)
            },
            Err(_) => Ok(in_memory),
        }
    }
}

/// Mock session repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock implementation of SessionRepository for testing
    #[derive(Default)]
    pub struct MockSessionRepository {
        records: Mutex<HashMap<String, SessionRecord>>,
        should_fail: bool,
    }

    impl MockSessionRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock repository whose every call fails
        pub fn failing() -> Self {
            Self {
                records: Mutex::new(HashMap::new()),
                should_fail: true,
            }
        }

        fn check(&self) -> Result<(), RepositoryError> {
            if self.should_fail {
                Err(RepositoryError::Lock("mock repository is configured to fail".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl SessionRepositoryTrait for MockSessionRepository {
        async fn save(&self, session_id: &str, name: &str, result_json: String) -> Result<SessionRecord, RepositoryError> {
            self.check()?;
            let record = SessionRecord {
                session_id: session_id.to_string(),
                name: name.to_string(),
                result_json,
                created_at: storage_timestamp(Utc::now()),
            };
            self.records.lock()?.insert(session_id.to_string(), record.clone());
            Ok(record)
        }

        async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, RepositoryError> {
            self.check()?;
            Ok(self.records.lock()?.get(session_id).cloned())
        }

        async fn delete(&self, session_id: &str) -> Result<bool, RepositoryError> {
            self.check()?;
            Ok(self.records.lock()?.remove(session_id).is_some())
        }

        async fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, RepositoryError> {
            self.check()?;
            let cutoff = storage_timestamp(cutoff);
            let mut records = self.records.lock()?;
            let before = records.len();
            records.retain(|_, record| record.created_at >= cutoff);
            Ok(before - records.len())
        }
    }
}
