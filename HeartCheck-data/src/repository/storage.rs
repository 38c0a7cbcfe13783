use rusqlite::OptionalExtension;
use tracing::debug;

use crate::models::session::SessionRecord;
use crate::database::DatabasePool;
use super::errors::RepositoryError;

/// Database storage operations for session results
pub struct DatabaseStorage;

impl DatabaseStorage {
    /// Insert or replace the record for a session
    pub async fn store(pool: &DatabasePool, record: &SessionRecord) -> Result<(), RepositoryError> {
        debug!("Storing session result in database: session_id={}", record.session_id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                conn.execute(
                    "INSERT OR REPLACE INTO session_results
                     (session_id, name, result_json, created_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    (
                        &record.session_id,
                        &record.name,
                        &record.result_json,
                        &record.created_at,
                    ),
                )?;

                Ok(())
            },
        }
    }

    /// Get the record for a session
    pub async fn get(pool: &DatabasePool, session_id: &str) -> Result<Option<SessionRecord>, RepositoryError> {
        debug!("Getting session result from database: session_id={}", session_id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let record = conn.query_row(
                    "SELECT session_id, name, result_json, created_at
                     FROM session_results WHERE session_id = ?1",
                    [session_id],
                    |row| {
                        Ok(SessionRecord {
                            session_id: row.get(0)?,
                            name: row.get(1)?,
                            result_json: row.get(2)?,
                            created_at: row.get(3)?,
                        })
                    },
                ).optional()?;

                Ok(record)
            },
        }
    }

    /// Delete the record for a session
    pub async fn delete(pool: &DatabasePool, session_id: &str) -> Result<bool, RepositoryError> {
        debug!("Deleting session result from database: session_id={}", session_id);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;
                let affected = conn.execute(
                    "DELETE FROM session_results WHERE session_id = ?1",
                    [session_id],
                )?;

                Ok(affected > 0)
            },
        }
    }

    /// Delete records created before `cutoff` (a storage timestamp)
    pub async fn prune_older_than(pool: &DatabasePool, cutoff: &str) -> Result<usize, RepositoryError> {
        debug!("Pruning session results created before {}", cutoff);

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;
                let affected = conn.execute(
                    "DELETE FROM session_results WHERE created_at < ?1",
                    [cutoff],
                )?;

                Ok(affected)
            },
        }
    }
}
