use rusqlite::Connection;
use tracing::info;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    info!("Running SQLite migrations");

    create_session_results_table(conn)?;
    create_session_results_index(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the session results table
fn create_session_results_table(conn: &Connection) -> Result<(), String> {
    info!("Creating session_results table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS session_results (
            session_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            result_json TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    ).map_err(|e| e.to_string())?;

    Ok(())
}

/// Create index on created_at used when pruning expired sessions
fn create_session_results_index(conn: &Connection) -> Result<(), String> {
    info!("Creating index on created_at");

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_session_results_created_at
        ON session_results (created_at DESC)",
        [],
    ).map_err(|e| format!("Failed to create index: {}", e))?;

    Ok(())
}
