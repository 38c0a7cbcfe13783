//! Database connection module for the HeartCheck application
//!
//! Session results are persisted in SQLite through an r2d2 pool. When the
//! configured file cannot be opened the pool falls back to an in-memory
//! SQLite database so the API keeps working.

use std::env;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use once_cell::sync::OnceCell;
use tracing::{info, error, warn};

use super::migrations::run_sqlite_migrations;

/// Global database pool used throughout the application
static DB_POOL: OnceCell<DatabasePool> = OnceCell::new();

/// Database connection pool
#[derive(Debug, Clone)]
pub enum DatabasePool {
    /// SQLite connection pool
    SQLite(Arc<r2d2::Pool<r2d2_sqlite::SqliteConnectionManager>>),
}

/// Database error
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// SQLite connection pool error
    #[error("SQLite connection pool error: {0}")]
    SqlitePoolError(#[from] r2d2::Error),

    /// Database pool already initialized
    #[error("Database pool is already initialized")]
    PoolAlreadyInitialized,

    /// Database pool not initialized
    #[error("Database pool is not initialized")]
    PoolNotInitialized,

    /// Migration error
    #[error("Database migration error: {0}")]
    MigrationError(String),
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to SQLite database file
    pub sqlite_path: Option<String>,
    /// Idle connections kept open by the pool
    pub pool_size: u32,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: Some("./data/heart_check.db".to_string()),
            pool_size: 5,
            max_connections: 10,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables
    pub fn from_env() -> Self {
        let sqlite_path = env::var("DB_SQLITE_PATH").ok();

        match sqlite_path {
            Some(ref path) => info!("Using SQLite database at: {}", path),
            None => info!("No DB_SQLITE_PATH provided, will use default path: data/heart_check.db"),
        }

        let pool_size = env::var("DB_POOL_SIZE")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(5);

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(10);

        let timeout_seconds = env::var("DB_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        info!("Database configuration: pool_size={}, max_connections={}, timeout={}s",
            pool_size, max_connections, timeout_seconds);

        DatabaseConfig {
            sqlite_path,
            pool_size,
            max_connections,
            timeout_seconds,
        }
    }
}

/// Initialize the database connection pool from the environment
pub fn initialize_database_pool() -> Result<(), DatabaseError> {
    initialize_database_pool_with_config(&DatabaseConfig::from_env())
}

/// Initialize the database connection pool with an explicit configuration
pub fn initialize_database_pool_with_config(config: &DatabaseConfig) -> Result<(), DatabaseError> {
    if DB_POOL.get().is_some() {
        return Err(DatabaseError::PoolAlreadyInitialized);
    }

    let pool = initialize_sqlite_pool(config)?;

    run_migrations(&pool)?;

    DB_POOL.set(pool).map_err(|_| DatabaseError::PoolAlreadyInitialized)
}

/// Get the database connection pool
pub fn get_db_pool() -> Result<DatabasePool, DatabaseError> {
    DB_POOL.get()
        .cloned()
        .ok_or(DatabaseError::PoolNotInitialized)
}

/// Initialize SQLite connection pool
fn initialize_sqlite_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    use rusqlite::OpenFlags;
    use std::fs;
    use std::path::Path;

    let sqlite_path = config.sqlite_path.clone()
        .unwrap_or_else(|| "data/heart_check.db".to_string());

    info!("Initializing SQLite database at: {}", sqlite_path);

    if let Some(parent) = Path::new(&sqlite_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!("Creating parent directory: {:?}", parent);
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Failed to create directory: {}, falling back to in-memory database", e);
                return initialize_in_memory_sqlite_pool(config);
            }
        }
    }

    let manager = r2d2_sqlite::SqliteConnectionManager::file(&sqlite_path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE);

    match r2d2::Pool::builder()
        .max_size(config.max_connections)
        .min_idle(Some(config.pool_size.min(config.max_connections)))
        .connection_timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .build(manager) {
            Ok(pool) => match pool.get() {
                Ok(_) => {
                    info!("SQLite connection pool created successfully");
                    Ok(DatabasePool::SQLite(Arc::new(pool)))
                },
                Err(e) => {
                    error!("Failed to connect to SQLite database: {}", e);
                    warn!("Falling back to in-memory SQLite database");
                    initialize_in_memory_sqlite_pool(config)
                }
            },
            Err(e) => {
                error!("Failed to create SQLite connection pool: {}", e);
                warn!("Falling back to in-memory SQLite database");
                initialize_in_memory_sqlite_pool(config)
            }
        }
}

/// Initialize an in-memory SQLite database as fallback
///
/// Each in-memory connection is its own database, so the pool is capped
/// at a single connection.
fn initialize_in_memory_sqlite_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!("Initializing in-memory SQLite database");

    let manager = r2d2_sqlite::SqliteConnectionManager::memory();

    let pool = r2d2::Pool::builder()
        .max_size(1)
        .connection_timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .build(manager)?;

    info!("In-memory SQLite database initialized successfully");
    Ok(DatabasePool::SQLite(Arc::new(pool)))
}

/// Run database migrations against a freshly built pool
fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    info!("Running database migrations");

    match pool {
        DatabasePool::SQLite(pool) => {
            let conn = pool.get()?;
            run_sqlite_migrations(&conn).map_err(DatabaseError::MigrationError)?;
        },
    }

    info!("Database migrations completed successfully");
    Ok(())
}

/// Snapshot of the pool backing session storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    /// File behind the main database, `None` for an in-memory database
    pub path: Option<String>,
    pub connections: u32,
    pub idle_connections: u32,
}

impl ConnectionInfo {
    /// Results stored here are lost when the process exits
    pub fn is_in_memory(&self) -> bool {
        self.path.is_none()
    }
}

impl fmt::Display for ConnectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "SQLite database at {}", path)?,
            None => write!(f, "SQLite in-memory database")?,
        }
        write!(f, " (connections: active={}, idle={})", self.connections, self.idle_connections)
    }
}

/// Describe a pool by asking SQLite where its main database lives
pub fn describe_pool(pool: &DatabasePool) -> Result<ConnectionInfo, DatabaseError> {
    match pool {
        DatabasePool::SQLite(pool) => {
            let conn = pool.get()?;
            let file: String = conn.query_row(
                "SELECT file FROM pragma_database_list WHERE name = 'main'",
                [],
                |row| row.get(0),
            )?;

            let state = pool.state();
            Ok(ConnectionInfo {
                path: if file.is_empty() || file == ":memory:" { None } else { Some(file) },
                connections: state.connections,
                idle_connections: state.idle_connections,
            })
        },
    }
}

/// Get information about the global pool, `None` when it was never initialized
pub fn get_connection_info() -> Option<Result<ConnectionInfo, DatabaseError>> {
    let pool = DB_POOL.get()?;
    let info = describe_pool(pool);
    if let Err(e) = &info {
        error!("Failed to describe SQLite database: {}", e);
    }
    Some(info)
}
