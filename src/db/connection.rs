// src/db/connection.rs
//
// Database connection management
//
// - Explicit connection pooling
// - No hidden connection creation
// - Thread-safe access

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;

use crate::config::CatalogConfig;
use crate::error::{AppError, AppResult};

/// Type alias for connection pool
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled connection
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Create a connection pool
///
/// - SQLite in WAL mode so readers do not block the recompute writer
/// - Busy timeout set to avoid immediate SQLITE_BUSY errors
pub fn create_connection_pool(config: &CatalogConfig) -> AppResult<ConnectionPool> {
    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    build_pool(&config.database_path, config.pool_size, config.busy_timeout_ms)
}

fn build_pool(path: &Path, max_size: u32, busy_timeout_ms: u64) -> AppResult<ConnectionPool> {
    let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
        conn.execute_batch(&format!(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = {};",
            busy_timeout_ms
        ))
    });

    Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| AppError::Other(format!("Failed to create connection pool: {}", e)))
}

/// Get a connection from the pool
///
/// This is a convenience wrapper that provides better error messages.
pub fn get_connection(pool: &ConnectionPool) -> AppResult<PooledConn> {
    pool.get()
        .map_err(|e| AppError::Other(format!("Failed to get database connection: {}", e)))
}

/// Create a standalone in-memory connection (for schema tests)
pub fn create_test_connection() -> AppResult<Connection> {
    Connection::open_in_memory().map_err(AppError::Database)
}

/// Pooled database in a temp directory with the schema applied
#[cfg(test)]
pub(crate) fn create_test_pool() -> (tempfile::TempDir, std::sync::Arc<ConnectionPool>) {
    let dir = tempfile::TempDir::new().unwrap();
    let config = CatalogConfig {
        database_path: dir.path().join("catalog.db"),
        pool_size: 4,
        ..CatalogConfig::default()
    };

    let pool = create_connection_pool(&config).unwrap();
    crate::db::initialize_database(&pool.get().unwrap()).unwrap();

    (dir, std::sync::Arc::new(pool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_connection_pool_creation() {
        let dir = TempDir::new().unwrap();
        let config = CatalogConfig {
            database_path: dir.path().join("nested").join("catalog.db"),
            pool_size: 2,
            ..CatalogConfig::default()
        };

        let pool = create_connection_pool(&config).unwrap();
        let conn = get_connection(&pool).unwrap();

        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
        assert!(config.database_path.exists());
    }

    #[test]
    fn test_test_connection() {
        let conn = create_test_connection().unwrap();
        let result: i32 = conn
            .query_row("SELECT 1 + 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(result, 2);
    }
}
