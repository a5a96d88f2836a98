//! SQLite handle shared by every request.
//!
//! One connection behind a mutex; WAL journaling and a busy timeout so a
//! second process on the same file waits instead of failing.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::Connection;
use tracing::info;

use waypost_core::error::WaypostError;

use crate::migrations;

/// How long a writer waits on a lock held by another connection.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Mutex-guarded rusqlite connection.
///
/// Tag uniqueness is enforced by the schema, not by the lock.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open the database file at `path`, creating it and its parent
    /// directories if needed, then apply pending migrations.
    pub fn new(path: &Path) -> Result<Self, WaypostError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| WaypostError::Storage(format!("Failed to open database: {}", e)))?;

        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| WaypostError::Storage(format!("Failed to set busy timeout: {}", e)))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| WaypostError::Storage(format!("Failed to set pragmas: {}", e)))?;

        info!(path = %path.display(), "Database ready");

        Self::with_migrations(conn)
    }

    /// Fresh private database that lives as long as the handle.
    pub fn in_memory() -> Result<Self, WaypostError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| WaypostError::Storage(format!("Failed to open in-memory db: {}", e)))?;

        Self::with_migrations(conn)
    }

    fn with_migrations(conn: Connection) -> Result<Self, WaypostError> {
        let database = Self {
            conn: Mutex::new(conn),
        };
        database.with_conn(migrations::run_migrations)?;
        Ok(database)
    }

    /// Run `f` with the connection locked.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, WaypostError>
    where
        F: FnOnce(&Connection) -> Result<T, WaypostError>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| WaypostError::Storage(format!("Database lock poisoned: {}", e)))?;
        f(&guard)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}
