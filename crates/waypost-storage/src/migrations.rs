//! Database schema migrations.
//!
//! Applies the initial schema: the `entries` table and the
//! `schema_migrations` tracking table.

use rusqlite::Connection;
use tracing::info;

use waypost_core::error::WaypostError;

/// Run all pending database migrations.
///
/// Every statement is `IF NOT EXISTS`, so databases created before
/// migration tracking existed are adopted as-is.
pub fn run_migrations(conn: &Connection) -> Result<(), WaypostError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| WaypostError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| WaypostError::Storage(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: entries");
    }

    Ok(())
}

/// Version 1: tag-to-URL entries.
fn apply_v1(conn: &Connection) -> Result<(), WaypostError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS entries (
            id      INTEGER PRIMARY KEY AUTOINCREMENT,
            tag     TEXT UNIQUE,
            url     TEXT
        );

        INSERT OR IGNORE INTO schema_migrations (version, name) VALUES (1, 'entries');
        ",
    )
    .map_err(|e| WaypostError::Storage(format!("Migration v1 failed: {}", e)))?;
    Ok(())
}
