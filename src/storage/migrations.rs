//! Database migrations for cadence.
//!
//! Each migration is a function that upgrades the schema by one version.
//! Migrations are run automatically when the database is opened.

use rusqlite::Connection;

use crate::error::CadenceError;

/// Current schema version.
const CURRENT_VERSION: i32 = 1;

/// Get the current schema version from the database.
///
/// Returns 0 if no version has been set (new database).
///
/// # Errors
///
/// Returns an error if the version pragma cannot be read.
pub fn get_version(conn: &Connection) -> Result<i32, CadenceError> {
    let version: i32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| CadenceError::Database(format!("Failed to get schema version: {e}")))?;

    Ok(version)
}

/// Set the schema version in the database.
fn set_version(conn: &Connection, version: i32) -> Result<(), CadenceError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| CadenceError::Database(format!("Failed to set schema version: {e}")))
}

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub fn run(conn: &Connection) -> Result<(), CadenceError> {
    let current = get_version(conn)?;

    if current >= CURRENT_VERSION {
        return Ok(());
    }

    for version in (current + 1)..=CURRENT_VERSION {
        run_migration(conn, version)?;
        set_version(conn, version)?;
    }

    Ok(())
}

/// Run a specific migration.
fn run_migration(conn: &Connection, version: i32) -> Result<(), CadenceError> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(CadenceError::Database(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: focus session history.
fn migrate_v1(conn: &Connection) -> Result<(), CadenceError> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS focus_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            task_ref TEXT,
            session_type TEXT NOT NULL,
            sequence_number INTEGER NOT NULL DEFAULT 1,
            duration_seconds INTEGER NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,
            started_at TEXT NOT NULL,
            ended_at TEXT,
            paused_at TEXT,
            paused_seconds INTEGER NOT NULL DEFAULT 0,
            payload TEXT NOT NULL DEFAULT '{}'
        );

        CREATE INDEX IF NOT EXISTS idx_focus_sessions_user_active
            ON focus_sessions(user_id, ended_at);
        CREATE INDEX IF NOT EXISTS idx_focus_sessions_user_started
            ON focus_sessions(user_id, started_at);
        ",
    )
    .map_err(|e| CadenceError::Database(format!("Migration v1 failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();
        assert_eq!(get_version(&conn).unwrap(), CURRENT_VERSION);
    }
}
