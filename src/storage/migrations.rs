/// Database migration management
///
/// This module handles creating and updating the SQLite database schema.
/// It ensures the database has all the required tables and indexes.

use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension};
use crate::domain::LOCAL_USER_ID;
use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when you add new migrations
pub const CURRENT_VERSION: i32 = 2;

/// Initialize the database schema
///
/// This creates all required tables and indexes if they don't exist and
/// upgrades older databases step by step.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version = get_current_version(conn)?;

    if current_version < CURRENT_VERSION {
        run_migrations(conn, current_version)?;
        set_version(conn, CURRENT_VERSION)?;
    } else if current_version > CURRENT_VERSION {
        return Err(StorageError::Migration(format!(
            "Database schema v{} is newer than supported v{}",
            current_version, CURRENT_VERSION
        )));
    }

    Ok(())
}

/// Get the current database schema version (0 for a fresh database)
pub fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get::<_, i32>(0)
        })
        .optional()?;

    Ok(version.unwrap_or(0))
}

fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }

    if from_version < 2 {
        migration_v2(conn)?;
    }

    Ok(())
}

/// Migration to version 1: diaries and settings tables
pub(crate) fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS diaries (
            id INTEGER PRIMARY KEY,
            date TEXT NOT NULL,
            content TEXT NOT NULL,
            images TEXT NOT NULL DEFAULT '[]',
            weather TEXT,
            sleep_start TEXT,
            sleep_end TEXT,
            sleep_hours REAL,
            personality TEXT NOT NULL,
            analysis TEXT NOT NULL
        )",
        [],
    )?;

    // Single row keyed 'default', stored as a JSON document
    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            id TEXT PRIMARY KEY,
            data TEXT NOT NULL
        )",
        [],
    )?;

    tracing::info!("Applied migration v1: Created diaries and settings tables");
    Ok(())
}

/// Migration to version 2: owner and last-write columns for sync
///
/// Existing rows are backfilled with the local user and the migration time.
fn migration_v2(conn: &Connection) -> Result<(), StorageError> {
    let tx = conn.unchecked_transaction()?;

    tx.execute(
        &format!(
            "ALTER TABLE diaries ADD COLUMN user_id TEXT NOT NULL DEFAULT '{}'",
            LOCAL_USER_ID
        ),
        [],
    )?;
    tx.execute("ALTER TABLE diaries ADD COLUMN updated_at TEXT", [])?;

    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
    let backfilled = tx.execute(
        "UPDATE diaries SET updated_at = ?1 WHERE updated_at IS NULL",
        [&now],
    )?;

    tx.execute("CREATE INDEX IF NOT EXISTS idx_diaries_date ON diaries (date)", [])?;
    tx.execute("CREATE INDEX IF NOT EXISTS idx_diaries_user ON diaries (user_id)", [])?;
    tx.execute(
        "CREATE INDEX IF NOT EXISTS idx_diaries_updated_at ON diaries (updated_at)",
        [],
    )?;

    tx.commit()?;

    tracing::info!("Applied migration v2: Added user_id/updated_at ({} rows backfilled)", backfilled);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_initialize_database() {
        let conn = Connection::open_in_memory().unwrap();

        // Should succeed on a fresh database
        assert!(initialize_database(&conn).is_ok());

        // Should succeed when called again (idempotent)
        assert!(initialize_database(&conn).is_ok());

        let table_count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('diaries', 'settings')",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(table_count, 2);
        assert_eq!(get_current_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_v2_backfills_existing_rows() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE schema_version (version INTEGER PRIMARY KEY)", []).unwrap();
        migration_v1(&conn).unwrap();
        set_version(&conn, 1).unwrap();

        conn.execute(
            "INSERT INTO diaries (id, date, content, personality, analysis)
             VALUES (1, '2025-06-11', 'old entry', 'warm_companion', '{}')",
            [],
        )
        .unwrap();

        initialize_database(&conn).unwrap();

        let (user_id, updated_at): (String, Option<String>) = conn
            .query_row("SELECT user_id, updated_at FROM diaries WHERE id = 1", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(user_id, LOCAL_USER_ID);
        assert!(updated_at.is_some());
        assert_eq!(get_current_version(&conn).unwrap(), 2);

        let index_count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='index' AND name IN ('idx_diaries_date', 'idx_diaries_updated_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(index_count, 2);
    }

    #[test]
    fn test_rejects_newer_schema() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_database(&conn).unwrap();
        set_version(&conn, CURRENT_VERSION + 1).unwrap();

        assert!(matches!(initialize_database(&conn), Err(StorageError::Migration(_))));
    }
}
