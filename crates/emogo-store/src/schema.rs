//! Database schema and migrations.

use rusqlite::Connection;

use crate::error::{Result, StorageError};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema.
///
/// Safe to call any number of times: every statement is `IF NOT EXISTS`
/// and the whole run happens in one transaction.
pub fn initialize(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    let version = get_schema_version(&tx)?;

    if version > SCHEMA_VERSION {
        return Err(StorageError::SchemaTooNew {
            found: version,
            supported: SCHEMA_VERSION,
        });
    }

    if version == 0 {
        // Fresh database - create all tables
        create_schema_v1(&tx)?;
        set_schema_version(&tx, SCHEMA_VERSION)?;
    } else if version < SCHEMA_VERSION {
        migrate(&tx, version)?;
    }

    tx.commit()?;
    Ok(())
}

/// Get the current schema version.
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='schema_version'",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 =
        conn.query_row("SELECT version FROM schema_version", [], |row| row.get(0))?;

    Ok(version)
}

/// Set the schema version.
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?)",
        [version],
    )?;
    Ok(())
}

/// Create the initial schema (version 1).
fn create_schema_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Schema version tracking
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL
        );

        -- Sentiment questionnaires
        CREATE TABLE IF NOT EXISTS questionnaire (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sentiment TEXT NOT NULL CHECK (sentiment <> ''),
            mood TEXT NOT NULL CHECK (mood <> ''),
            energy INTEGER NOT NULL CHECK (energy BETWEEN 1 AND 10),
            timestamp INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_questionnaire_time
            ON questionnaire(timestamp);

        -- GPS fixes
        CREATE TABLE IF NOT EXISTS location (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            accuracy REAL,
            timestamp INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_location_time
            ON location(timestamp);

        -- Vlog clip metadata (the clip file itself is not managed here)
        CREATE TABLE IF NOT EXISTS vlog (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            filename TEXT NOT NULL CHECK (filename <> ''),
            uri TEXT NOT NULL CHECK (uri <> ''),
            duration REAL NOT NULL,
            timestamp INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_vlog_time
            ON vlog(timestamp);
        "#,
    )?;

    Ok(())
}

/// Run migrations from old_version to current.
fn migrate(conn: &Connection, old_version: i32) -> Result<()> {
    // Version 1 is the only schema so far; later versions add steps here.
    debug_assert!(old_version < SCHEMA_VERSION);
    set_schema_version(conn, SCHEMA_VERSION)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_initialize_fresh_database() {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&mut conn).unwrap();

        let tables = table_names(&conn);
        assert!(tables.contains(&"questionnaire".to_string()));
        assert!(tables.contains(&"location".to_string()));
        assert!(tables.contains(&"vlog".to_string()));
        assert!(tables.contains(&"schema_version".to_string()));
    }

    #[test]
    fn test_schema_version_tracking() {
        let mut conn = Connection::open_in_memory().unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), 0);

        initialize(&mut conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&mut conn).unwrap();
        let before = table_names(&conn);

        initialize(&mut conn).unwrap();
        initialize(&mut conn).unwrap();

        assert_eq!(table_names(&conn), before);
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&mut conn).unwrap();
        conn.execute("UPDATE schema_version SET version = 99", [])
            .unwrap();

        let err = initialize(&mut conn).unwrap_err();
        assert!(matches!(err, StorageError::SchemaTooNew { found: 99, .. }));
    }

    #[test]
    fn test_energy_check_constraint() {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&mut conn).unwrap();

        let result = conn.execute(
            "INSERT INTO questionnaire (sentiment, mood, energy, timestamp) \
             VALUES ('Neutral', 'Sad', 11, 0)",
            [],
        );
        assert!(result.is_err());
    }
}
