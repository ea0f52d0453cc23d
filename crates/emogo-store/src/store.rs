//! Main store implementation.

use std::path::Path;

use rusqlite::{Connection, params};
use time::OffsetDateTime;
use tracing::{debug, info};

use emogo_types::{Energy, NewLocation, NewQuestionnaire, NewVlog, RecordKind};

use crate::error::{Result, StorageError};
use crate::import::{ParsedRecord, ParsedRow, parse_csv};
use crate::models::{ImportResult, LocationRecord, QuestionnaireRecord, Summary, VlogRecord};
use crate::schema;

/// SQLite-based store for questionnaires, locations and vlog metadata.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        info!("Opening database at {}", path.display());
        let mut conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        schema::initialize(&mut conn)?;

        Ok(Self { conn })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        schema::initialize(&mut conn)?;
        Ok(Self { conn })
    }

    /// Ensure all tables exist. Repeated calls are no-ops.
    pub fn initialize(&mut self) -> Result<()> {
        schema::initialize(&mut self.conn)
    }

    /// Count rows of one kind.
    pub fn count(&self, kind: RecordKind) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", kind.table());
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Count every kind from one consistent snapshot.
    pub fn summary(&self) -> Result<Summary> {
        let tx = self.conn.unchecked_transaction()?;
        let mut summary = Summary::default();
        for kind in RecordKind::ALL {
            let sql = format!("SELECT COUNT(*) FROM {}", kind.table());
            let count: i64 = tx.query_row(&sql, [], |row| row.get(0))?;
            summary.set(kind, count as u64);
        }
        tx.commit()?;
        Ok(summary)
    }

    #[cfg(test)]
    pub(crate) fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Delete every record of every kind in a single transaction.
    ///
    /// Returns how many rows of each kind were removed. Vlog clip files are
    /// left on disk.
    pub fn clear_all(&mut self) -> Result<Summary> {
        let tx = self.conn.transaction()?;
        let mut removed = Summary::default();
        for kind in RecordKind::ALL {
            let deleted = tx.execute(&format!("DELETE FROM {}", kind.table()), [])?;
            removed.set(kind, deleted as u64);
        }
        tx.commit()?;

        info!(
            "Cleared {} questionnaires, {} locations, {} vlogs",
            removed.questionnaire_count, removed.location_count, removed.vlog_count
        );
        Ok(removed)
    }

    /// Import an exported CSV document of one kind.
    ///
    /// Rows that fail validation are reported in the result and skipped;
    /// the valid ones are inserted in one transaction with their original
    /// capture time and a fresh id.
    pub fn import_csv(&mut self, kind: RecordKind, data: &str) -> Result<ImportResult> {
        let (rows, errors) = parse_csv(kind, data)?;
        let total = rows.len() + errors.len();

        let tx = self.conn.transaction()?;
        for row in &rows {
            insert_parsed(&tx, row)?;
        }
        tx.commit()?;

        info!("Imported {} of {} {} rows", rows.len(), total, kind);
        Ok(ImportResult {
            total,
            imported: rows.len(),
            errors,
        })
    }
}

// Questionnaire operations
impl Store {
    /// Insert a questionnaire, stamped with the current time.
    pub fn insert_questionnaire(&self, draft: &NewQuestionnaire) -> Result<i64> {
        insert_questionnaire_at(&self.conn, draft, OffsetDateTime::now_utc())
    }

    /// All questionnaires, most recent first.
    pub fn list_questionnaires(&self) -> Result<Vec<QuestionnaireRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, sentiment, mood, energy, timestamp
             FROM questionnaire ORDER BY timestamp DESC, id DESC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, sentiment, mood, energy, timestamp)| {
                let invalid = |reason: String| StorageError::InvalidRow {
                    table: "questionnaire",
                    id,
                    reason,
                };
                Ok(QuestionnaireRecord {
                    id,
                    sentiment: sentiment.parse().map_err(|e| invalid(format!("{e}")))?,
                    mood: mood.parse().map_err(|e| invalid(format!("{e}")))?,
                    energy: Energy::try_from(energy).map_err(|e| invalid(format!("{e}")))?,
                    captured_at: from_millis(timestamp)?,
                })
            })
            .collect()
    }
}

// Location operations
impl Store {
    /// Insert a GPS fix, stamped with the current time.
    pub fn insert_location(&self, draft: &NewLocation) -> Result<i64> {
        insert_location_at(&self.conn, draft, OffsetDateTime::now_utc())
    }

    /// All GPS fixes, most recent first.
    pub fn list_locations(&self) -> Result<Vec<LocationRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, latitude, longitude, accuracy, timestamp
             FROM location ORDER BY timestamp DESC, id DESC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, Option<f64>>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, latitude, longitude, accuracy, timestamp)| {
                Ok(LocationRecord {
                    id,
                    latitude,
                    longitude,
                    accuracy,
                    captured_at: from_millis(timestamp)?,
                })
            })
            .collect()
    }
}

// Vlog operations
impl Store {
    /// Insert vlog metadata, stamped with the current time.
    pub fn insert_vlog(&self, draft: &NewVlog) -> Result<i64> {
        insert_vlog_at(&self.conn, draft, OffsetDateTime::now_utc())
    }

    /// All vlog metadata, most recent first.
    pub fn list_vlogs(&self) -> Result<Vec<VlogRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, filename, uri, duration, timestamp
             FROM vlog ORDER BY timestamp DESC, id DESC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, filename, file_uri, duration_seconds, timestamp)| {
                Ok(VlogRecord {
                    id,
                    filename,
                    file_uri,
                    duration_seconds,
                    captured_at: from_millis(timestamp)?,
                })
            })
            .collect()
    }
}

fn insert_questionnaire_at(
    conn: &Connection,
    draft: &NewQuestionnaire,
    captured_at: OffsetDateTime,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO questionnaire (sentiment, mood, energy, timestamp) VALUES (?1, ?2, ?3, ?4)",
        params![
            draft.sentiment.label(),
            draft.mood.label(),
            i64::from(draft.energy),
            to_millis(captured_at),
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!("Inserted questionnaire {}", id);
    Ok(id)
}

fn insert_location_at(
    conn: &Connection,
    draft: &NewLocation,
    captured_at: OffsetDateTime,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO location (latitude, longitude, accuracy, timestamp) VALUES (?1, ?2, ?3, ?4)",
        params![
            draft.latitude,
            draft.longitude,
            draft.accuracy,
            to_millis(captured_at),
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!("Inserted location {}", id);
    Ok(id)
}

fn insert_vlog_at(conn: &Connection, draft: &NewVlog, captured_at: OffsetDateTime) -> Result<i64> {
    conn.execute(
        "INSERT INTO vlog (filename, uri, duration, timestamp) VALUES (?1, ?2, ?3, ?4)",
        params![
            draft.filename,
            draft.file_uri,
            draft.duration_seconds,
            to_millis(captured_at),
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!("Inserted vlog {}", id);
    Ok(id)
}

fn insert_parsed(conn: &Connection, row: &ParsedRow) -> Result<i64> {
    match &row.record {
        ParsedRecord::Questionnaire(draft) => insert_questionnaire_at(conn, draft, row.captured_at),
        ParsedRecord::Location(draft) => insert_location_at(conn, draft, row.captured_at),
        ParsedRecord::Vlog(draft) => insert_vlog_at(conn, draft, row.captured_at),
    }
}

/// Timestamps are stored as Unix milliseconds.
fn to_millis(at: OffsetDateTime) -> i64 {
    (at.unix_timestamp_nanos() / 1_000_000) as i64
}

fn from_millis(millis: i64) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .map_err(|_| StorageError::InvalidTimestamp(millis))
}
