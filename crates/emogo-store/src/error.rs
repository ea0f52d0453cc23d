//! Error types for emogo-store.

use std::path::PathBuf;
use std::time::Duration;

/// Result type for emogo-store storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors raised by the record store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to create database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Opening the database did not finish in time.
    #[error("Timed out after {0:?} opening the database")]
    OpenTimeout(Duration),

    /// Database schema is newer than this build understands.
    #[error("Database schema version {found} is newer than supported version {supported}")]
    SchemaTooNew { found: i32, supported: i32 },

    /// A stored timestamp is outside the representable range.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(i64),

    /// A stored row could not be mapped back to a record.
    #[error("Invalid {table} row {id}: {reason}")]
    InvalidRow {
        table: &'static str,
        id: i64,
        reason: String,
    },

    /// A CSV document could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A CSV document does not carry the expected header.
    #[error("Unexpected CSV header: expected '{expected}', found '{found}'")]
    HeaderMismatch {
        expected: &'static str,
        found: String,
    },

    /// The blocking task running a storage call panicked or was cancelled.
    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Errors raised while exporting records to CSV files.
///
/// A failed export may leave files for kinds that were already written.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Reading the records failed.
    #[error("Export failed reading records: {0}")]
    Storage(#[from] StorageError),

    /// Writing an export file failed.
    #[error("Export failed writing {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A timestamp could not be formatted.
    #[error("Export failed formatting timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}
