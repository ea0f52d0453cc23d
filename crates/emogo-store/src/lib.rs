//! Local persistence for emogo check-ins.
//!
//! This crate provides SQLite-based storage for the three record kinds a
//! check-in produces (questionnaires, GPS fixes and vlog clip metadata),
//! plus the summary counts and CSV export built on top of it.
//!
//! # Features
//!
//! - Insert and list records, most recent first
//! - Per-kind counts and a combined summary
//! - Atomic clear of every kind
//! - CSV export (one file per non-empty kind) with an optional share step
//! - CSV import of a previous export
//!
//! # Example
//!
//! ```no_run
//! use emogo_store::{Exporter, RecordStore, DEFAULT_OPEN_TIMEOUT};
//! use emogo_types::NewLocation;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let path = emogo_store::default_db_path();
//! let store = RecordStore::global(&path, Some(DEFAULT_OPEN_TIMEOUT)).await?;
//! store.insert_location(NewLocation::new(25.033, 121.5654, Some(8.0))?).await?;
//!
//! let report = Exporter::new(emogo_store::default_export_dir())
//!     .export_all(&store)
//!     .await?;
//! println!("wrote {} files", report.files.len());
//! # Ok(())
//! # }
//! ```

mod error;
mod export;
mod handle;
mod import;
mod models;
mod schema;
mod store;

pub use error::{ExportError, Result, StorageError};
pub use export::{
    ExportReport, Exporter, ShareTarget, file_stamp, location_csv, questionnaire_csv, vlog_csv,
};
pub use handle::{DEFAULT_OPEN_TIMEOUT, RecordStore};
pub use import::{ParsedRecord, ParsedRow, parse_csv};
pub use models::{
    ImportResult, LocationRecord, QuestionnaireRecord, Summary, SummaryReport, VlogRecord,
};
pub use schema::SCHEMA_VERSION;
pub use store::Store;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/emogo/emogo.db`
/// - macOS: `~/Library/Application Support/emogo/emogo.db`
/// - Windows: `C:\Users\<user>\AppData\Local\emogo\emogo.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("emogo")
        .join("emogo.db")
}

/// Default directory for CSV exports (`~/Documents/emogo` where available).
pub fn default_export_dir() -> std::path::PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("emogo")
}

/// Default directory for recorded vlog clips.
pub fn default_media_dir() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("emogo")
        .join("media")
}
