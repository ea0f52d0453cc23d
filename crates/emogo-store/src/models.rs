//! Data models for stored records.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use emogo_types::{Energy, Mood, RecordKind, Sentiment};

/// A questionnaire stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionnaireRecord {
    /// Database row ID.
    pub id: i64,
    /// Overall sentiment.
    pub sentiment: Sentiment,
    /// Mood label.
    pub mood: Mood,
    /// Energy level (1-10).
    pub energy: Energy,
    /// When this record was captured.
    #[serde(with = "time::serde::rfc3339")]
    pub captured_at: OffsetDateTime,
}

/// A GPS fix stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Database row ID.
    pub id: i64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Horizontal accuracy in meters, if the device reported one.
    pub accuracy: Option<f64>,
    /// When this record was captured.
    #[serde(with = "time::serde::rfc3339")]
    pub captured_at: OffsetDateTime,
}

/// Vlog clip metadata stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VlogRecord {
    /// Database row ID.
    pub id: i64,
    /// Clip file name.
    pub filename: String,
    /// Local reference to the clip file.
    pub file_uri: String,
    /// Clip length in seconds.
    pub duration_seconds: f64,
    /// When this record was captured.
    #[serde(with = "time::serde::rfc3339")]
    pub captured_at: OffsetDateTime,
}

/// Point-in-time record counts per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub questionnaire_count: u64,
    pub location_count: u64,
    pub vlog_count: u64,
}

impl Summary {
    /// Count for one kind.
    pub fn get(&self, kind: RecordKind) -> u64 {
        match kind {
            RecordKind::Questionnaire => self.questionnaire_count,
            RecordKind::Location => self.location_count,
            RecordKind::Vlog => self.vlog_count,
        }
    }

    /// Set the count for one kind.
    pub fn set(&mut self, kind: RecordKind, count: u64) {
        match kind {
            RecordKind::Questionnaire => self.questionnaire_count = count,
            RecordKind::Location => self.location_count = count,
            RecordKind::Vlog => self.vlog_count = count,
        }
    }

    /// Sum over all kinds.
    pub fn total(&self) -> u64 {
        self.questionnaire_count + self.location_count + self.vlog_count
    }
}

/// A best-effort summary that also lists the kinds whose count failed.
///
/// Failed kinds are reported as zero in `summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryReport {
    pub summary: Summary,
    pub failed: Vec<(RecordKind, String)>,
}

impl SummaryReport {
    /// Whether every count was read successfully.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Outcome of a CSV import.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportResult {
    /// Data rows found in the document.
    pub total: usize,
    /// Rows inserted.
    pub imported: usize,
    /// One message per rejected row.
    pub errors: Vec<String>,
}
