//! Parsing of exported CSV documents.
//!
//! Used to restore an export into a store, and doubles as the reader that
//! proves an exported document is well formed.

use serde::Deserialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use emogo_types::{NewLocation, NewQuestionnaire, NewVlog, RecordKind};

use crate::error::{Result, StorageError};

/// A validated record read back from CSV, with its original metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    /// The `ID` column as exported.
    pub source_id: i64,
    /// The `Timestamp` column as exported.
    pub captured_at: OffsetDateTime,
    pub record: ParsedRecord,
}

/// The record payload of a [`ParsedRow`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedRecord {
    Questionnaire(NewQuestionnaire),
    Location(NewLocation),
    Vlog(NewVlog),
}

#[derive(Debug, Deserialize)]
struct QuestionnaireRow {
    #[serde(rename = "ID")]
    id: i64,
    #[serde(rename = "Sentiment")]
    sentiment: String,
    #[serde(rename = "Mood")]
    mood: String,
    #[serde(rename = "Energy")]
    energy: i64,
    #[serde(rename = "Timestamp")]
    timestamp: String,
}

#[derive(Debug, Deserialize)]
struct LocationRow {
    #[serde(rename = "ID")]
    id: i64,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "Accuracy")]
    accuracy: Option<f64>,
    #[serde(rename = "Timestamp")]
    timestamp: String,
}

#[derive(Debug, Deserialize)]
struct VlogRow {
    #[serde(rename = "ID")]
    id: i64,
    #[serde(rename = "Filename")]
    filename: String,
    #[serde(rename = "URI")]
    uri: String,
    #[serde(rename = "Duration")]
    duration: f64,
    #[serde(rename = "Timestamp")]
    timestamp: String,
}

/// Parse an exported CSV document of the given kind.
///
/// Returns the rows that validated plus one message per rejected row
/// (line number and reason). A missing or wrong header fails the whole
/// document.
pub fn parse_csv(kind: RecordKind, data: &str) -> Result<(Vec<ParsedRow>, Vec<String>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data.as_bytes());

    let found = reader
        .headers()?
        .iter()
        .collect::<Vec<_>>()
        .join(",");
    if found != kind.csv_header() {
        return Err(StorageError::HeaderMismatch {
            expected: kind.csv_header(),
            found,
        });
    }

    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for (index, record) in reader.records().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let parsed = record
            .map_err(|e| e.to_string())
            .and_then(|record| parse_record(kind, &record));
        match parsed {
            Ok(row) => rows.push(row),
            Err(reason) => errors.push(format!("line {line}: {reason}")),
        }
    }

    Ok((rows, errors))
}

fn parse_record(
    kind: RecordKind,
    record: &csv::StringRecord,
) -> std::result::Result<ParsedRow, String> {
    let headers = csv::StringRecord::from(kind.csv_header().split(',').collect::<Vec<_>>());

    match kind {
        RecordKind::Questionnaire => {
            let row: QuestionnaireRow = record
                .deserialize(Some(&headers))
                .map_err(|e| e.to_string())?;
            let draft = NewQuestionnaire::parse(&row.sentiment, &row.mood, Some(row.energy))
                .map_err(|e| e.to_string())?;
            Ok(ParsedRow {
                source_id: row.id,
                captured_at: parse_timestamp(&row.timestamp)?,
                record: ParsedRecord::Questionnaire(draft),
            })
        }
        RecordKind::Location => {
            let row: LocationRow = record
                .deserialize(Some(&headers))
                .map_err(|e| e.to_string())?;
            let draft = NewLocation::new(row.latitude, row.longitude, row.accuracy)
                .map_err(|e| e.to_string())?;
            Ok(ParsedRow {
                source_id: row.id,
                captured_at: parse_timestamp(&row.timestamp)?,
                record: ParsedRecord::Location(draft),
            })
        }
        RecordKind::Vlog => {
            let row: VlogRow = record
                .deserialize(Some(&headers))
                .map_err(|e| e.to_string())?;
            let draft =
                NewVlog::new(row.filename, row.uri, row.duration).map_err(|e| e.to_string())?;
            Ok(ParsedRow {
                source_id: row.id,
                captured_at: parse_timestamp(&row.timestamp)?,
                record: ParsedRecord::Vlog(draft),
            })
        }
    }
}

fn parse_timestamp(value: &str) -> std::result::Result<OffsetDateTime, String> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| format!("invalid timestamp '{value}': {e}"))
}
