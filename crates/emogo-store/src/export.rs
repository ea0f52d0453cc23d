//! CSV export of stored records.
//!
//! One file per non-empty kind, named `<kind>_<stamp>.csv`. Strings are
//! always quoted, numbers never are, and rows run most recent first.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing::{debug, info, warn};

use emogo_types::RecordKind;

use crate::error::{ExportError, StorageError};
use crate::handle::RecordStore;
use crate::models::{LocationRecord, QuestionnaireRecord, Summary, VlogRecord};

/// Something that can hand an exported file to the user (share sheet,
/// mail client, upload command...).
#[async_trait]
pub trait ShareTarget: Send + Sync {
    /// Whether sharing is possible right now.
    fn is_available(&self) -> bool {
        true
    }

    /// Offer one exported file.
    async fn share(&self, path: &Path) -> std::io::Result<()>;
}

/// Outcome of an export.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExportReport {
    /// Rows exported per kind.
    pub summary: Summary,
    /// Files written, in export order.
    pub files: Vec<PathBuf>,
}

/// Writes CSV exports into one directory.
pub struct Exporter {
    dir: PathBuf,
    share: Option<Arc<dyn ShareTarget>>,
}

impl Exporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            share: None,
        }
    }

    /// Offer every written file to `target`.
    pub fn with_share(mut self, target: Arc<dyn ShareTarget>) -> Self {
        self.share = Some(target);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Export every non-empty kind.
    ///
    /// All kinds are read under one lock before anything is written. Files
    /// written before a failure are left in place.
    pub async fn export_all(&self, store: &RecordStore) -> Result<ExportReport, ExportError> {
        let (questionnaires, locations, vlogs) = store.snapshot().await?;
        self.export_records(&questionnaires, &locations, &vlogs).await
    }

    async fn export_records(
        &self,
        questionnaires: &[QuestionnaireRecord],
        locations: &[LocationRecord],
        vlogs: &[VlogRecord],
    ) -> Result<ExportReport, ExportError> {
        let stamp = file_stamp(OffsetDateTime::now_utc())?;
        let mut report = ExportReport::default();

        for kind in RecordKind::ALL {
            let (rows, contents) = match kind {
                RecordKind::Questionnaire => {
                    (questionnaires.len(), questionnaire_csv(questionnaires)?)
                }
                RecordKind::Location => (locations.len(), location_csv(locations)?),
                RecordKind::Vlog => (vlogs.len(), vlog_csv(vlogs)?),
            };
            if rows == 0 {
                debug!("No {} records, skipping", kind);
                continue;
            }

            let name = format!("{}_{}.csv", kind.table(), stamp);
            let path = self.write_file(name, contents).await?;
            info!("Exported {} {} rows to {}", rows, kind, path.display());

            report.summary.set(kind, rows as u64);
            self.offer(&path).await;
            report.files.push(path);
        }

        Ok(report)
    }

    async fn write_file(&self, name: String, contents: String) -> Result<PathBuf, ExportError> {
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || write_atomic(&dir, &name, &contents))
            .await
            .map_err(StorageError::from)?
    }

    async fn offer(&self, path: &Path) {
        let Some(target) = &self.share else {
            return;
        };
        if !target.is_available() {
            debug!("Sharing unavailable, kept {}", path.display());
            return;
        }
        if let Err(e) = target.share(path).await {
            warn!("Failed to share {}: {}", path.display(), e);
        }
    }
}

/// Write `contents` to `dir/name` through a temp file in the same directory,
/// so readers never see a partial file.
fn write_atomic(dir: &Path, name: &str, contents: &str) -> Result<PathBuf, ExportError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ExportError::Io { path, source }
    };

    std::fs::create_dir_all(dir).map_err(io_err(dir))?;
    let path = dir.join(name);

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(io_err(dir))?;
    file.write_all(contents.as_bytes()).map_err(io_err(&path))?;
    file.as_file().sync_all().map_err(io_err(&path))?;
    file.persist(&path).map_err(|e| ExportError::Io {
        path: path.clone(),
        source: e.error,
    })?;

    Ok(path)
}

/// Timestamp used in export file names, e.g. `2026-10-19T08-00-00-123Z`.
pub fn file_stamp(at: OffsetDateTime) -> Result<String, ExportError> {
    Ok(at.to_offset(UtcOffset::UTC).format(format_description!(
        "[year]-[month]-[day]T[hour]-[minute]-[second]-[subsecond digits:3]Z"
    ))?)
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn timestamp(at: OffsetDateTime) -> Result<String, ExportError> {
    let formatted = at.to_offset(UtcOffset::UTC).format(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    ))?;
    Ok(quote(&formatted))
}

fn document(kind: RecordKind, rows: Vec<String>) -> String {
    let mut out = String::from(kind.csv_header());
    out.push('\n');
    for row in rows {
        out.push_str(&row);
        out.push('\n');
    }
    out
}

/// Render questionnaires as a CSV document.
pub fn questionnaire_csv(records: &[QuestionnaireRecord]) -> Result<String, ExportError> {
    let rows = records
        .iter()
        .map(|r| {
            Ok(format!(
                "{},{},{},{},{}",
                r.id,
                quote(r.sentiment.label()),
                quote(r.mood.label()),
                r.energy,
                timestamp(r.captured_at)?
            ))
        })
        .collect::<Result<Vec<_>, ExportError>>()?;
    Ok(document(RecordKind::Questionnaire, rows))
}

/// Render locations as a CSV document. A missing accuracy is an empty field.
pub fn location_csv(records: &[LocationRecord]) -> Result<String, ExportError> {
    let rows = records
        .iter()
        .map(|r| {
            let accuracy = r.accuracy.map(|a| a.to_string()).unwrap_or_default();
            Ok(format!(
                "{},{},{},{},{}",
                r.id,
                r.latitude,
                r.longitude,
                accuracy,
                timestamp(r.captured_at)?
            ))
        })
        .collect::<Result<Vec<_>, ExportError>>()?;
    Ok(document(RecordKind::Location, rows))
}

/// Render vlog metadata as a CSV document.
pub fn vlog_csv(records: &[VlogRecord]) -> Result<String, ExportError> {
    let rows = records
        .iter()
        .map(|r| {
            Ok(format!(
                "{},{},{},{},{}",
                r.id,
                quote(&r.filename),
                quote(&r.file_uri),
                r.duration_seconds,
                timestamp(r.captured_at)?
            ))
        })
        .collect::<Result<Vec<_>, ExportError>>()?;
    Ok(document(RecordKind::Vlog, rows))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::import::{ParsedRecord, parse_csv};
    use emogo_types::{Energy, Mood, NewLocation, NewQuestionnaire, NewVlog, Sentiment};
    use tempfile::tempdir;
    use time::macros::datetime;

    #[derive(Default)]
    struct RecordingShare {
        calls: AtomicUsize,
        shared: Mutex<Vec<PathBuf>>,
        fail: bool,
    }

    #[async_trait]
    impl ShareTarget for RecordingShare {
        async fn share(&self, path: &Path) -> std::io::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.shared.lock().unwrap().push(path.to_path_buf());
            if self.fail {
                Err(std::io::Error::other("share sheet dismissed"))
            } else {
                Ok(())
            }
        }
    }

    struct UnavailableShare;

    #[async_trait]
    impl ShareTarget for UnavailableShare {
        fn is_available(&self) -> bool {
            false
        }

        async fn share(&self, _path: &Path) -> std::io::Result<()> {
            panic!("share called while unavailable");
        }
    }

    async fn seeded_store() -> RecordStore {
        let store = RecordStore::in_memory().unwrap();
        store
            .insert_questionnaire(NewQuestionnaire::new(
                Sentiment::Negative,
                Mood::Stressed,
                Energy::try_from(3).unwrap(),
            ))
            .await
            .unwrap();
        store
            .insert_questionnaire(NewQuestionnaire::new(
                Sentiment::VeryPositive,
                Mood::Happy,
                Energy::try_from(9).unwrap(),
            ))
            .await
            .unwrap();
        store
            .insert_location(NewLocation::new(25.033, 121.5654, None).unwrap())
            .await
            .unwrap();
        store
    }

    fn csv_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_file_stamp_format() {
        let stamp = file_stamp(datetime!(2026-10-19 8:00:00.123 UTC)).unwrap();
        assert_eq!(stamp, "2026-10-19T08-00-00-123Z");
    }

    #[test]
    fn test_file_stamp_converts_to_utc() {
        let stamp = file_stamp(datetime!(2026-10-19 10:30:00 +2)).unwrap();
        assert_eq!(stamp, "2026-10-19T08-30-00-000Z");
    }

    #[test]
    fn test_questionnaire_csv_layout() {
        let records = vec![
            QuestionnaireRecord {
                id: 2,
                sentiment: Sentiment::VeryPositive,
                mood: Mood::Happy,
                energy: Energy::try_from(8).unwrap(),
                captured_at: datetime!(2026-10-19 13:00:00.250 UTC),
            },
            QuestionnaireRecord {
                id: 1,
                sentiment: Sentiment::Negative,
                mood: Mood::Sad,
                energy: Energy::try_from(3).unwrap(),
                captured_at: datetime!(2026-10-19 8:00:00 UTC),
            },
        ];

        let csv = questionnaire_csv(&records).unwrap();

        assert_eq!(
            csv,
            "ID,Sentiment,Mood,Energy,Timestamp\n\
             2,\"Very Positive\",\"Happy\",8,\"2026-10-19T13:00:00.250Z\"\n\
             1,\"Negative\",\"Sad\",3,\"2026-10-19T08:00:00.000Z\"\n"
        );
    }

    #[test]
    fn test_location_csv_empty_accuracy() {
        let records = vec![
            LocationRecord {
                id: 2,
                latitude: 25.033,
                longitude: 121.5654,
                accuracy: Some(12.5),
                captured_at: datetime!(2026-10-19 9:00:00 UTC),
            },
            LocationRecord {
                id: 1,
                latitude: -33.8688,
                longitude: 151.2093,
                accuracy: None,
                captured_at: datetime!(2026-10-19 8:00:00 UTC),
            },
        ];

        let csv = location_csv(&records).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "ID,Latitude,Longitude,Accuracy,Timestamp");
        assert_eq!(lines[1], "2,25.033,121.5654,12.5,\"2026-10-19T09:00:00.000Z\"");
        assert_eq!(lines[2], "1,-33.8688,151.2093,,\"2026-10-19T08:00:00.000Z\"");
    }

    #[test]
    fn test_vlog_csv_escapes_quotes() {
        let records = vec![VlogRecord {
            id: 1,
            filename: "say \"hi\", ok.mp4".to_string(),
            file_uri: "file:///videos/say.mp4".to_string(),
            duration_seconds: 1.0,
            captured_at: datetime!(2026-10-19 8:00:00 UTC),
        }];

        let csv = vlog_csv(&records).unwrap();

        assert!(csv.contains("1,\"say \"\"hi\"\", ok.mp4\",\"file:///videos/say.mp4\",1,"));
    }

    #[test]
    fn test_empty_document_is_header_only() {
        assert_eq!(vlog_csv(&[]).unwrap(), "ID,Filename,URI,Duration,Timestamp\n");
    }

    #[tokio::test]
    async fn test_export_skips_empty_kinds() {
        let dir = tempdir().unwrap();
        let store = seeded_store().await;

        let report = Exporter::new(dir.path()).export_all(&store).await.unwrap();

        assert_eq!(report.files.len(), 2);
        assert_eq!(
            report.summary,
            Summary {
                questionnaire_count: 2,
                location_count: 1,
                vlog_count: 0,
            }
        );
        let names = csv_files(dir.path());
        assert_eq!(names.len(), 2);
        assert!(names[0].starts_with("location_"));
        assert!(names[1].starts_with("questionnaire_"));
        assert!(names.iter().all(|n| n.ends_with("Z.csv")));
    }

    #[tokio::test]
    async fn test_export_file_contents() {
        let dir = tempdir().unwrap();
        let store = seeded_store().await;

        let report = Exporter::new(dir.path()).export_all(&store).await.unwrap();
        let contents = std::fs::read_to_string(&report.files[0]).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ID,Sentiment,Mood,Energy,Timestamp");
        assert!(lines[1].starts_with("2,\"Very Positive\",\"Happy\",9,\""));
        assert!(lines[2].starts_with("1,\"Negative\",\"Stressed\",3,\""));
    }

    #[tokio::test]
    async fn test_export_of_empty_store_writes_nothing() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("exports");
        let store = RecordStore::in_memory().unwrap();

        let report = Exporter::new(&out).export_all(&store).await.unwrap();

        assert!(report.files.is_empty());
        assert_eq!(report.summary.total(), 0);
        assert!(!out.exists() || csv_files(&out).is_empty());
    }

    #[tokio::test]
    async fn test_export_round_trips_through_import() {
        let dir = tempdir().unwrap();
        let store = seeded_store().await;
        store
            .insert_vlog(NewVlog::clip("a \"quoted\", clip.mp4", "file:///m/a.mp4").unwrap())
            .await
            .unwrap();

        let report = Exporter::new(dir.path()).export_all(&store).await.unwrap();
        let vlog_file = report
            .files
            .iter()
            .find(|p| p.file_name().unwrap().to_string_lossy().starts_with("vlog_"))
            .unwrap();
        let (rows, errors) =
            parse_csv(RecordKind::Vlog, &std::fs::read_to_string(vlog_file).unwrap()).unwrap();

        let stored = store.list_vlogs().await.unwrap();
        assert!(errors.is_empty());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].source_id, stored[0].id);
        assert_eq!(rows[0].captured_at, stored[0].captured_at);
        match &rows[0].record {
            ParsedRecord::Vlog(v) => assert_eq!(v.filename, "a \"quoted\", clip.mp4"),
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_share_called_once_per_file() {
        let dir = tempdir().unwrap();
        let store = seeded_store().await;
        let share = Arc::new(RecordingShare::default());

        let report = Exporter::new(dir.path())
            .with_share(share.clone())
            .export_all(&store)
            .await
            .unwrap();

        assert_eq!(share.calls.load(Ordering::SeqCst), 2);
        assert_eq!(*share.shared.lock().unwrap(), report.files);
    }

    #[tokio::test]
    async fn test_share_failure_does_not_fail_export() {
        let dir = tempdir().unwrap();
        let store = seeded_store().await;
        let share = Arc::new(RecordingShare {
            fail: true,
            ..Default::default()
        });

        let report = Exporter::new(dir.path())
            .with_share(share.clone())
            .export_all(&store)
            .await
            .unwrap();

        assert_eq!(report.files.len(), 2);
        assert!(report.files.iter().all(|p| p.exists()));
        assert_eq!(share.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unavailable_share_is_skipped() {
        let dir = tempdir().unwrap();
        let store = seeded_store().await;

        let report = Exporter::new(dir.path())
            .with_share(Arc::new(UnavailableShare))
            .export_all(&store)
            .await
            .unwrap();

        assert_eq!(report.files.len(), 2);
    }

    #[tokio::test]
    async fn test_storage_failure_is_reported() {
        let dir = tempdir().unwrap();
        let store = seeded_store().await;
        store.execute_batch("DROP TABLE location").await.unwrap();

        let err = Exporter::new(dir.path()).export_all(&store).await.unwrap_err();

        assert!(matches!(err, ExportError::Storage(_)));
        assert!(csv_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_unwritable_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();
        let store = seeded_store().await;

        let err = Exporter::new(blocker.join("exports"))
            .export_all(&store)
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::Io { .. }));
    }
}
