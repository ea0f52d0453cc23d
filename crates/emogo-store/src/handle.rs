//! Shared async handle over a [`Store`].
//!
//! Every call takes the store lock and runs the SQLite work on the blocking
//! pool, so callers on the async runtime never block on disk I/O and no two
//! operations touch the connection at once.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OnceCell};
use tracing::{info, warn};

use emogo_types::{NewLocation, NewQuestionnaire, NewVlog, RecordKind};

use crate::error::{Result, StorageError};
use crate::models::{
    ImportResult, LocationRecord, QuestionnaireRecord, Summary, SummaryReport, VlogRecord,
};
use crate::store::Store;

/// Default limit on how long opening the database may take.
pub const DEFAULT_OPEN_TIMEOUT: Duration = Duration::from_secs(5);

static GLOBAL: OnceCell<RecordStore> = OnceCell::const_new();

/// Cloneable, thread-safe handle to one record store.
#[derive(Clone)]
pub struct RecordStore {
    inner: Arc<Mutex<Store>>,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore").finish_non_exhaustive()
    }
}

impl RecordStore {
    /// Wrap an already opened store.
    pub fn new(store: Store) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Open (creating if needed) the database at `path`.
    ///
    /// With a timeout, an open that does not finish in time fails with
    /// [`StorageError::OpenTimeout`].
    pub async fn open(path: impl Into<PathBuf>, timeout: Option<Duration>) -> Result<Self> {
        let path = path.into();
        let task = tokio::task::spawn_blocking(move || Store::open(path));

        let store = match timeout {
            Some(limit) => tokio::time::timeout(limit, task)
                .await
                .map_err(|_| StorageError::OpenTimeout(limit))???,
            None => task.await??,
        };
        Ok(Self::new(store))
    }

    /// An in-memory store, mostly for tests.
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(Store::open_in_memory()?))
    }

    /// The process-wide handle, opened on first use.
    ///
    /// Concurrent first callers share a single open. Later calls return the
    /// same handle and ignore `path`. A failed open is not cached, so the
    /// next call tries again.
    pub async fn global(path: &Path, timeout: Option<Duration>) -> Result<Self> {
        GLOBAL
            .get_or_try_init(|| async {
                info!("Opening shared record store at {}", path.display());
                Self::open(path.to_path_buf(), timeout).await
            })
            .await
            .cloned()
    }

    /// Run `task` against the store on the blocking pool.
    async fn with_store<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Store) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let mut guard = self.inner.clone().lock_owned().await;
        tokio::task::spawn_blocking(move || task(&mut *guard)).await?
    }

    /// Create the tables if they do not exist yet.
    pub async fn initialize(&self) -> Result<()> {
        self.with_store(|store| store.initialize()).await
    }

    /// Store a questionnaire response and return its id.
    pub async fn insert_questionnaire(&self, draft: NewQuestionnaire) -> Result<i64> {
        self.with_store(move |store| store.insert_questionnaire(&draft)).await
    }

    /// Store a location fix and return its id.
    pub async fn insert_location(&self, draft: NewLocation) -> Result<i64> {
        self.with_store(move |store| store.insert_location(&draft)).await
    }

    /// Store clip metadata and return its id.
    pub async fn insert_vlog(&self, draft: NewVlog) -> Result<i64> {
        self.with_store(move |store| store.insert_vlog(&draft)).await
    }

    /// All questionnaire responses, most recent first.
    pub async fn list_questionnaires(&self) -> Result<Vec<QuestionnaireRecord>> {
        self.with_store(|store| store.list_questionnaires()).await
    }

    /// All location fixes, most recent first.
    pub async fn list_locations(&self) -> Result<Vec<LocationRecord>> {
        self.with_store(|store| store.list_locations()).await
    }

    /// All clip records, most recent first.
    pub async fn list_vlogs(&self) -> Result<Vec<VlogRecord>> {
        self.with_store(|store| store.list_vlogs()).await
    }

    /// Number of stored records of one kind.
    pub async fn count(&self, kind: RecordKind) -> Result<u64> {
        self.with_store(move |store| store.count(kind)).await
    }

    /// Count every kind from one snapshot; any failure fails the call.
    pub async fn summary_strict(&self) -> Result<Summary> {
        self.with_store(|store| store.summary()).await
    }

    /// Count every kind, reporting zero for kinds whose count failed.
    ///
    /// Never fails as a whole. Failed kinds are listed in the report and
    /// logged.
    pub async fn summary(&self) -> SummaryReport {
        let mut report = SummaryReport::default();
        for kind in RecordKind::ALL {
            match self.count(kind).await {
                Ok(count) => report.summary.set(kind, count),
                Err(e) => {
                    warn!("Failed to count {} records: {}", kind, e);
                    report.failed.push((kind, e.to_string()));
                }
            }
        }
        report
    }

    /// Remove every record of every kind atomically.
    pub async fn clear_all(&self) -> Result<Summary> {
        self.with_store(|store| store.clear_all()).await
    }

    /// Import an exported CSV document of one kind.
    pub async fn import_csv(&self, kind: RecordKind, data: String) -> Result<ImportResult> {
        self.with_store(move |store| store.import_csv(kind, &data))
            .await
    }

    /// Read all three kinds under one lock acquisition.
    pub(crate) async fn snapshot(
        &self,
    ) -> Result<(Vec<QuestionnaireRecord>, Vec<LocationRecord>, Vec<VlogRecord>)> {
        self.with_store(|store| {
            Ok((
                store.list_questionnaires()?,
                store.list_locations()?,
                store.list_vlogs()?,
            ))
        })
        .await
    }

    /// Run raw SQL against the connection. Test support only.
    #[cfg(test)]
    pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
        self.with_store(move |store| store.execute_batch(sql)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emogo_types::{Energy, Mood, Sentiment};
    use tempfile::tempdir;

    fn fix(lat: f64) -> NewLocation {
        NewLocation::new(lat, 121.5, Some(5.0)).unwrap()
    }

    #[tokio::test]
    async fn test_open_creates_database() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("emogo.db");

        let store = RecordStore::open(&path, Some(DEFAULT_OPEN_TIMEOUT))
            .await
            .unwrap();

        assert!(path.exists());
        assert!(store.list_vlogs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_without_timeout() {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("emogo.db"), None)
            .await
            .unwrap();
        assert_eq!(store.count(RecordKind::Location).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_and_list_through_handle() {
        let store = RecordStore::in_memory().unwrap();
        let draft = NewQuestionnaire::new(Sentiment::Positive, Mood::Excited, Energy::default());

        let id = store.insert_questionnaire(draft).await.unwrap();
        let list = store.list_questionnaires().await.unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, id);
        assert_eq!(list[0].mood, Mood::Excited);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_get_distinct_ids() {
        let store = RecordStore::in_memory().unwrap();

        let mut tasks = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store.insert_location(fix(f64::from(i))).await
            }));
        }

        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap().unwrap());
        }
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), 20);
        assert_eq!(store.count(RecordKind::Location).await.unwrap(), 20);
    }

    #[tokio::test]
    async fn test_summary_matches_counts() {
        let store = RecordStore::in_memory().unwrap();
        for _ in 0..3 {
            store
                .insert_questionnaire(NewQuestionnaire::new(
                    Sentiment::Neutral,
                    Mood::Anxious,
                    Energy::default(),
                ))
                .await
                .unwrap();
        }
        store.insert_location(fix(1.0)).await.unwrap();
        store.insert_location(fix(2.0)).await.unwrap();
        store
            .insert_vlog(NewVlog::clip("vlog_1.mp4", "file:///tmp/vlog_1.mp4").unwrap())
            .await
            .unwrap();

        let report = store.summary().await;

        assert!(report.is_complete());
        assert_eq!(
            report.summary,
            Summary {
                questionnaire_count: 3,
                location_count: 2,
                vlog_count: 1,
            }
        );
        assert_eq!(store.summary_strict().await.unwrap(), report.summary);
    }

    #[tokio::test]
    async fn test_summary_reports_failed_kind_as_zero() {
        let store = RecordStore::in_memory().unwrap();
        store.insert_location(fix(1.0)).await.unwrap();
        store.execute_batch("DROP TABLE vlog").await.unwrap();

        let report = store.summary().await;

        assert!(!report.is_complete());
        assert_eq!(report.summary.location_count, 1);
        assert_eq!(report.summary.vlog_count, 0);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, RecordKind::Vlog);
        assert!(store.summary_strict().await.is_err());
    }

    #[tokio::test]
    async fn test_list_failure_propagates() {
        let store = RecordStore::in_memory().unwrap();
        store.execute_batch("DROP TABLE location").await.unwrap();

        let err = store.list_locations().await.unwrap_err();
        assert!(matches!(err, StorageError::Database(_)));
    }

    #[tokio::test]
    async fn test_clear_all_then_summary_is_zero() {
        let store = RecordStore::in_memory().unwrap();
        store.insert_location(fix(1.0)).await.unwrap();

        let removed = store.clear_all().await.unwrap();

        assert_eq!(removed.location_count, 1);
        assert_eq!(store.summary().await.summary.total(), 0);
    }

    #[tokio::test]
    async fn test_global_handle_is_shared() {
        let dir = tempdir().unwrap();
        let first_path = dir.path().join("first.db");
        let other_path = dir.path().join("other.db");

        let (a, b) = tokio::join!(
            RecordStore::global(&first_path, None),
            RecordStore::global(&first_path, None)
        );
        let a = a.unwrap();
        let b = b.unwrap();
        let c = RecordStore::global(&other_path, None).await.unwrap();

        let id = a.insert_location(fix(3.0)).await.unwrap();

        assert!(Arc::ptr_eq(&a.inner, &b.inner));
        assert!(Arc::ptr_eq(&a.inner, &c.inner));
        assert_eq!(c.list_locations().await.unwrap()[0].id, id);
        assert!(!other_path.exists());
    }
}
