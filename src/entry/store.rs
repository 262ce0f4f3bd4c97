use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument};

use super::{
    entities::{EntryId, LogDraft, LogEntry, LogPatch},
    log_storage::{LogStorage, StorageError},
};

/// In-memory collection of one owner's entries, kept in sync with a [LogStorage].
///
/// Readers get immutable snapshots. A mutation first goes to storage and only after it succeeds
/// a new snapshot replaces the old one, so a read never observes a half-applied write.
pub struct EntryStore<S: LogStorage> {
    storage: S,
    owner: Arc<str>,
    snapshot: RwLock<Arc<Vec<LogEntry>>>,
    writer: Mutex<()>,
}

impl<S: LogStorage> EntryStore<S> {
    pub fn new(storage: S, owner: impl Into<Arc<str>>) -> Self {
        Self {
            storage,
            owner: owner.into(),
            snapshot: RwLock::new(Arc::new(Vec::new())),
            writer: Mutex::new(()),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Replaces the collection with what storage holds. A collection that was never created
    /// loads as empty.
    #[instrument(skip(self), fields(owner = %self.owner))]
    pub async fn load(&self) -> Result<Arc<Vec<LogEntry>>, StorageError> {
        let _guard = self.writer.lock().await;
        let entries = match self.storage.list(&self.owner).await {
            Ok(entries) => entries,
            Err(StorageError::MissingCollection(_)) => {
                info!("No collection yet, starting empty");
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        debug!("Loaded {} entries", entries.len());
        Ok(self.publish(entries).await)
    }

    /// Current snapshot. Cheap; never waits for storage.
    pub async fn snapshot(&self) -> Arc<Vec<LogEntry>> {
        self.snapshot.read().await.clone()
    }

    pub async fn get(&self, id: &EntryId) -> Option<LogEntry> {
        self.snapshot().await.iter().find(|v| &v.id == id).cloned()
    }

    /// Validates and stores a new entry. It goes to the front of the collection.
    #[instrument(skip(self, draft), fields(owner = %self.owner))]
    pub async fn create(&self, draft: LogDraft) -> Result<LogEntry, StorageError> {
        draft.validate()?;
        let _guard = self.writer.lock().await;
        let created = self.storage.create(&self.owner, draft).await?;
        info!("Created entry {}", created.id);

        let current = self.snapshot().await;
        let mut entries = Vec::with_capacity(current.len() + 1);
        entries.push(created.clone());
        entries.extend(current.iter().cloned());
        self.publish(entries).await;
        Ok(created)
    }

    #[instrument(skip(self, patch), fields(owner = %self.owner))]
    pub async fn update(&self, id: &EntryId, patch: LogPatch) -> Result<LogEntry, StorageError> {
        let _guard = self.writer.lock().await;
        let updated = self.storage.update(&self.owner, id, patch).await?;
        info!("Updated entry {}", updated.id);

        let mut entries = self.snapshot().await.as_ref().clone();
        match entries.iter_mut().find(|v| v.id == updated.id) {
            Some(existing) => *existing = updated.clone(),
            None => entries.insert(0, updated.clone()),
        }
        self.publish(entries).await;
        Ok(updated)
    }

    #[instrument(skip(self), fields(owner = %self.owner))]
    pub async fn delete(&self, id: &EntryId) -> Result<(), StorageError> {
        let _guard = self.writer.lock().await;
        self.storage.delete(&self.owner, id).await?;
        info!("Deleted entry {id}");

        let entries = self
            .snapshot()
            .await
            .iter()
            .filter(|v| &v.id != id)
            .cloned()
            .collect();
        self.publish(entries).await;
        Ok(())
    }

    async fn publish(&self, entries: Vec<LogEntry>) -> Arc<Vec<LogEntry>> {
        let entries = Arc::new(entries);
        *self.snapshot.write().await = entries.clone();
        entries
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use anyhow::Result;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    use crate::{
        entry::{
            entities::{test_entries::entry, EntryId, LogDraft, LogPatch, Mood, WorkType},
            log_storage::{LogStorageImpl, MockLogStorage, StorageError},
        },
        utils::{clock::FixedClock, logging::TEST_LOGGING},
    };

    use super::EntryStore;

    fn draft(title: &str) -> LogDraft {
        LogDraft {
            title: title.into(),
            description: "Cooked dinner with friends".into(),
            mood: Mood::Happy,
            work_type: WorkType::Social,
            energy_level: 2,
            meaning_level: 4,
            date: "2024-04-06".into(),
        }
    }

    fn file_store(dir: &std::path::Path) -> Result<EntryStore<LogStorageImpl>> {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 4, 6, 20, 0, 0).unwrap());
        let storage = LogStorageImpl::new(dir.to_owned(), Box::new(clock))?;
        Ok(EntryStore::new(storage, "alice"))
    }

    #[tokio::test]
    async fn missing_collection_loads_empty() -> Result<()> {
        *TEST_LOGGING;
        let mut storage = MockLogStorage::new();
        storage
            .expect_list()
            .withf(|owner| owner == "alice")
            .returning(|owner| Err(StorageError::MissingCollection(owner.into())));

        let store = EntryStore::new(storage, "alice");
        assert!(store.load().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn other_failures_surface() {
        let mut storage = MockLogStorage::new();
        storage.expect_list().returning(|_| {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            )))
        });

        let store = EntryStore::new(storage, "alice");
        assert!(matches!(store.load().await, Err(StorageError::Io(_))));
    }

    #[tokio::test]
    async fn failed_write_keeps_snapshot() -> Result<()> {
        let existing = entry("1", Mood::Sad, 1, 1, "2024-04-01");
        let listed = existing.clone();
        let mut storage = MockLogStorage::new();
        storage
            .expect_list()
            .returning(move |_| Ok(vec![listed.clone()]));
        storage
            .expect_delete()
            .returning(|_, id| Err(StorageError::NotFound(id.clone())));

        let store = EntryStore::new(storage, "alice");
        store.load().await?;
        assert!(store.delete(&existing.id).await.is_err());
        assert_eq!(*store.snapshot().await, vec![existing]);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_storage() {
        let storage = MockLogStorage::new();
        let store = EntryStore::new(storage, "alice");
        let mut invalid = draft("ok title");
        invalid.description = "short".into();
        assert!(matches!(
            store.create(invalid).await,
            Err(StorageError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn mutations_reach_storage_and_snapshot() -> Result<()> {
        let dir = tempdir()?;
        let store = file_store(dir.path())?;
        store.load().await?;

        let first = store.create(draft("First dinner")).await?;
        let second = store.create(draft("Second dinner")).await?;
        let ids = store
            .snapshot()
            .await
            .iter()
            .map(|v| v.id.clone())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![second.id.clone(), first.id.clone()]);

        let updated = store
            .update(
                &first.id,
                LogPatch {
                    mood: Some(Mood::Excited),
                    ..Default::default()
                },
            )
            .await?;
        assert_eq!(store.get(&first.id).await, Some(updated));

        store.delete(&second.id).await?;
        assert_eq!(store.get(&second.id).await, None);

        let reloaded = file_store(dir.path())?;
        assert_eq!(*reloaded.load().await?, *store.snapshot().await);
        Ok(())
    }

    #[tokio::test]
    async fn old_snapshot_is_unaffected_by_later_writes() -> Result<()> {
        let dir = tempdir()?;
        let store = file_store(dir.path())?;
        store.create(draft("First dinner")).await?;

        let before = store.snapshot().await;
        store.create(draft("Second dinner")).await?;

        assert_eq!(before.len(), 1);
        assert_eq!(store.snapshot().await.len(), 2);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn reads_do_not_wait_for_writes() -> Result<()> {
        let mut storage = MockLogStorage::new();
        storage.expect_create().returning(|owner, draft| {
            std::thread::sleep(Duration::from_millis(200));
            Ok(crate::entry::entities::LogEntry::from_draft(
                EntryId::from("slow"),
                owner.into(),
                draft,
                Utc::now(),
            ))
        });
        let store = Arc::new(EntryStore::new(storage, "alice"));

        let writer = {
            let store = store.clone();
            tokio::spawn(async move { store.create(draft("Slow dinner")).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let snapshot = tokio::time::timeout(Duration::from_millis(100), store.snapshot()).await?;
        assert!(snapshot.is_empty());

        writer.await??;
        assert_eq!(store.snapshot().await.len(), 1);
        Ok(())
    }
}
