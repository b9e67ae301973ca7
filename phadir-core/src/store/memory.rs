//! In-memory record store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::CanonicalRecord;

use super::{RecordStore, StoredRecord, UpsertOutcome};

#[derive(Debug, Default)]
struct Inner {
    records: Vec<StoredRecord>,
    by_code: HashMap<String, usize>,
}

impl Inner {
    fn upsert(&mut self, record: CanonicalRecord) -> UpsertOutcome {
        let key = record.natural_key().map(str::to_string);
        if let Some(index) = key.as_ref().and_then(|k| self.by_code.get(k)).copied() {
            let stored = &mut self.records[index];
            stored.record = record;
            return UpsertOutcome::Updated(stored.id);
        }

        let id = Uuid::new_v4();
        if let Some(key) = key {
            self.by_code.insert(key, self.records.len());
        }
        self.records.push(StoredRecord { id, record });
        UpsertOutcome::Inserted(id)
    }
}

/// Record store kept entirely in memory.
///
/// Also the backing structure of [`super::JsonFileStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    deny_writes: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with records, rebuilding the code index
    #[must_use]
    pub fn from_records(records: Vec<StoredRecord>) -> Self {
        let by_code = records
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.record.natural_key().map(|k| (k.to_string(), i)))
            .collect();
        Self {
            inner: RwLock::new(Inner { records, by_code }),
            deny_writes: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent write fail with `StoreError::Unauthorized`
    pub fn set_deny_writes(&self, deny: bool) {
        self.deny_writes.store(deny, Ordering::SeqCst);
    }

    /// Looks up a record by code
    pub async fn find_by_code(&self, code: &str) -> Option<StoredRecord> {
        let inner = self.inner.read().await;
        inner
            .by_code
            .get(code.trim())
            .map(|&i| inner.records[i].clone())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn upsert(&self, record: CanonicalRecord) -> StoreResult<UpsertOutcome> {
        if self.deny_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unauthorized);
        }
        Ok(self.inner.write().await.upsert(record))
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.inner.read().await.records.len())
    }

    async fn list(&self) -> StoreResult<Vec<StoredRecord>> {
        Ok(self.inner.read().await.records.clone())
    }
}
