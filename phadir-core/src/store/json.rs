//! JSON-file-backed record store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::CanonicalRecord;

use super::{MemoryStore, RecordStore, StoredRecord, UpsertOutcome};

/// Record store persisted as a JSON array on disk.
///
/// Records are held in memory while the store is open; call [`save`] to
/// write them back. Saving goes through a temporary file and a rename so a
/// crash never leaves a half-written store behind.
///
/// [`save`]: JsonFileStore::save
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: MemoryStore,
}

impl JsonFileStore {
    /// Opens the store at `path`, starting empty if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let records: Vec<StoredRecord> = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), records = records.len(), "Opened record store");
        Ok(Self {
            path,
            records: MemoryStore::from_records(records),
        })
    }

    /// Returns the backing file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Makes every subsequent write fail with `StoreError::Unauthorized`
    pub fn set_deny_writes(&self, deny: bool) {
        self.records.set_deny_writes(deny);
    }

    /// Writes all records to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any filesystem step fails.
    pub async fn save(&self) -> StoreResult<()> {
        let records = self.records.list().await?;
        let json = serde_json::to_vec_pretty(&records)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), records = records.len(), "Saved record store");
        Ok(())
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn upsert(&self, record: CanonicalRecord) -> StoreResult<UpsertOutcome> {
        self.records.upsert(record).await
    }

    async fn count(&self) -> StoreResult<usize> {
        self.records.count().await
    }

    async fn list(&self) -> StoreResult<Vec<StoredRecord>> {
        self.records.list().await
    }
}
