//! Record persistence.
//!
//! The import pipeline writes through the [`RecordStore`] trait. Writes are
//! upserts keyed on the record's natural key (`code`): re-importing the same
//! file updates existing records instead of duplicating them. Records
//! without a code are always inserted.

mod json;
mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreResult;
use crate::models::CanonicalRecord;

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new record was created with this id
    Inserted(Uuid),
    /// An existing record with the same code was overwritten
    Updated(Uuid),
}

impl UpsertOutcome {
    /// Returns the id of the written record
    #[must_use]
    pub const fn id(&self) -> Uuid {
        match self {
            Self::Inserted(id) | Self::Updated(id) => *id,
        }
    }

    /// Returns true if an existing record was updated
    #[must_use]
    pub const fn is_update(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

/// A record as held by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Store-assigned identifier
    pub id: Uuid,
    /// Record contents
    #[serde(flatten)]
    pub record: CanonicalRecord,
}

/// Persistence backend for canonical records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts the record, or overwrites the existing one with the same code.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unauthorized` if writes are not allowed, or
    /// another `StoreError` if the write fails.
    async fn upsert(&self, record: CanonicalRecord) -> StoreResult<UpsertOutcome>;

    /// Returns the number of stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    async fn count(&self) -> StoreResult<usize>;

    /// Returns every stored record in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    async fn list(&self) -> StoreResult<Vec<StoredRecord>>;
}
