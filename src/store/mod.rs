//! Partitioned record stores
//!
//! One partition per form variant. The trait is the injected seam that
//! replaces the ambient, module-scoped storage of the source forms: debug
//! and maintenance operations are ordinary methods here, not globals.
//!
//! `append_unique` exists because duplicate-check-then-append is a race for
//! concurrent callers; implementations perform the check and the append
//! under one lock.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::record::Record;

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Result of an atomic duplicate-check-and-append.
#[derive(Debug, Clone)]
pub enum AppendOutcome {
    Appended,
    /// The partition already holds a record under this key; nothing was
    /// written. Carries the pre-existing record.
    Duplicate(Record),
}

/// A keyed, partitioned list of records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records in a partition, in insertion order.
    async fn get_all(&self, partition: &str) -> Result<Vec<Record>, StoreError>;

    /// Look up a record by its canonical unique key.
    async fn find_by_key(&self, partition: &str, key: &str)
        -> Result<Option<Record>, StoreError>;

    /// Append unconditionally. Callers that need duplicate protection must
    /// use [`RecordStore::append_unique`] instead.
    async fn append_and_persist(
        &self,
        partition: &str,
        key: &str,
        record: Record,
    ) -> Result<(), StoreError>;

    /// Duplicate-check and append as one atomic operation.
    async fn append_unique(
        &self,
        partition: &str,
        key: &str,
        record: Record,
    ) -> Result<AppendOutcome, StoreError>;

    /// Remove every record in a partition.
    async fn clear(&self, partition: &str) -> Result<(), StoreError>;
}
