//! In-memory record store for tests and embedding

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::record::Record;

use super::{AppendOutcome, RecordStore};

/// Partitioned store held entirely in memory.
#[derive(Default)]
pub struct MemoryStore {
    partitions: RwLock<HashMap<String, Vec<(String, Record)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get_all(&self, partition: &str) -> Result<Vec<Record>, StoreError> {
        let partitions = self.partitions.read().await;
        Ok(partitions
            .get(partition)
            .map(|records| records.iter().map(|(_, r)| r.clone()).collect())
            .unwrap_or_default())
    }

    async fn find_by_key(
        &self,
        partition: &str,
        key: &str,
    ) -> Result<Option<Record>, StoreError> {
        let partitions = self.partitions.read().await;
        Ok(partitions.get(partition).and_then(|records| {
            records
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, r)| r.clone())
        }))
    }

    async fn append_and_persist(
        &self,
        partition: &str,
        key: &str,
        record: Record,
    ) -> Result<(), StoreError> {
        let mut partitions = self.partitions.write().await;
        partitions
            .entry(partition.to_string())
            .or_default()
            .push((key.to_string(), record));
        Ok(())
    }

    async fn append_unique(
        &self,
        partition: &str,
        key: &str,
        record: Record,
    ) -> Result<AppendOutcome, StoreError> {
        // Check and append under one write lock.
        let mut partitions = self.partitions.write().await;
        let records = partitions.entry(partition.to_string()).or_default();
        if let Some((_, existing)) = records.iter().find(|(k, _)| k == key) {
            return Ok(AppendOutcome::Duplicate(existing.clone()));
        }
        records.push((key.to_string(), record));
        Ok(AppendOutcome::Appended)
    }

    async fn clear(&self, partition: &str) -> Result<(), StoreError> {
        let mut partitions = self.partitions.write().await;
        partitions.remove(partition);
        Ok(())
    }
}
