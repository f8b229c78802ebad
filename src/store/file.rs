//! JSON-file record store
//!
//! The durable analog of the source forms' browser local storage: the whole
//! store is one pretty-printed JSON document, loaded eagerly on open and
//! rewritten after every mutation. Writes go to a temporary file first and
//! are renamed into place so a crash mid-write cannot truncate the store.
//! Mutations update the in-memory map only after the persist returns, so a
//! mutation future dropped at an await point never leaves a record visible
//! that was not written out.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreError;
use crate::record::Record;

use super::{AppendOutcome, RecordStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRecord {
    key: String,
    record: Record,
}

type Partitions = HashMap<String, Vec<StoredRecord>>;

/// Record store persisted as a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    partitions: RwLock<Partitions>,
}

impl JsonFileStore {
    /// Open a store file, creating an empty store when the file is absent.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let partitions: Partitions = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Partitions::new(),
            Err(err) => return Err(err.into()),
        };
        debug!(path = %path.display(), partitions = partitions.len(), "opened record store");
        Ok(Self {
            path,
            partitions: RwLock::new(partitions),
        })
    }

    async fn persist(&self, partitions: &Partitions) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(partitions)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn get_all(&self, partition: &str) -> Result<Vec<Record>, StoreError> {
        let partitions = self.partitions.read().await;
        Ok(partitions
            .get(partition)
            .map(|records| records.iter().map(|s| s.record.clone()).collect())
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
                .find(|s| s.key == key)
                .map(|s| s.record.clone())
        }))
    }

    async fn append_and_persist(
        &self,
        partition: &str,
        key: &str,
        record: Record,
    ) -> Result<(), StoreError> {
        let mut partitions = self.partitions.write().await;
        let mut next = partitions.clone();
        next.entry(partition.to_string())
            .or_default()
            .push(StoredRecord {
                key: key.to_string(),
                record,
            });
        self.persist(&next).await?;
        *partitions = next;
        Ok(())
    }

    async fn append_unique(
        &self,
        partition: &str,
        key: &str,
        record: Record,
    ) -> Result<AppendOutcome, StoreError> {
        // The write lock is held across the persist so concurrent callers
        // serialize on the whole check-append-persist sequence. The persist
        // runs against a copy and the shared map is swapped only after it
        // returns: a caller dropped while parked in the persist leaves no
        // record visible to `get_all`.
        let mut partitions = self.partitions.write().await;
        if let Some(existing) = partitions
            .get(partition)
            .and_then(|records| records.iter().find(|s| s.key == key))
        {
            return Ok(AppendOutcome::Duplicate(existing.record.clone()));
        }
        let mut next = partitions.clone();
        next.entry(partition.to_string())
            .or_default()
            .push(StoredRecord {
                key: key.to_string(),
                record,
            });
        self.persist(&next).await?;
        *partitions = next;
        Ok(AppendOutcome::Appended)
    }

    async fn clear(&self, partition: &str) -> Result<(), StoreError> {
        let mut partitions = self.partitions.write().await;
        let mut next = partitions.clone();
        next.remove(partition);
        self.persist(&next).await?;
        *partitions = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(name: &str, phone: &str) -> Record {
        let mut fields = BTreeMap::new();
        fields.insert("playerName".to_string(), name.to_string());
        fields.insert("phone".to_string(), phone.to_string());
        Record::new("CKT", fields)
    }

    #[tokio::test]
    async fn store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let store = JsonFileStore::open(&path).await.unwrap();
            store
                .append_and_persist("cricketPlayers", "9876543210", record("Rahul", "9876543210"))
                .await
                .unwrap();
        }

        let store = JsonFileStore::open(&path).await.unwrap();
        let all = store.get_all("cricketPlayers").await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].field("playerName"), Some("Rahul"));
        let found = store
            .find_by_key("cricketPlayers", "9876543210")
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn append_unique_persists_only_the_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = JsonFileStore::open(&path).await.unwrap();

        let first = store
            .append_unique("cricketPlayers", "9876543210", record("Rahul", "9876543210"))
            .await
            .unwrap();
        assert!(matches!(first, AppendOutcome::Appended));

        let second = store
            .append_unique("cricketPlayers", "9876543210", record("Later", "9876543210"))
            .await
            .unwrap();
        assert!(matches!(second, AppendOutcome::Duplicate(_)));

        let store = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(store.get_all("cricketPlayers").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn dropped_append_future_leaves_no_visible_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = JsonFileStore::open(&path).await.unwrap();

        // The file write parks the append on its first poll; the biased
        // select then drops it mid-persist, as a cancelled caller would.
        let append =
            store.append_unique("cricketPlayers", "9876543210", record("Rahul", "9876543210"));
        tokio::select! {
            biased;
            _ = append => panic!("append completed on its first poll"),
            _ = std::future::ready(()) => {}
        }

        assert!(store.get_all("cricketPlayers").await.unwrap().is_empty());
        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert!(reopened.get_all("cricketPlayers").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clear_persists_the_empty_partition() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = JsonFileStore::open(&path).await.unwrap();
        store
            .append_and_persist("cricketPlayers", "9876543210", record("Rahul", "9876543210"))
            .await
            .unwrap();
        store.clear("cricketPlayers").await.unwrap();

        let store = JsonFileStore::open(&path).await.unwrap();
        assert!(store.get_all("cricketPlayers").await.unwrap().is_empty());
    }
}
