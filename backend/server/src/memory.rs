//! # Memory
//!
//! In-process record store, selected with `RUST_STORE=memory` and used by the tests.
//! Contents are lost on shutdown.
//!
//! Ids are `max + 1` over the stored records. Two requests can draw the same id,
//! the second [`RecordStore::insert`] then fails with [`AppError::DuplicateId`]
//! and the caller draws again.
use std::{collections::BTreeMap, sync::Arc};

use parking_lot::RwLock;

use crate::{database::RecordStore, error::AppError, models::Record};

#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<BTreeMap<u64, Record>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl RecordStore for MemoryStore {
    async fn next_id(&self) -> Result<u64, AppError> {
        let max_id = self.records.read().keys().next_back().copied();

        Ok(max_id.map_or(1, |id| id + 1))
    }

    async fn insert(&self, record: &Record) -> Result<(), AppError> {
        let mut records = self.records.write();

        if records.contains_key(&record.id) {
            return Err(AppError::DuplicateId(record.id));
        }
        records.insert(record.id, record.clone());

        Ok(())
    }

    async fn get(&self, id: u64) -> Result<Option<Record>, AppError> {
        Ok(self.records.read().get(&id).cloned())
    }

    async fn max_id(&self) -> Result<Option<u64>, AppError> {
        Ok(self.records.read().keys().next_back().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Escaped, Gender, Identity};

    fn record(id: u64) -> Record {
        Record {
            id,
            timestamp: "2024-03-02 14:05:09".to_string(),
            identity: Identity {
                given_name: Escaped::new("Marie"),
                family_name: Escaped::new("Curie"),
                gender: Gender::Female,
                country: Escaped::new("France"),
                email: Escaped::new("marie@example.org"),
            },
            topics: vec!["Other".to_string()],
            message: Escaped::new("Bonjour"),
        }
    }

    #[tokio::test]
    async fn test_empty_store_starts_at_one() {
        let store = MemoryStore::new();

        assert!(store.is_empty());
        assert_eq!(store.next_id().await.unwrap(), 1);
        assert_eq!(store.max_id().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_next_id_follows_max() {
        let store = MemoryStore::new();
        store.insert(&record(1)).await.unwrap();
        store.insert(&record(5)).await.unwrap();

        assert_eq!(store.max_id().await.unwrap(), Some(5));
        assert_eq!(store.next_id().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = MemoryStore::new();
        store.insert(&record(1)).await.unwrap();

        let mut other = record(1);
        other.message = Escaped::new("Autre message");

        assert!(matches!(
            store.insert(&other).await,
            Err(AppError::DuplicateId(1))
        ));
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get(1).await.unwrap().unwrap().message.as_str(),
            "Bonjour"
        );
    }
}
