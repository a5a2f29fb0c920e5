use async_trait::async_trait;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, instrument};

use super::{ListCollection, ListStore};
use crate::models::{Destination, TravelList};
use crate::{Result, WanderlistError};

/// Process-lifetime list store; contents are lost on restart
#[derive(Debug, Default)]
pub struct MemoryListStore {
    collection: RwLock<ListCollection>,
}

impl MemoryListStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, ListCollection>> {
        self.collection
            .read()
            .map_err(|_| WanderlistError::store("List store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, ListCollection>> {
        self.collection
            .write()
            .map_err(|_| WanderlistError::store("List store lock poisoned"))
    }
}

#[async_trait]
impl ListStore for MemoryListStore {
    #[instrument(skip(self))]
    async fn create_list(&self, name: &str) -> Result<TravelList> {
        let list = self.write()?.create(name)?;
        info!("Created list {} ({})", list.id, list.name);
        Ok(list)
    }

    async fn lists(&self) -> Result<Vec<TravelList>> {
        Ok(self.read()?.lists().to_vec())
    }

    async fn get_list(&self, id: u64) -> Result<TravelList> {
        self.read()?.get(id).cloned()
    }

    #[instrument(skip(self))]
    async fn rename_list(&self, id: u64, name: &str) -> Result<TravelList> {
        let list = self.write()?.rename(id, name)?;
        info!("Renamed list {} to {}", id, list.name);
        Ok(list)
    }

    #[instrument(skip(self))]
    async fn delete_list(&self, id: u64) -> Result<()> {
        let removed = self.write()?.delete(id)?;
        info!("Deleted list {} ({})", id, removed.name);
        Ok(())
    }

    #[instrument(skip(self, destination), fields(destination = %destination.name))]
    async fn add_destination(&self, id: u64, destination: Destination) -> Result<TravelList> {
        self.write()?.add_destination(id, destination)
    }

    #[instrument(skip(self))]
    async fn remove_destination(&self, id: u64, destination_name: &str) -> Result<TravelList> {
        self.write()?.remove_destination(id, destination_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_round_trip_add_remove() {
        let store = MemoryListStore::new();
        let list = store.create_list("Weekend").await.unwrap();
        let rome = Destination::new("Rome", "Italy", 41.9, 12.5);
        store.add_destination(list.id, rome).await.unwrap();

        let before = store.get_list(list.id).await.unwrap().destinations;
        let paris = Destination::new("Paris", "France", 48.85, 2.35);
        store.add_destination(list.id, paris).await.unwrap();
        let after = store.remove_destination(list.id, "Paris").await.unwrap();

        assert_eq!(after.destinations, before);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let store = MemoryListStore::new();
        let list = store.create_list("Gone").await.unwrap();
        store.delete_list(list.id).await.unwrap();

        let err = store.get_list(list.id).await.unwrap_err();
        assert!(matches!(err, WanderlistError::ListNotFound { .. }));
        let err = store.delete_list(list.id).await.unwrap_err();
        assert!(matches!(err, WanderlistError::ListNotFound { .. }));
    }

    #[tokio::test]
    async fn test_summaries() {
        let store = MemoryListStore::new();
        store.create_list("A").await.unwrap();
        let b = store.create_list("B").await.unwrap();
        store
            .add_destination(b.id, Destination::new("Oslo", "Norway", 59.9, 10.7))
            .await
            .unwrap();

        let summaries = store.summaries().await.unwrap();
        let names: Vec<_> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_are_not_lost() {
        let store = Arc::new(MemoryListStore::new());
        let list = store.create_list("Busy").await.unwrap();

        let mut handles = Vec::new();
        for i in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let destination = Destination::new(format!("Town {}", i % 16), "X", 0.0, 0.0);
                store.add_destination(list.id, destination).await
            }));
        }

        let mut accepted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                accepted += 1;
            }
        }

        // Each of the 16 names is accepted exactly once
        assert_eq!(accepted, 16);
        assert_eq!(store.get_list(list.id).await.unwrap().destinations.len(), 16);
    }
}
