use async_trait::async_trait;
use fjall::Keyspace;
use std::path::Path;
use tokio::sync::Mutex;
use tokio::task;
use tracing::{debug, info, instrument};

use super::{ListCollection, ListStore};
use crate::models::{Destination, TravelList};
use crate::{Result, WanderlistError};

const COLLECTION_KEY: &str = "lists";

/// List store that survives restarts, kept as a single postcard value in a fjall keyspace
pub struct PersistentListStore {
    store: Keyspace,
    /// Serializes read-modify-write cycles against the keyspace
    writer: Mutex<()>,
}

fn get_from_store(store: Keyspace) -> Result<Option<Vec<u8>>> {
    Ok(store.get(COLLECTION_KEY)?.map(|v| v.to_vec()))
}

fn join_error(err: task::JoinError) -> WanderlistError {
    WanderlistError::store(format!("Storage task failed: {err}"))
}

impl PersistentListStore {
    /// Open (or create) the keyspace under `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let db = fjall::Database::builder(path).open()?;
        let items = db.keyspace("lists", fjall::KeyspaceCreateOptions::default)?;
        info!("Opened persistent list store at {:?}", path);
        Ok(Self {
            store: items,
            writer: Mutex::new(()),
        })
    }

    async fn load(&self) -> Result<ListCollection> {
        let store = self.store.clone();
        let maybe_bytes = task::spawn_blocking(move || get_from_store(store))
            .await
            .map_err(join_error)??;

        match maybe_bytes {
            Some(bytes) => Ok(postcard::from_bytes(&bytes)?),
            None => {
                debug!("No stored lists yet");
                Ok(ListCollection::default())
            }
        }
    }

    async fn save(&self, collection: &ListCollection) -> Result<()> {
        let store = self.store.clone();
        let bytes = postcard::to_stdvec(collection)?;
        task::spawn_blocking(move || store.insert(COLLECTION_KEY, bytes))
            .await
            .map_err(join_error)??;
        debug!("Persisted {} lists", collection.len());
        Ok(())
    }

    /// Load, apply `change`, and write back only if it succeeded
    async fn modify<T, F>(&self, change: F) -> Result<T>
    where
        F: FnOnce(&mut ListCollection) -> Result<T> + Send,
        T: Send,
    {
        let _guard = self.writer.lock().await;
        let mut collection = self.load().await?;
        let outcome = change(&mut collection)?;
        self.save(&collection).await?;
        Ok(outcome)
    }
}

#[async_trait]
impl ListStore for PersistentListStore {
    #[instrument(skip(self))]
    async fn create_list(&self, name: &str) -> Result<TravelList> {
        let list = self.modify(|c| c.create(name)).await?;
        info!("Created list {} ({})", list.id, list.name);
        Ok(list)
    }

    async fn lists(&self) -> Result<Vec<TravelList>> {
        Ok(self.load().await?.lists().to_vec())
    }

    async fn get_list(&self, id: u64) -> Result<TravelList> {
        self.load().await?.get(id).cloned()
    }

    #[instrument(skip(self))]
    async fn rename_list(&self, id: u64, name: &str) -> Result<TravelList> {
        let list = self.modify(|c| c.rename(id, name)).await?;
        info!("Renamed list {} to {}", id, list.name);
        Ok(list)
    }

    #[instrument(skip(self))]
    async fn delete_list(&self, id: u64) -> Result<()> {
        let removed = self.modify(|c| c.delete(id)).await?;
        info!("Deleted list {} ({})", id, removed.name);
        Ok(())
    }

    #[instrument(skip(self, destination), fields(destination = %destination.name))]
    async fn add_destination(&self, id: u64, destination: Destination) -> Result<TravelList> {
        self.modify(|c| c.add_destination(id, destination)).await
    }

    #[instrument(skip(self))]
    async fn remove_destination(&self, id: u64, destination_name: &str) -> Result<TravelList> {
        self.modify(|c| c.remove_destination(id, destination_name))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_lists_survive_reopen() {
        let dir = TempDir::new().unwrap();

        {
            let store = PersistentListStore::open(dir.path()).unwrap();
            let list = store.create_list("Keep").await.unwrap();
            store
                .add_destination(list.id, Destination::new("Porto", "Portugal", 41.15, -8.61))
                .await
                .unwrap();
            let gone = store.create_list("Drop").await.unwrap();
            store.delete_list(gone.id).await.unwrap();
        }

        let store = PersistentListStore::open(dir.path()).unwrap();
        let lists = store.lists().await.unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].name, "Keep");
        assert_eq!(lists[0].destinations[0].name, "Porto");

        // The id counter is persisted too, so deleted ids stay retired
        let next = store.create_list("Next").await.unwrap();
        assert_eq!(next.id, 3);
    }

    #[tokio::test]
    async fn test_failed_change_is_not_written() {
        let dir = TempDir::new().unwrap();
        let store = PersistentListStore::open(dir.path()).unwrap();
        store.create_list("Only").await.unwrap();

        let err = store.create_list("Only").await.unwrap_err();
        assert!(matches!(err, WanderlistError::DuplicateName { .. }));
        assert_eq!(store.lists().await.unwrap().len(), 1);

        let next = store.create_list("Second").await.unwrap();
        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn test_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = PersistentListStore::open(dir.path()).unwrap();
        assert!(store.lists().await.unwrap().is_empty());
        let err = store.get_list(1).await.unwrap_err();
        assert!(matches!(err, WanderlistError::ListNotFound { id: 1 }));
    }
}
