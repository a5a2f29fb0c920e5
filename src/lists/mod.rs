//! List Store
//!
//! Named lists of destination snapshots behind the [`ListStore`] trait, with an
//! in-memory backend that resets on restart and a persistent keyspace backend.

use async_trait::async_trait;

use crate::Result;
use crate::models::{Destination, ListSummary, TravelList};

pub mod collection;
pub mod memory;
pub mod persistent;

pub use collection::ListCollection;
pub use memory::MemoryListStore;
pub use persistent::PersistentListStore;

/// Storage for user lists. Every mutation is applied atomically.
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Create an empty list; fails with `DuplicateName` if the name is in use
    async fn create_list(&self, name: &str) -> Result<TravelList>;

    /// Every list with its destinations, in creation order
    async fn lists(&self) -> Result<Vec<TravelList>>;

    async fn get_list(&self, id: u64) -> Result<TravelList>;

    async fn rename_list(&self, id: u64, name: &str) -> Result<TravelList>;

    async fn delete_list(&self, id: u64) -> Result<()>;

    /// Append a destination snapshot; fails with `DuplicateDestination` if the
    /// list already holds a destination of that name
    async fn add_destination(&self, id: u64, destination: Destination) -> Result<TravelList>;

    async fn remove_destination(&self, id: u64, destination_name: &str) -> Result<TravelList>;

    /// Id and name of every list
    async fn summaries(&self) -> Result<Vec<ListSummary>> {
        Ok(self.lists().await?.iter().map(TravelList::summary).collect())
    }
}
