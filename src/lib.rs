//! `Wanderlist` - European travel destination browser
//!
//! This library provides the destination dataset reader, the store for
//! user-curated destination lists, and the HTTP API that serves both.

pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod lists;
pub mod models;
pub mod service;
pub mod telemetry;
pub mod web;

use std::sync::Arc;

// Re-export core types for public API
pub use config::WanderlistConfig;
pub use dataset::DestinationCatalog;
pub use error::WanderlistError;
pub use lists::{ListStore, MemoryListStore, PersistentListStore};
pub use models::{Destination, ListSummary, SortKey, TravelList};
pub use service::{LocationPage, PageRequest, TravelService};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WanderlistError>;

/// Open the dataset and list store named by `config` and wire them into a service
pub fn build_service(config: &WanderlistConfig) -> Result<TravelService> {
    let catalog = DestinationCatalog::open(&config.dataset.path, config.dataset.watch_for_changes)?;
    tracing::info!("Serving destinations from {}", catalog.path().display());

    let lists: Arc<dyn ListStore> = match config.lists.backend {
        config::ListBackend::Memory => {
            tracing::info!("Lists are kept in memory and reset on restart");
            Arc::new(MemoryListStore::new())
        }
        config::ListBackend::Persistent => Arc::new(PersistentListStore::open(&config.lists.path)?),
    };

    Ok(TravelService::new(
        Arc::new(catalog),
        lists,
        config.query.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_build_service_requires_dataset() {
        let mut config = WanderlistConfig::default();
        config.dataset.path = "missing/destinations.csv".to_string();
        assert!(matches!(
            build_service(&config),
            Err(WanderlistError::SourceRead { .. })
        ));
    }
}
