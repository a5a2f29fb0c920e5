//! Query Service
//!
//! Composes the destination catalog and the list store into the operations the
//! HTTP layer exposes: location queries with pagination and list management.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::config::QueryConfig;
use crate::dataset::DestinationCatalog;
use crate::lists::ListStore;
use crate::models::{Destination, ListSummary, SortKey, TravelList};
use crate::{Result, WanderlistError};

/// One page of a filtered location query
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationPage {
    /// Matches across all pages
    pub total_results: usize,
    pub locations: Vec<Destination>,
}

/// Validated page size and 1-based page number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub page: usize,
}

impl PageRequest {
    /// Build from untrusted query text; missing, non-numeric or zero values fall back to defaults
    #[must_use]
    pub fn from_query(limit: Option<&str>, page: Option<&str>, config: &QueryConfig) -> Self {
        Self {
            limit: parse_positive(limit)
                .unwrap_or(config.default_limit)
                .min(config.max_limit),
            page: parse_positive(page).unwrap_or(1),
        }
    }

    /// Index of the first item on this page
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Slice `items` down to this page
    #[must_use]
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().skip(self.offset()).take(self.limit).collect()
    }
}

fn parse_positive(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&v| v >= 1)
}

/// Location queries and list management over a catalog and a list store
#[derive(Clone)]
pub struct TravelService {
    catalog: Arc<DestinationCatalog>,
    lists: Arc<dyn ListStore>,
    query: QueryConfig,
}

impl TravelService {
    pub fn new(catalog: Arc<DestinationCatalog>, lists: Arc<dyn ListStore>, query: QueryConfig) -> Self {
        Self {
            catalog,
            lists,
            query,
        }
    }

    #[must_use]
    pub fn query_config(&self) -> &QueryConfig {
        &self.query
    }

    pub fn locations(&self) -> Result<Vec<Destination>> {
        self.catalog.list_all()
    }

    /// One page of the destinations in `country`; no country matches nothing
    #[instrument(skip(self))]
    pub fn filtered_locations(&self, country: Option<&str>, page: PageRequest) -> Result<LocationPage> {
        let matches = match country {
            Some(country) => self.catalog.list_by_country(country)?,
            None => Vec::new(),
        };

        let total_results = matches.len();
        let locations = page.apply(matches);
        debug!(
            "Returning {} of {} locations (page {}, limit {})",
            locations.len(),
            total_results,
            page.page,
            page.limit
        );

        Ok(LocationPage {
            total_results,
            locations,
        })
    }

    pub fn countries(&self) -> Result<Vec<String>> {
        self.catalog.list_countries()
    }

    pub fn cities(&self, country: Option<&str>) -> Result<Vec<String>> {
        match country {
            Some(country) => self.catalog.city_names(country),
            None => Ok(Vec::new()),
        }
    }

    /// Re-read the dataset, returning the number of located destinations
    pub fn reload_dataset(&self) -> Result<usize> {
        self.catalog.reload()
    }

    pub async fn lists(&self) -> Result<Vec<TravelList>> {
        self.lists.lists().await
    }

    pub async fn list_summaries(&self) -> Result<Vec<ListSummary>> {
        self.lists.summaries().await
    }

    pub async fn create_list(&self, name: &str) -> Result<TravelList> {
        self.lists.create_list(name).await
    }

    /// Fetch a list, optionally with its destinations ordered by `sort`
    pub async fn get_list(&self, id: u64, sort: Option<SortKey>) -> Result<TravelList> {
        let list = self.lists.get_list(id).await?;
        Ok(match sort {
            Some(key) => list.sorted_by(key),
            None => list,
        })
    }

    pub async fn rename_list(&self, id: u64, name: &str) -> Result<TravelList> {
        self.lists.rename_list(id, name).await
    }

    pub async fn delete_list(&self, id: u64) -> Result<()> {
        self.lists.delete_list(id).await
    }

    /// Snapshot the named dataset destination into list `id`
    #[instrument(skip(self))]
    pub async fn add_destination(&self, id: u64, destination_name: &str) -> Result<TravelList> {
        // Unknown list is reported before an unknown destination
        self.lists.get_list(id).await?;

        let destination = self
            .catalog
            .find_by_name(destination_name)?
            .ok_or_else(|| WanderlistError::DestinationNotFound {
                name: destination_name.to_string(),
            })?;

        info!(
            "Adding {} ({}) to list {}",
            destination.name,
            destination.format_coordinates(),
            id
        );
        self.lists.add_destination(id, destination).await
    }

    pub async fn remove_destination(&self, id: u64, destination_name: &str) -> Result<TravelList> {
        self.lists.remove_destination(id, destination_name).await
    }
}
