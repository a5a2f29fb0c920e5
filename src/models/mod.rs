//! Data models for the Wanderlist service
//!
//! This module contains the core domain models organized by concern:
//! - Destination: a travel location record read from the dataset
//! - List: user-curated collections of destination snapshots

pub mod destination;
pub mod list;

// Re-export all public types for convenient access
pub use destination::Destination;
pub use list::{ListSummary, SortKey, TravelList};
