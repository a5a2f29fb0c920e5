//! Dataset Reader
//!
//! Parses the destinations CSV and serves location queries from an in-memory
//! index that is rebuilt when the source file changes or on explicit reload.

pub mod catalog;
pub mod parser;

pub use catalog::{DestinationCatalog, DestinationIndex};
pub use parser::{DatasetParser, DestinationRow};
