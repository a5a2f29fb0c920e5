//! Destination model for dataset records

use serde::{Deserialize, Serialize};

/// A travel destination with descriptive and geographic attributes
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    /// Destination name, used as the lookup key
    pub name: String,
    pub country: String,
    pub region: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Approximate annual tourists, kept as the dataset's free text
    pub tourists: String,
    pub currency: String,
    pub religion: String,
    pub food: String,
    pub language: String,
    pub best_time: String,
    pub cost: String,
    pub safety: String,
    pub significance: String,
    pub description: String,
}

impl Destination {
    /// Create a destination with only name, country and coordinates set
    #[must_use]
    pub fn new(name: impl Into<String>, country: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            region: String::new(),
            latitude,
            longitude,
            tourists: String::new(),
            currency: String::new(),
            religion: String::new(),
            food: String::new(),
            language: String::new(),
            best_time: String::new(),
            cost: String::new(),
            safety: String::new(),
            significance: String::new(),
            description: String::new(),
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
