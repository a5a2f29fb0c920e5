use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, info, warn};

use crate::models::Destination;
use crate::{Result, WanderlistError};

/// Leading byte-order mark some spreadsheet exports put before the first header
const BOM: char = '\u{feff}';

/// CSV parser for the destinations dataset
pub struct DatasetParser;

/// One dataset row, keyed by the CSV header names
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DestinationRow {
    #[serde(rename = "Destination")]
    pub destination: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Latitude")]
    pub latitude: String,
    #[serde(rename = "Longitude")]
    pub longitude: String,
    #[serde(rename = "Approximate Annual Tourists")]
    pub tourists: String,
    #[serde(rename = "Currency")]
    pub currency: String,
    #[serde(rename = "Majority Religion")]
    pub religion: String,
    #[serde(rename = "Famous Foods")]
    pub food: String,
    #[serde(rename = "Language")]
    pub language: String,
    #[serde(rename = "Best Time to Visit")]
    pub best_time: String,
    #[serde(rename = "Cost of Living")]
    pub cost: String,
    #[serde(rename = "Safety")]
    pub safety: String,
    #[serde(rename = "Cultural Significance")]
    pub significance: String,
    #[serde(rename = "Description")]
    pub description: String,
}

impl DestinationRow {
    /// Convert to a `Destination`, or `None` when a coordinate is missing or not a number
    #[must_use]
    pub fn to_destination(&self) -> Option<Destination> {
        let latitude = parse_coordinate(&self.latitude)?;
        let longitude = parse_coordinate(&self.longitude)?;

        Some(Destination {
            name: self.destination.clone(),
            country: self.country.clone(),
            region: self.region.clone(),
            latitude,
            longitude,
            tourists: self.tourists.clone(),
            currency: self.currency.clone(),
            religion: self.religion.clone(),
            food: self.food.clone(),
            language: self.language.clone(),
            best_time: self.best_time.clone(),
            cost: self.cost.clone(),
            safety: self.safety.clone(),
            significance: self.significance.clone(),
            description: self.description.clone(),
        })
    }
}

fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn normalize_headers(headers: &StringRecord) -> StringRecord {
    headers
        .iter()
        .map(|h| h.trim_start_matches(BOM).trim())
        .collect()
}

impl DatasetParser {
    /// Load and parse the dataset file
    pub fn load_rows<P: AsRef<Path>>(csv_path: P) -> Result<Vec<DestinationRow>> {
        let csv_path = csv_path.as_ref();
        info!("Loading destinations from: {:?}", csv_path);

        let file = fs::File::open(csv_path).map_err(|e| {
            WanderlistError::source_read(format!("{}: {e}", csv_path.display()))
        })?;

        Self::parse_rows(file)
    }

    /// Parse CSV content into raw rows, keeping rows without coordinates
    pub fn parse_rows<R: Read>(reader: R) -> Result<Vec<DestinationRow>> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Fields)
            .from_reader(reader);

        let headers = normalize_headers(reader.headers()?);
        if !headers.iter().any(|h| h == "Destination") {
            return Err(WanderlistError::source_read(
                "Dataset header has no Destination column",
            ));
        }

        let headers = headers.into_byte_record();
        let mut rows = Vec::new();
        let mut skipped = 0;

        // Byte records so a row with invalid UTF-8 is skipped rather than failing the load
        for (line, record) in reader.byte_records().enumerate() {
            let record = record?;
            match record.deserialize::<DestinationRow>(Some(&headers)) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    warn!("Skipping dataset row {}: {}", line + 2, e);
                    skipped += 1;
                }
            }
        }

        debug!("Parsed {} dataset rows ({} skipped)", rows.len(), skipped);
        Ok(rows)
    }

    /// Get file modification time for staleness checks
    pub fn get_file_mtime<P: AsRef<Path>>(csv_path: P) -> Result<SystemTime> {
        let metadata = fs::metadata(csv_path.as_ref()).map_err(|e| {
            WanderlistError::source_read(format!("Failed to get file metadata: {e}"))
        })?;

        metadata.modified().map_err(|e| {
            WanderlistError::source_read(format!("Failed to get file modification time: {e}"))
        })
    }
}
