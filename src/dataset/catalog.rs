use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use std::time::SystemTime;
use tracing::{debug, info, instrument, warn};

use super::parser::{DatasetParser, DestinationRow};
use crate::models::Destination;
use crate::{Result, WanderlistError};

/// Indexed snapshot of one dataset load
#[derive(Debug, Default)]
pub struct DestinationIndex {
    /// Records with usable coordinates, in file order
    destinations: Vec<Destination>,
    /// First position of each name in `destinations`
    by_name: HashMap<String, usize>,
    /// Positions in `destinations` per country
    by_country: HashMap<String, Vec<usize>>,
    /// Distinct countries over every row, first-seen order
    countries: Vec<String>,
    /// Distinct destination names per country over every row
    cities: HashMap<String, Vec<String>>,
    source_mtime: Option<SystemTime>,
}

impl DestinationIndex {
    /// Build an index from parsed rows
    #[must_use]
    pub fn from_rows(rows: &[DestinationRow]) -> Self {
        let mut index = Self::default();

        for row in rows {
            if !row.country.is_empty() {
                if !index.cities.contains_key(&row.country) {
                    index.countries.push(row.country.clone());
                    index.cities.insert(row.country.clone(), Vec::new());
                }
                if !row.destination.is_empty() {
                    if let Some(names) = index.cities.get_mut(&row.country) {
                        if !names.contains(&row.destination) {
                            names.push(row.destination.clone());
                        }
                    }
                }
            }

            if let Some(destination) = row.to_destination() {
                let position = index.destinations.len();
                index
                    .by_name
                    .entry(destination.name.clone())
                    .or_insert(position);
                index
                    .by_country
                    .entry(destination.country.clone())
                    .or_default()
                    .push(position);
                index.destinations.push(destination);
            }
        }

        index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    #[must_use]
    pub fn list_all(&self) -> Vec<Destination> {
        self.destinations.clone()
    }

    #[must_use]
    pub fn list_by_country(&self, country: &str) -> Vec<Destination> {
        self.by_country
            .get(country)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&i| self.destinations[i].clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn list_countries(&self) -> Vec<String> {
        self.countries.clone()
    }

    #[must_use]
    pub fn city_names(&self, country: &str) -> Vec<String> {
        self.cities.get(country).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<Destination> {
        self.by_name
            .get(name)
            .map(|&i| self.destinations[i].clone())
    }
}

/// Dataset Reader backed by a CSV file, loaded once and reloaded when the file changes
pub struct DestinationCatalog {
    path: PathBuf,
    watch_for_changes: bool,
    index: RwLock<Arc<DestinationIndex>>,
    /// Modification time of a changed file that failed to parse, so it is not retried per query
    rejected_mtime: Mutex<Option<SystemTime>>,
}

impl DestinationCatalog {
    /// Load the dataset at `path`; fails if the initial read fails
    pub fn open(path: impl Into<PathBuf>, watch_for_changes: bool) -> Result<Self> {
        let path = path.into();
        let index = Self::load_index(&path)?;
        info!(
            "Loaded {} destinations in {} countries from {:?}",
            index.len(),
            index.countries.len(),
            path
        );

        Ok(Self {
            path,
            watch_for_changes,
            index: RwLock::new(Arc::new(index)),
            rejected_mtime: Mutex::new(None),
        })
    }

    /// Build a catalog from an already parsed index, without a backing file to watch
    #[must_use]
    pub fn from_index(index: DestinationIndex) -> Self {
        Self {
            path: PathBuf::new(),
            watch_for_changes: false,
            index: RwLock::new(Arc::new(index)),
            rejected_mtime: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_index(path: &Path) -> Result<DestinationIndex> {
        let source_mtime = DatasetParser::get_file_mtime(path).ok();
        let rows = DatasetParser::load_rows(path)?;
        let mut index = DestinationIndex::from_rows(&rows);
        index.source_mtime = source_mtime;
        Ok(index)
    }

    fn snapshot(&self) -> Result<Arc<DestinationIndex>> {
        self.index
            .read()
            .map(|guard| Arc::clone(&guard))
            .map_err(|_| WanderlistError::source_read("Destination index lock poisoned"))
    }

    fn replace(&self, index: DestinationIndex) -> Result<Arc<DestinationIndex>> {
        let index = Arc::new(index);
        let mut guard = self
            .index
            .write()
            .map_err(|_| WanderlistError::source_read("Destination index lock poisoned"))?;
        *guard = Arc::clone(&index);
        Ok(index)
    }

    /// Force a re-read of the dataset; on failure the previous snapshot stays in place
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn reload(&self) -> Result<usize> {
        let index = Self::load_index(&self.path)?;
        let count = index.len();
        self.replace(index)?;
        info!("Reloaded {} destinations", count);
        Ok(count)
    }

    /// Current snapshot, reloading first if the source file changed since it was read
    fn current(&self) -> Result<Arc<DestinationIndex>> {
        let index = self.snapshot()?;
        if !self.watch_for_changes {
            return Ok(index);
        }

        let current_mtime = match DatasetParser::get_file_mtime(&self.path) {
            Ok(mtime) => mtime,
            Err(e) => {
                warn!("Could not check dataset mtime, serving cached destinations: {}", e);
                return Ok(index);
            }
        };

        if index.source_mtime.is_some_and(|cached| current_mtime <= cached) {
            return Ok(index);
        }

        let mut rejected = self
            .rejected_mtime
            .lock()
            .map_err(|_| WanderlistError::source_read("Dataset reload lock poisoned"))?;
        if *rejected == Some(current_mtime) {
            return Ok(index);
        }

        debug!("Dataset file modified, reloading {:?}", self.path);
        match Self::load_index(&self.path) {
            Ok(fresh) => {
                *rejected = None;
                info!("Dataset changed on disk, now {} destinations", fresh.len());
                self.replace(fresh)
            }
            Err(e) => {
                warn!("Changed dataset could not be read, serving cached destinations: {}", e);
                *rejected = Some(current_mtime);
                Ok(index)
            }
        }
    }

    pub fn list_all(&self) -> Result<Vec<Destination>> {
        Ok(self.current()?.list_all())
    }

    pub fn list_by_country(&self, country: &str) -> Result<Vec<Destination>> {
        Ok(self.current()?.list_by_country(country))
    }

    pub fn list_countries(&self) -> Result<Vec<String>> {
        Ok(self.current()?.list_countries())
    }

    pub fn city_names(&self, country: &str) -> Result<Vec<String>> {
        Ok(self.current()?.city_names(country))
    }

    pub fn find_by_name(&self, name: &str) -> Result<Option<Destination>> {
        Ok(self.current()?.find_by_name(name))
    }
}
