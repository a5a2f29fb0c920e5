//! User-curated destination lists

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Destination;
use crate::WanderlistError;

/// A named collection of destination snapshots
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TravelList {
    pub id: u64,
    pub name: String,
    /// Copies taken when each destination was added, in insertion order
    pub destinations: Vec<Destination>,
}

impl TravelList {
    #[must_use]
    pub fn new(id: u64, name: String) -> Self {
        Self {
            id,
            name,
            destinations: Vec::new(),
        }
    }

    #[must_use]
    pub fn contains(&self, destination_name: &str) -> bool {
        self.destinations.iter().any(|d| d.name == destination_name)
    }

    #[must_use]
    pub fn summary(&self) -> ListSummary {
        ListSummary {
            id: self.id,
            name: self.name.clone(),
        }
    }

    /// Return a copy whose destinations are ordered by `key`
    #[must_use]
    pub fn sorted_by(&self, key: SortKey) -> Self {
        let mut sorted = self.clone();
        sorted.destinations.sort_by(|a, b| key.compare(a, b));
        sorted
    }
}

/// List identity without its destinations, for selection menus
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ListSummary {
    pub id: u64,
    pub name: String,
}

/// Destination attribute a list can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Country,
    Region,
    Latitude,
    Longitude,
    Tourists,
    Currency,
    Religion,
    Food,
    Language,
    BestTime,
    Cost,
    Safety,
    Significance,
    Description,
}

impl SortKey {
    fn text<'a>(self, destination: &'a Destination) -> &'a str {
        match self {
            SortKey::Name => &destination.name,
            SortKey::Country => &destination.country,
            SortKey::Region => &destination.region,
            SortKey::Tourists => &destination.tourists,
            SortKey::Currency => &destination.currency,
            SortKey::Religion => &destination.religion,
            SortKey::Food => &destination.food,
            SortKey::Language => &destination.language,
            SortKey::BestTime => &destination.best_time,
            SortKey::Cost => &destination.cost,
            SortKey::Safety => &destination.safety,
            SortKey::Significance => &destination.significance,
            SortKey::Description => &destination.description,
            SortKey::Latitude | SortKey::Longitude => "",
        }
    }

    /// Compare two destinations on this attribute
    #[must_use]
    pub fn compare(self, a: &Destination, b: &Destination) -> Ordering {
        match self {
            SortKey::Latitude => a.latitude.total_cmp(&b.latitude),
            SortKey::Longitude => a.longitude.total_cmp(&b.longitude),
            _ => self.text(a).cmp(self.text(b)),
        }
    }
}

impl FromStr for SortKey {
    type Err = WanderlistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "name" => SortKey::Name,
            "country" => SortKey::Country,
            "region" => SortKey::Region,
            "latitude" => SortKey::Latitude,
            "longitude" => SortKey::Longitude,
            "tourists" => SortKey::Tourists,
            "currency" => SortKey::Currency,
            "religion" => SortKey::Religion,
            "food" => SortKey::Food,
            "language" => SortKey::Language,
            "bestTime" => SortKey::BestTime,
            "cost" => SortKey::Cost,
            "safety" => SortKey::Safety,
            "significance" => SortKey::Significance,
            "description" => SortKey::Description,
            other => {
                return Err(WanderlistError::validation(format!(
                    "Cannot sort by '{other}'"
                )));
            }
        };
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample_list() -> TravelList {
        let mut list = TravelList::new(1, "Summer".to_string());
        let mut rome = Destination::new("Rome", "Italy", 41.9, 12.5);
        rome.cost = "High".to_string();
        let mut lisbon = Destination::new("Lisbon", "Portugal", 38.7, -9.1);
        lisbon.cost = "Medium".to_string();
        let mut oslo = Destination::new("Oslo", "Norway", 59.9, 10.7);
        oslo.cost = "High".to_string();
        list.destinations = vec![rome, lisbon, oslo];
        list
    }

    fn names(list: &TravelList) -> Vec<&str> {
        list.destinations.iter().map(|d| d.name.as_str()).collect()
    }

    #[rstest]
    #[case(SortKey::Name, vec!["Lisbon", "Oslo", "Rome"])]
    #[case(SortKey::Country, vec!["Rome", "Oslo", "Lisbon"])]
    #[case(SortKey::Latitude, vec!["Lisbon", "Rome", "Oslo"])]
    #[case(SortKey::Longitude, vec!["Lisbon", "Oslo", "Rome"])]
    #[case(SortKey::Cost, vec!["Rome", "Oslo", "Lisbon"])]
    fn test_sorted_by(#[case] key: SortKey, #[case] expected: Vec<&str>) {
        let list = sample_list();
        assert_eq!(names(&list.sorted_by(key)), expected);
    }

    #[test]
    fn test_sorting_leaves_original_untouched() {
        let list = sample_list();
        let _ = list.sorted_by(SortKey::Name);
        assert_eq!(names(&list), vec!["Rome", "Lisbon", "Oslo"]);
    }

    #[rstest]
    #[case("name", SortKey::Name)]
    #[case("bestTime", SortKey::BestTime)]
    #[case("significance", SortKey::Significance)]
    fn test_sort_key_parsing(#[case] input: &str, #[case] expected: SortKey) {
        assert_eq!(input.parse::<SortKey>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_sort_key_is_validation_error() {
        let err = "best_time".parse::<SortKey>().unwrap_err();
        assert!(matches!(err, WanderlistError::Validation { .. }));
    }

    #[test]
    fn test_contains_and_summary() {
        let list = sample_list();
        assert!(list.contains("Oslo"));
        assert!(!list.contains("oslo"));
        assert_eq!(
            list.summary(),
            ListSummary {
                id: 1,
                name: "Summer".to_string()
            }
        );
    }
}
