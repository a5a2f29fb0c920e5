use serde::{Deserialize, Serialize};

use crate::models::{Destination, TravelList};
use crate::{Result, WanderlistError};

/// Every list plus the id counter; the unit both store backends guard and persist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListCollection {
    /// Next id to hand out; only ever increases
    next_id: u64,
    lists: Vec<TravelList>,
}

impl Default for ListCollection {
    fn default() -> Self {
        Self {
            next_id: 1,
            lists: Vec::new(),
        }
    }
}

/// Trim a requested list name, rejecting blank input
pub fn normalize_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(WanderlistError::validation("List name is required"));
    }
    Ok(trimmed.to_string())
}

impl ListCollection {
    #[must_use]
    pub fn lists(&self) -> &[TravelList] {
        &self.lists
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    fn name_taken(&self, name: &str, except: Option<u64>) -> bool {
        self.lists
            .iter()
            .any(|l| l.name == name && Some(l.id) != except)
    }

    fn find_mut(&mut self, id: u64) -> Result<&mut TravelList> {
        self.lists
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(WanderlistError::ListNotFound { id })
    }

    pub fn get(&self, id: u64) -> Result<&TravelList> {
        self.lists
            .iter()
            .find(|l| l.id == id)
            .ok_or(WanderlistError::ListNotFound { id })
    }

    pub fn create(&mut self, name: &str) -> Result<TravelList> {
        let name = normalize_name(name)?;
        if self.name_taken(&name, None) {
            return Err(WanderlistError::DuplicateName { name });
        }

        let list = TravelList::new(self.next_id, name);
        self.next_id += 1;
        self.lists.push(list.clone());
        Ok(list)
    }

    pub fn rename(&mut self, id: u64, name: &str) -> Result<TravelList> {
        let name = normalize_name(name)?;
        // Look the list up first so an unknown id wins over a name clash
        self.get(id)?;
        if self.name_taken(&name, Some(id)) {
            return Err(WanderlistError::DuplicateName { name });
        }

        let list = self.find_mut(id)?;
        list.name = name;
        Ok(list.clone())
    }

    pub fn delete(&mut self, id: u64) -> Result<TravelList> {
        let position = self
            .lists
            .iter()
            .position(|l| l.id == id)
            .ok_or(WanderlistError::ListNotFound { id })?;
        Ok(self.lists.remove(position))
    }

    pub fn add_destination(&mut self, id: u64, destination: Destination) -> Result<TravelList> {
        let list = self.find_mut(id)?;
        if list.contains(&destination.name) {
            return Err(WanderlistError::DuplicateDestination {
                name: destination.name,
            });
        }

        list.destinations.push(destination);
        Ok(list.clone())
    }

    pub fn remove_destination(&mut self, id: u64, destination_name: &str) -> Result<TravelList> {
        let list = self.find_mut(id)?;
        let position = list
            .destinations
            .iter()
            .position(|d| d.name == destination_name)
            .ok_or_else(|| WanderlistError::DestinationNotInList {
                name: destination_name.to_string(),
            })?;

        list.destinations.remove(position);
        Ok(list.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn test_blank_names_are_rejected(#[case] name: &str) {
        let mut collection = ListCollection::default();
        let err = collection.create(name).unwrap_err();
        assert!(matches!(err, WanderlistError::Validation { .. }));
        assert!(collection.is_empty());
    }

    #[test]
    fn test_names_are_trimmed() {
        let mut collection = ListCollection::default();
        let list = collection.create("  Europe Trip ").unwrap();
        assert_eq!(list.name, "Europe Trip");

        let err = collection.create("Europe Trip").unwrap_err();
        assert!(matches!(err, WanderlistError::DuplicateName { .. }));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let mut collection = ListCollection::default();
        let first = collection.create("One").unwrap();
        let second = collection.create("Two").unwrap();
        collection.delete(second.id).unwrap();

        let third = collection.create("Three").unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(third.id, 3);
    }

    #[test]
    fn test_rename_enforces_unique_names() {
        let mut collection = ListCollection::default();
        let one = collection.create("One").unwrap();
        collection.create("Two").unwrap();

        let err = collection.rename(one.id, "Two").unwrap_err();
        assert!(matches!(err, WanderlistError::DuplicateName { .. }));

        let same = collection.rename(one.id, "One").unwrap();
        assert_eq!(same.name, "One");

        let renamed = collection.rename(one.id, "Uno").unwrap();
        assert_eq!(renamed.name, "Uno");
        assert_eq!(collection.get(one.id).unwrap().name, "Uno");
    }

    #[test]
    fn test_rename_unknown_list() {
        let mut collection = ListCollection::default();
        collection.create("Taken").unwrap();
        let err = collection.rename(42, "Taken").unwrap_err();
        assert!(matches!(err, WanderlistError::ListNotFound { id: 42 }));
    }

    #[test]
    fn test_duplicate_destination_is_rejected() {
        let mut collection = ListCollection::default();
        let list = collection.create("Trip").unwrap();
        let paris = Destination::new("Paris", "France", 48.85, 2.35);

        collection.add_destination(list.id, paris.clone()).unwrap();
        let err = collection.add_destination(list.id, paris).unwrap_err();
        assert!(matches!(err, WanderlistError::DuplicateDestination { .. }));
        assert_eq!(collection.get(list.id).unwrap().destinations.len(), 1);
    }

    #[test]
    fn test_remove_destination_errors() {
        let mut collection = ListCollection::default();
        let list = collection.create("Trip").unwrap();

        let err = collection.remove_destination(list.id, "Paris").unwrap_err();
        assert!(matches!(err, WanderlistError::DestinationNotInList { .. }));

        let err = collection.remove_destination(99, "Paris").unwrap_err();
        assert!(matches!(err, WanderlistError::ListNotFound { id: 99 }));
    }
}
