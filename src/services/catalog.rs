//! Location store - the per-session catalog of known customer locations
//!
//! Loaded once at session start and immutable afterwards. An empty store is
//! a valid degraded state (catalog fetch failed); selection parsing against
//! it always yields an empty selection.

use crate::domain::types::{CustomerId, Location};
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct LocationStore {
    locations: Vec<Location>,
    index: FxHashMap<CustomerId, usize>,
}

impl LocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the loaded catalog. Called once, on `CatalogLoaded`; a second
    /// call replaces the catalog wholesale (the session never does this
    /// mid-flight).
    pub fn install(&mut self, locations: Vec<Location>) {
        self.index =
            locations.iter().enumerate().map(|(idx, loc)| (loc.id, idx)).collect();
        self.locations = locations;
    }

    pub fn get(&self, id: CustomerId) -> Option<&Location> {
        self.index.get(&id).map(|&idx| &self.locations[idx])
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Coordinates;

    fn loc(id: i64) -> Location {
        Location {
            id: CustomerId(id),
            name: format!("Customer {id}"),
            contact: String::new(),
            coordinates: Coordinates::new(6.0, 80.2),
        }
    }

    #[test]
    fn test_empty_store() {
        let store = LocationStore::new();
        assert!(store.is_empty());
        assert!(store.get(CustomerId(1)).is_none());
    }

    #[test]
    fn test_install_and_lookup() {
        let mut store = LocationStore::new();
        store.install(vec![loc(1), loc(5), loc(9)]);

        assert_eq!(store.len(), 3);
        assert_eq!(store.get(CustomerId(5)).map(|l| l.id), Some(CustomerId(5)));
        assert!(store.get(CustomerId(2)).is_none());
    }

    #[test]
    fn test_install_replaces() {
        let mut store = LocationStore::new();
        store.install(vec![loc(1)]);
        store.install(vec![loc(2)]);

        assert!(store.get(CustomerId(1)).is_none());
        assert!(store.get(CustomerId(2)).is_some());
    }
}
