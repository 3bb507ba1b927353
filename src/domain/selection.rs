//! Operator selection parsing
//!
//! Turns free-form set-route input into a validated, deduplicated, ordered
//! list of catalog ids. Parsing never fails: malformed tokens and unknown ids
//! are silently dropped, and an empty result simply means "no route
//! requested".

use crate::domain::types::{CustomerId, Location};

/// Ordered, deduplicated subset of catalog ids for the current route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<CustomerId>,
}

impl Selection {
    /// Parse raw operator input against the catalog.
    ///
    /// Rules: split on commas, trim each token, discard non-integer tokens,
    /// deduplicate by id preserving first-occurrence order, drop ids absent
    /// from the catalog.
    pub fn parse(raw: &str, catalog: &[Location]) -> Self {
        let mut ids: Vec<CustomerId> = Vec::new();

        for token in raw.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let Ok(id) = token.parse::<i64>() else {
                continue;
            };
            let id = CustomerId(id);
            if ids.contains(&id) {
                continue;
            }
            if catalog.iter().any(|loc| loc.id == id) {
                ids.push(id);
            }
        }

        Self { ids }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn ids(&self) -> &[CustomerId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = CustomerId> + '_ {
        self.ids.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Coordinates;

    fn catalog(ids: &[i64]) -> Vec<Location> {
        ids.iter()
            .map(|&id| Location {
                id: CustomerId(id),
                name: format!("Customer {id}"),
                contact: String::new(),
                coordinates: Coordinates::new(6.0 + id as f64 * 0.01, 80.2),
            })
            .collect()
    }

    fn parsed(raw: &str, catalog_ids: &[i64]) -> Vec<i64> {
        Selection::parse(raw, &catalog(catalog_ids)).iter().map(|id| id.0).collect()
    }

    #[test]
    fn test_dedupe_and_unknown_ids_dropped() {
        // Duplicates collapse to first occurrence; "x" and the unknown id 5
        // are dropped without error
        assert_eq!(parsed("2, 2, x, 5, 1", &[1, 2, 3]), vec![2, 1]);
    }

    #[test]
    fn test_first_occurrence_order_preserved() {
        assert_eq!(parsed("3,1,2,1,3", &[1, 2, 3]), vec![3, 1, 2]);
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(parsed("  1 ,\t2 , 3  ", &[1, 2, 3]), vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_and_garbage_input() {
        assert_eq!(parsed("", &[1, 2, 3]), Vec::<i64>::new());
        assert_eq!(parsed("  ,  , ", &[1, 2, 3]), Vec::<i64>::new());
        assert_eq!(parsed("abc, 1.5, ten", &[1, 2, 3]), Vec::<i64>::new());
    }

    #[test]
    fn test_empty_catalog_yields_empty_selection() {
        assert_eq!(parsed("1,2,3", &[]), Vec::<i64>::new());
    }

    #[test]
    fn test_negative_ids_parse_but_fail_lookup() {
        assert_eq!(parsed("-1, 2", &[1, 2, 3]), vec![2]);
    }
}
