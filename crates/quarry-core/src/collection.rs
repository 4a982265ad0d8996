//! Result collection with out-of-band metadata.
//!
//! [`ApiCollection`] is an ordered sequence of typed records plus the
//! pagination/aggregation/suggestion blocks the remote API returned next
//! to them. Metadata is read-only query context: attaching it never alters
//! the records, and it takes no part in equality.

use std::ops::Index;
use std::slice;

use serde::Deserialize;
use serde_json::Value;

use crate::wire::ResponseEnvelope;

/// Side-channel blocks carried alongside the records.
///
/// Every field defaults to absent; a missing block stays `None` rather
/// than being null-filled.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub pagination: Option<Value>,
    pub aggregations: Option<Value>,
    pub suggestions: Option<Value>,
    /// The full envelope the records were extracted from.
    pub response: Option<ResponseEnvelope>,
}

impl Metadata {
    /// Typed view of the pagination block, when one is present and parses.
    pub fn pagination_data(&self) -> Option<PaginationData> {
        self.pagination
            .as_ref()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

/// Pagination block as reported by the remote API.
///
/// Tolerant of both camelCase and snake_case field spellings since remote
/// envelopes differ on this.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaginationData {
    pub total: u64,
    #[serde(default, alias = "perPage", alias = "limit")]
    pub per_page: Option<u64>,
    #[serde(default, alias = "currentPage", alias = "page")]
    pub current_page: Option<u64>,
}

/// Ordered sequence of records plus metadata.
#[derive(Debug, Clone, Default)]
pub struct ApiCollection<T> {
    records: Vec<T>,
    metadata: Metadata,
}

impl<T> ApiCollection<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records,
            metadata: Metadata::default(),
        }
    }

    /// Attach metadata without touching the records.
    pub fn set_metadata(&mut self, metadata: Metadata) {
        self.metadata = metadata;
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn first(&self) -> Option<&T> {
        self.records.first()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Consume the collection, dropping the metadata.
    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}

impl<T> Index<usize> for ApiCollection<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.records[index]
    }
}

impl<T> IntoIterator for ApiCollection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ApiCollection<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metadata_attaches_without_altering_records() {
        let mut collection = ApiCollection::new(vec![1, 2, 3]);
        collection.set_metadata(Metadata {
            pagination: Some(json!({"total": 40})),
            ..Metadata::default()
        });

        assert_eq!(collection.len(), 3);
        assert_eq!(collection[0], 1);
        assert_eq!(
            collection.metadata().pagination,
            Some(json!({"total": 40}))
        );
        assert!(collection.metadata().aggregations.is_none());
        assert!(collection.metadata().suggestions.is_none());
    }

    #[test]
    fn pagination_data_parses_both_spellings() {
        let camel = Metadata {
            pagination: Some(json!({"total": 120, "perPage": 15, "currentPage": 3})),
            ..Metadata::default()
        };
        let snake = Metadata {
            pagination: Some(json!({"total": 120, "per_page": 15, "current_page": 3})),
            ..Metadata::default()
        };

        let expected = PaginationData {
            total: 120,
            per_page: Some(15),
            current_page: Some(3),
        };
        assert_eq!(camel.pagination_data(), Some(expected.clone()));
        assert_eq!(snake.pagination_data(), Some(expected));
    }

    #[test]
    fn pagination_data_requires_a_total() {
        let metadata = Metadata {
            pagination: Some(json!({"perPage": 15})),
            ..Metadata::default()
        };
        assert_eq!(metadata.pagination_data(), None);
    }

    #[test]
    fn iteration_covers_records_in_order() {
        let collection = ApiCollection::new(vec!["a", "b"]);
        let seen: Vec<_> = collection.iter().copied().collect();
        assert_eq!(seen, vec!["a", "b"]);
    }
}
