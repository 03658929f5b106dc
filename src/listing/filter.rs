use std::collections::BTreeMap;

use serde::Serialize;

/// Sentinel option value meaning "do not constrain this field".
pub const ALL: &str = "all";

/// User-selected filter settings for one listing.
///
/// A record is visible when the free-text query matches at least one of its
/// searchable fields and every categorical selection matches exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    query: String,
    selections: BTreeMap<String, String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the free-text query. Whitespace-only input clears it.
    pub fn search(mut self, query: &str) -> Self {
        self.query = query.trim().to_string();
        self
    }

    /// Constrains a categorical field. The [`ALL`] sentinel and blank values
    /// leave the field unconstrained.
    pub fn select(mut self, field: &str, value: &str) -> Self {
        let value = value.trim();
        if !value.is_empty() && !value.eq_ignore_ascii_case(ALL) {
            self.selections.insert(field.to_string(), value.to_string());
        }
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.selections.is_empty()
    }
}

/// Record types that expose fields to the listing filter.
pub trait Filterable {
    /// Values scanned by the free-text query.
    fn search_fields(&self) -> Vec<String>;

    /// Current value of a categorical field, or `None` when the record has no
    /// such field. Records without the field never match a selection on it.
    fn category(&self, field: &str) -> Option<String>;
}

/// Evaluates one record against the criteria. Both sides of every comparison
/// are lower-cased first.
pub fn matches<T: Filterable>(record: &T, criteria: &FilterCriteria) -> bool {
    if !criteria.query.is_empty() {
        let needle = criteria.query.to_lowercase();
        let found = record
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));
        if !found {
            return false;
        }
    }

    criteria.selections.iter().all(|(field, wanted)| {
        record
            .category(field)
            .is_some_and(|value| value.to_lowercase() == wanted.to_lowercase())
    })
}

/// Keeps the records matching the criteria, preserving input order.
pub fn apply<T: Filterable + Clone>(records: &[T], criteria: &FilterCriteria) -> Vec<T> {
    records
        .iter()
        .filter(|record| matches(*record, criteria))
        .cloned()
        .collect()
}
