#![deny(missing_docs)]

//! # Queries
//!
//! Loosely typed request parameters (`Query`), the declarative schema that
//! validates them (`QuerySchema`), and the fully populated, read-only result of
//! validation (`ResolvedQuery`).
//!
//! A `Query` is never mutated by validation; resolved defaults are carried by
//! the returned `ResolvedQuery` instead.

use crate::error::{AppError, AppResult};
use crate::platform::Platform;
use indexmap::IndexMap;
use std::collections::BTreeSet;

pub mod defaults;
pub mod fingerprint;
pub mod schema;
pub mod value;

pub use fingerprint::QueryFingerprint;
pub use schema::{Field, QuerySchema};
pub use value::{FieldKind, QueryValue};

/// Well-known parameter names.
pub mod keys {
    /// Single entity id.
    pub const ID: &str = "id";
    /// Single entity name.
    pub const NAME: &str = "name";
    /// Many entity ids.
    pub const IDS: &str = "ids";
    /// Target platform.
    pub const PLATFORM: &str = "platform";
    /// Many target platforms.
    pub const PLATFORMS: &str = "platforms";
    /// Data version.
    pub const VERSION: &str = "version";
    /// Locale, e.g. `en_US`.
    pub const LOCALE: &str = "locale";
    /// Included-data tag set.
    pub const INCLUDED_DATA: &str = "includedData";
    /// Key list payload by id instead of by name.
    pub const DATA_BY_ID: &str = "dataById";
}

/// An ordered mapping from parameter name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: IndexMap<String, QueryValue>,
}

impl Query {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or replaces a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.params.insert(key.into(), value.into());
    }

    /// Removes a parameter, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        self.params.shift_remove(key)
    }

    /// Parameter lookup.
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.params.get(key)
    }

    /// True if the parameter is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// True when no parameter is set.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterates parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &QueryValue)> {
        self.params.iter()
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Query::new();
        for (k, v) in iter {
            query.insert(k, v);
        }
        query
    }
}

/// The validated form of a `Query`: every required key present with the right
/// type, and every defaultable key filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuery {
    params: IndexMap<String, QueryValue>,
}

impl ResolvedQuery {
    pub(crate) fn new(params: IndexMap<String, QueryValue>) -> Self {
        Self { params }
    }

    /// Parameter lookup.
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.params.get(key)
    }

    /// True if the parameter is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// The target platform.
    pub fn platform(&self) -> AppResult<Platform> {
        match self.params.get(keys::PLATFORM) {
            Some(QueryValue::Platform(p)) => Ok(*p),
            _ => Err(AppError::invalid("Query has no resolved 'platform'")),
        }
    }

    /// The target platforms of a fan-out query.
    pub fn platforms(&self) -> AppResult<&[Platform]> {
        match self.params.get(keys::PLATFORMS) {
            Some(QueryValue::PlatformList(p)) => Ok(p),
            _ => Err(AppError::invalid("Query has no resolved 'platforms'")),
        }
    }

    /// The requested ids of a fan-out query.
    pub fn ids(&self) -> AppResult<&[i64]> {
        match self.params.get(keys::IDS) {
            Some(QueryValue::IntList(ids)) => Ok(ids),
            _ => Err(AppError::invalid("Query has no resolved 'ids'")),
        }
    }

    /// The single entity id, if identified by id.
    pub fn id(&self) -> Option<i64> {
        match self.params.get(keys::ID) {
            Some(QueryValue::Int(id)) => Some(*id),
            _ => None,
        }
    }

    /// The single entity name, if identified by name.
    pub fn name(&self) -> Option<&str> {
        self.str_param(keys::NAME)
    }

    /// Version, when given or defaulted.
    pub fn version(&self) -> Option<&str> {
        self.str_param(keys::VERSION)
    }

    /// Locale, when given or defaulted.
    pub fn locale(&self) -> Option<&str> {
        self.str_param(keys::LOCALE)
    }

    /// Included-data tags, when the schema carries them.
    pub fn included_data(&self) -> Option<&BTreeSet<String>> {
        match self.params.get(keys::INCLUDED_DATA) {
            Some(QueryValue::Tags(tags)) => Some(tags),
            _ => None,
        }
    }

    /// `dataById` flag; absent means false.
    pub fn data_by_id(&self) -> bool {
        matches!(self.params.get(keys::DATA_BY_ID), Some(QueryValue::Bool(true)))
    }

    /// Canonical cache key.
    pub fn fingerprint(&self) -> QueryFingerprint {
        QueryFingerprint::of(&self.params)
    }

    /// A fresh input query carrying every resolved parameter except `excluded`.
    pub fn to_query_without(&self, excluded: &[&str]) -> Query {
        self.params
            .iter()
            .filter(|(k, _)| !excluded.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn str_param(&self, key: &str) -> Option<&str> {
        match self.params.get(key) {
            Some(QueryValue::Str(s)) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder_keeps_insertion_order() {
        let query = Query::new()
            .with(keys::PLATFORM, Platform::Na1)
            .with(keys::NAME, "Teemo")
            .with(keys::LOCALE, "en_US");
        let order: Vec<&str> = query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(order, vec!["platform", "name", "locale"]);
    }

    #[test]
    fn test_remove_preserves_remaining_order() {
        let mut query = Query::new()
            .with("a", 1)
            .with("b", 2)
            .with("c", 3);
        assert_eq!(query.remove("b"), Some(QueryValue::Int(2)));
        let order: Vec<&str> = query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(order, vec!["a", "c"]);
    }

    #[test]
    fn test_to_query_without_strips_identity() {
        let resolved = ResolvedQuery::new(
            Query::new()
                .with(keys::ID, 17)
                .with(keys::PLATFORM, Platform::Na1)
                .with(keys::VERSION, "7.24.1")
                .params,
        );
        let stripped = resolved.to_query_without(&[keys::ID, keys::NAME]);
        assert!(!stripped.contains(keys::ID));
        assert_eq!(stripped.len(), 2);
        assert_eq!(resolved.platform().unwrap(), Platform::Na1);
        assert_eq!(resolved.id(), Some(17));
        assert!(!resolved.data_by_id());
    }
}
