//! Canonical, order-independent identity of a query, used as the list cache key.

use super::value::QueryValue;
use crate::platform::Platform;
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// One canonicalized parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FingerprintPart {
    /// Integer.
    Int(i64),
    /// String.
    Str(String),
    /// Boolean.
    Bool(bool),
    /// Platform.
    Platform(Platform),
    /// Ordered integer list.
    IntList(Vec<i64>),
    /// Ordered string list.
    StrList(Vec<String>),
    /// Ordered platform list.
    PlatformList(Vec<Platform>),
    /// A tag set reduced to its sorted, comma separated members.
    TagSet(String),
}

impl From<&QueryValue> for FingerprintPart {
    fn from(value: &QueryValue) -> Self {
        match value {
            QueryValue::Int(v) => FingerprintPart::Int(*v),
            QueryValue::Str(v) => FingerprintPart::Str(v.clone()),
            QueryValue::Bool(v) => FingerprintPart::Bool(*v),
            QueryValue::Platform(v) => FingerprintPart::Platform(*v),
            QueryValue::IntList(v) => FingerprintPart::IntList(v.clone()),
            QueryValue::StrList(v) => FingerprintPart::StrList(v.clone()),
            QueryValue::PlatformList(v) => FingerprintPart::PlatformList(v.clone()),
            QueryValue::Tags(v) => FingerprintPart::TagSet(hash_tags(v.iter())),
        }
    }
}

/// Stable reduction of a tag set, independent of iteration order.
pub fn hash_tags<'a>(tags: impl Iterator<Item = &'a String>) -> String {
    let mut sorted: Vec<&str> = tags.map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.join(",")
}

/// Sorted `(key, value)` pairs of a fully resolved query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryFingerprint(Vec<(String, FingerprintPart)>);

impl QueryFingerprint {
    /// Computes the fingerprint of a parameter map.
    pub fn of(params: &IndexMap<String, QueryValue>) -> Self {
        let sorted: BTreeMap<&str, FingerprintPart> = params
            .iter()
            .map(|(k, v)| (k.as_str(), FingerprintPart::from(v)))
            .collect();
        QueryFingerprint(
            sorted
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    /// The canonical pairs.
    pub fn parts(&self) -> &[(String, FingerprintPart)] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn params(pairs: Vec<(&str, QueryValue)>) -> IndexMap<String, QueryValue> {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let a = params(vec![
            ("platform", Platform::Na1.into()),
            ("locale", "en_US".into()),
            ("version", "7.24.1".into()),
        ]);
        let b = params(vec![
            ("version", "7.24.1".into()),
            ("platform", Platform::Na1.into()),
            ("locale", "en_US".into()),
        ]);
        assert_eq!(QueryFingerprint::of(&a), QueryFingerprint::of(&b));
    }

    #[test]
    fn test_set_iteration_order_does_not_matter() {
        let mut first = HashSet::new();
        for tag in ["image", "stats", "tags", "lore", "info"] {
            first.insert(tag.to_string());
        }
        let mut second = HashSet::new();
        for tag in ["info", "lore", "tags", "stats", "image"] {
            second.insert(tag.to_string());
        }
        let a = params(vec![("includedData", first.into())]);
        let b = params(vec![("includedData", second.into())]);
        assert_eq!(QueryFingerprint::of(&a), QueryFingerprint::of(&b));
        assert_eq!(
            QueryFingerprint::of(&a).parts()[0].1,
            FingerprintPart::TagSet("image,info,lore,stats,tags".into())
        );
    }

    #[test]
    fn test_distinct_values_produce_distinct_fingerprints() {
        let a = params(vec![("platform", Platform::Na1.into())]);
        let b = params(vec![("platform", Platform::Euw1.into())]);
        let c = params(vec![
            ("platform", Platform::Na1.into()),
            ("version", "7.24.1".into()),
        ]);
        assert_ne!(QueryFingerprint::of(&a), QueryFingerprint::of(&b));
        assert_ne!(QueryFingerprint::of(&a), QueryFingerprint::of(&c));
    }

    #[test]
    fn test_same_value_under_different_keys_differs() {
        let a = params(vec![("locale", "en_US".into())]);
        let b = params(vec![("version", "en_US".into())]);
        assert_ne!(QueryFingerprint::of(&a), QueryFingerprint::of(&b));
    }

    #[test]
    fn test_stable_across_calls() {
        let a = params(vec![
            ("platform", Platform::Kr.into()),
            ("includedData", QueryValue::tags(["all"])),
        ]);
        assert_eq!(QueryFingerprint::of(&a), QueryFingerprint::of(&a.clone()));
    }
}
