//! Loosely typed query values and the field kinds schemas check them against.

use crate::platform::Platform;
use derive_more::{Display, From};
use std::collections::{BTreeSet, HashSet};

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum QueryValue {
    /// Integer (ids).
    Int(i64),
    /// String (names, versions, locales).
    Str(String),
    /// Boolean flag.
    Bool(bool),
    /// A platform.
    Platform(Platform),
    /// Ordered integer list.
    IntList(Vec<i64>),
    /// Ordered string list.
    StrList(Vec<String>),
    /// Ordered platform list.
    PlatformList(Vec<Platform>),
    /// Unordered tag set.
    Tags(BTreeSet<String>),
}

impl QueryValue {
    /// Builds a tag set.
    pub fn tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryValue::Tags(tags.into_iter().map(Into::into).collect())
    }

    /// Short description of the value's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            QueryValue::Int(_) => "integer",
            QueryValue::Str(_) => "string",
            QueryValue::Bool(_) => "boolean",
            QueryValue::Platform(_) => "platform",
            QueryValue::IntList(_) => "integer list",
            QueryValue::StrList(_) => "string list",
            QueryValue::PlatformList(_) => "platform list",
            QueryValue::Tags(_) => "tag set",
        }
    }

    /// Renders the value the way the remote service expects it in a query string.
    pub fn to_param(&self) -> String {
        match self {
            QueryValue::Int(v) => v.to_string(),
            QueryValue::Str(v) => v.clone(),
            QueryValue::Bool(v) => v.to_string(),
            QueryValue::Platform(v) => v.to_string(),
            QueryValue::IntList(v) => join(v.iter()),
            QueryValue::StrList(v) => v.join(","),
            QueryValue::PlatformList(v) => join(v.iter()),
            QueryValue::Tags(v) => join(v.iter()),
        }
    }
}

fn join<T: ToString>(items: impl Iterator<Item = T>) -> String {
    items.map(|i| i.to_string()).collect::<Vec<_>>().join(",")
}

impl From<i32> for QueryValue {
    fn from(v: i32) -> Self {
        QueryValue::Int(i64::from(v))
    }
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        QueryValue::Str(v.to_string())
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(v: Vec<&str>) -> Self {
        QueryValue::StrList(v.into_iter().map(String::from).collect())
    }
}

impl From<HashSet<String>> for QueryValue {
    fn from(v: HashSet<String>) -> Self {
        QueryValue::Tags(v.into_iter().collect())
    }
}

/// The type a schema field demands.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// An integer.
    #[display("integer")]
    Int,
    /// A string.
    #[display("string")]
    Str,
    /// A string shaped like `en_US`.
    #[display("locale")]
    Locale,
    /// A boolean.
    #[display("boolean")]
    Bool,
    /// A platform, or a string naming one.
    #[display("platform")]
    Platform,
    /// A list of integers.
    #[display("integer list")]
    IntList,
    /// A list of platforms, or of strings naming them.
    #[display("platform list")]
    PlatformList,
    /// A tag set, or a list of strings.
    #[display("tag set")]
    Tags,
}

impl FieldKind {
    /// Checks `value` against this kind, coercing compatible representations.
    ///
    /// Returns `None` when the value cannot be used as this kind.
    pub(crate) fn coerce(self, value: &QueryValue) -> Option<QueryValue> {
        match (self, value) {
            (FieldKind::Int, QueryValue::Int(_))
            | (FieldKind::Str, QueryValue::Str(_))
            | (FieldKind::Locale, QueryValue::Str(_))
            | (FieldKind::Bool, QueryValue::Bool(_))
            | (FieldKind::Platform, QueryValue::Platform(_))
            | (FieldKind::IntList, QueryValue::IntList(_))
            | (FieldKind::PlatformList, QueryValue::PlatformList(_))
            | (FieldKind::Tags, QueryValue::Tags(_)) => Some(value.clone()),
            (FieldKind::Platform, QueryValue::Str(s)) => {
                s.parse::<Platform>().ok().map(QueryValue::Platform)
            }
            (FieldKind::PlatformList, QueryValue::StrList(items)) => items
                .iter()
                .map(|s| s.parse::<Platform>().ok())
                .collect::<Option<Vec<_>>>()
                .map(QueryValue::PlatformList),
            (FieldKind::Tags, QueryValue::StrList(items)) => {
                Some(QueryValue::tags(items.iter().cloned()))
            }
            _ => None,
        }
    }
}
