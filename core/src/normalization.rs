#![deny(missing_docs)]

//! # Record Normalization
//!
//! Rewrites raw payloads into canonical records. Two passes run on every
//! record, whether it came from a single fetch, a list, or a fan-out element:
//!
//! - **Stamping**: contextual fields (`region`, `version`, `locale`,
//!   `includedData`) are overwritten from the resolved query. The query wins
//!   over whatever the payload said.
//! - **Repair**: per-kind fixes for known gaps in upstream data.

use crate::record::EntityKind;
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;

/// The item that has no name upstream.
pub const NAMELESS_ITEM_ID: i64 = 3632;

/// Contextual values stamped onto records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stamp<'a> {
    /// Region label, always written.
    pub region: String,
    /// Version, written when known.
    pub version: Option<&'a str>,
    /// Locale, written when known.
    pub locale: Option<&'a str>,
    /// Included-data tags, written when the kind carries them.
    pub included_data: Option<&'a BTreeSet<String>>,
}

impl<'a> Stamp<'a> {
    /// Writes every known field onto `record`, replacing existing values.
    pub fn apply(&self, record: &mut Map<String, Value>) {
        record.insert("region".into(), Value::String(self.region.clone()));
        if let Some(version) = self.version {
            record.insert("version".into(), Value::String(version.to_string()));
        }
        if let Some(locale) = self.locale {
            record.insert("locale".into(), Value::String(locale.to_string()));
        }
        if let Some(tags) = self.included_data {
            record.insert("includedData".into(), json!(tags));
        }
    }

    /// Same stamp with a different version.
    pub fn with_version(&self, version: Option<&'a str>) -> Self {
        Self {
            version,
            ..self.clone()
        }
    }
}

/// Applies the per-kind repair rules.
pub fn repair(kind: EntityKind, record: &mut Map<String, Value>) {
    if kind == EntityKind::Item {
        repair_item(record);
    }
}

/// Stamps then repairs.
pub fn normalize(kind: EntityKind, record: &mut Map<String, Value>, stamp: &Stamp<'_>) {
    stamp.apply(record);
    repair(kind, record);
}

fn repair_item(item: &mut Map<String, Value>) {
    if item.get("id").and_then(Value::as_i64) == Some(NAMELESS_ITEM_ID) {
        item.insert("name".into(), Value::String(String::new()));
    }
    item.entry("tags").or_insert_with(|| Value::Array(Vec::new()));
    item.entry("depth").or_insert_with(|| json!(1));
    item.entry("colloq")
        .or_insert_with(|| Value::String(String::new()));
    item.entry("plaintext")
        .or_insert_with(|| Value::String(String::new()));
}
