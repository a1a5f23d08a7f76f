#![deny(missing_docs)]

//! # Records
//!
//! The normalized output of every resolution: a JSON object tagged with the
//! `EntityKind` it was resolved as.

use crate::error::{AppError, AppResult};
use crate::transport::TransportError;
use derive_more::Display;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::str::FromStr;

/// Registry tag for every entity type the engine can resolve.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum EntityKind {
    #[display("champion")]
    Champion,
    #[display("champion-list")]
    ChampionList,
    #[display("mastery")]
    Mastery,
    #[display("mastery-list")]
    MasteryList,
    #[display("rune")]
    Rune,
    #[display("rune-list")]
    RuneList,
    #[display("item")]
    Item,
    #[display("item-list")]
    ItemList,
    #[display("summoner-spell")]
    SummonerSpell,
    #[display("summoner-spell-list")]
    SummonerSpellList,
    #[display("map")]
    Map,
    #[display("map-list")]
    MapList,
    #[display("realm")]
    Realm,
    #[display("versions")]
    Versions,
    #[display("languages")]
    Languages,
    #[display("language-strings")]
    LanguageStrings,
    #[display("profile-icons")]
    ProfileIcons,
}

impl EntityKind {
    /// Every registered kind.
    pub const ALL: [EntityKind; 17] = [
        EntityKind::Champion,
        EntityKind::ChampionList,
        EntityKind::Mastery,
        EntityKind::MasteryList,
        EntityKind::Rune,
        EntityKind::RuneList,
        EntityKind::Item,
        EntityKind::ItemList,
        EntityKind::SummonerSpell,
        EntityKind::SummonerSpellList,
        EntityKind::Map,
        EntityKind::MapList,
        EntityKind::Realm,
        EntityKind::Versions,
        EntityKind::Languages,
        EntityKind::LanguageStrings,
        EntityKind::ProfileIcons,
    ];
}

impl FromStr for EntityKind {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        EntityKind::ALL
            .into_iter()
            .find(|k| k.to_string() == wanted)
            .ok_or_else(|| AppError::invalid(format!("Unknown entity kind '{}'", s)))
    }
}

/// A resolved, stamped and repaired entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    #[serde(skip)]
    kind: EntityKind,
    data: Map<String, Value>,
}

impl Record {
    /// Wraps a raw JSON object.
    pub fn new(kind: EntityKind, data: Map<String, Value>) -> Self {
        Self { kind, data }
    }

    /// Wraps a raw payload, which must be a JSON object.
    pub fn from_value(kind: EntityKind, value: Value) -> AppResult<Self> {
        match value {
            Value::Object(data) => Ok(Self::new(kind, data)),
            other => Err(AppError::Transport(TransportError::Decode(format!(
                "Expected a JSON object for {}, got {}",
                kind, other
            )))),
        }
    }

    /// The kind this record was resolved as.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Raw field access.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// The `id` attribute, when numeric.
    pub fn id(&self) -> Option<i64> {
        self.data.get("id").and_then(Value::as_i64)
    }

    /// The `name` attribute.
    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    /// The stamped region.
    pub fn region(&self) -> Option<&str> {
        self.str_field("region")
    }

    /// The stamped (or reported) version.
    pub fn version(&self) -> Option<&str> {
        self.str_field("version")
    }

    /// The stamped locale.
    pub fn locale(&self) -> Option<&str> {
        self.str_field("locale")
    }

    /// The stamped included-data tags.
    pub fn included_data(&self) -> Option<Vec<&str>> {
        self.data
            .get("includedData")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).collect())
    }

    /// Entries of a list record (`data` object values), in payload order.
    pub fn entries(&self) -> impl Iterator<Item = &Map<String, Value>> {
        self.data
            .get("data")
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|entries| entries.values())
            .filter_map(Value::as_object)
    }

    /// Borrow the underlying object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.data
    }

    pub(crate) fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.data
    }

    /// Unwraps the underlying object.
    pub fn into_map(self) -> Map<String, Value> {
        self.data
    }

    /// Deserializes into a caller supplied DTO.
    pub fn deserialize<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_value(Value::Object(self.data.clone())).map_err(|e| {
            AppError::Transport(TransportError::Decode(format!(
                "Record is not a valid {}: {}",
                self.kind, e
            )))
        })
    }

    fn str_field(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }
}
