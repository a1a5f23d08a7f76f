#![deny(missing_docs)]

//! # Endpoints
//!
//! Static description of every resource the remote service exposes: path,
//! rate-limit bucket, and which request parameters it understands.

use crate::error::{AppError, AppResult};
use crate::platform::Platform;
use crate::record::EntityKind;
use url::Url;

/// Default host; `{platform}` is replaced with the lowercase platform label.
pub const DEFAULT_HOST_TEMPLATE: &str = "https://{platform}.api.riotgames.com";

const API_PATH: &str = "lol/static-data/v3";

/// An entity type that is also served as a list (champions, items, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListFamily {
    /// Kind of a single entry.
    pub entity: EntityKind,
    /// Kind of the whole list.
    pub list: EntityKind,
    /// Human label used in messages.
    pub label: &'static str,
    /// Path segment.
    pub endpoint: &'static str,
    /// Bucket for single entity requests.
    pub entity_bucket: &'static str,
    /// Bucket for list requests.
    pub list_bucket: &'static str,
    /// Whether records carry `includedData` and requests send `tags`.
    pub included_data: bool,
    /// Whether `/{endpoint}/{id}` exists.
    pub direct_fetch: bool,
    /// Whether list requests send `dataById`.
    pub data_by_id: bool,
}

/// Champions.
pub const CHAMPIONS: ListFamily = ListFamily {
    entity: EntityKind::Champion,
    list: EntityKind::ChampionList,
    label: "champion",
    endpoint: "champions",
    entity_bucket: "staticdata/champion",
    list_bucket: "staticdata/champions",
    included_data: true,
    direct_fetch: true,
    data_by_id: true,
};

/// Masteries.
pub const MASTERIES: ListFamily = ListFamily {
    entity: EntityKind::Mastery,
    list: EntityKind::MasteryList,
    label: "mastery",
    endpoint: "masteries",
    entity_bucket: "staticdata/mastery",
    list_bucket: "staticdata/masteries",
    included_data: true,
    direct_fetch: true,
    data_by_id: false,
};

/// Runes.
pub const RUNES: ListFamily = ListFamily {
    entity: EntityKind::Rune,
    list: EntityKind::RuneList,
    label: "rune",
    endpoint: "runes",
    entity_bucket: "staticdata/rune",
    list_bucket: "staticdata/runes",
    included_data: true,
    direct_fetch: true,
    data_by_id: false,
};

/// Items.
pub const ITEMS: ListFamily = ListFamily {
    entity: EntityKind::Item,
    list: EntityKind::ItemList,
    label: "item",
    endpoint: "items",
    entity_bucket: "staticdata/item",
    list_bucket: "staticdata/items",
    included_data: true,
    direct_fetch: true,
    data_by_id: false,
};

/// Summoner spells.
pub const SUMMONER_SPELLS: ListFamily = ListFamily {
    entity: EntityKind::SummonerSpell,
    list: EntityKind::SummonerSpellList,
    label: "summoner spell",
    endpoint: "summoner-spells",
    entity_bucket: "staticdata/summoner-spell",
    list_bucket: "staticdata/summoner-spells",
    included_data: true,
    direct_fetch: true,
    data_by_id: false,
};

/// Maps. Only served as a list, without included-data.
pub const MAPS: ListFamily = ListFamily {
    entity: EntityKind::Map,
    list: EntityKind::MapList,
    label: "map",
    endpoint: "maps",
    entity_bucket: "staticdata/maps",
    list_bucket: "staticdata/maps",
    included_data: false,
    direct_fetch: false,
    data_by_id: false,
};

/// All list-backed families.
pub const LIST_FAMILIES: [ListFamily; 6] =
    [CHAMPIONS, MASTERIES, RUNES, ITEMS, SUMMONER_SPELLS, MAPS];

/// A per-platform resource that is not a list of entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformResource {
    /// Registry kind.
    pub kind: EntityKind,
    /// Path segment.
    pub endpoint: &'static str,
    /// Rate-limit bucket.
    pub bucket: &'static str,
    /// Whether requests take `version` and `locale`.
    pub localized: bool,
    /// Array payloads are wrapped into an object under this key.
    pub wrap_as: Option<&'static str>,
}

/// Realm (current versions and CDN info).
pub const REALM: PlatformResource = PlatformResource {
    kind: EntityKind::Realm,
    endpoint: "realms",
    bucket: "staticdata/realms",
    localized: false,
    wrap_as: None,
};

/// Known data versions.
pub const VERSIONS: PlatformResource = PlatformResource {
    kind: EntityKind::Versions,
    endpoint: "versions",
    bucket: "staticdata/versions",
    localized: false,
    wrap_as: Some("versions"),
};

/// Supported locales.
pub const LANGUAGES: PlatformResource = PlatformResource {
    kind: EntityKind::Languages,
    endpoint: "languages",
    bucket: "staticdata/language",
    localized: false,
    wrap_as: Some("languages"),
};

/// Localized UI strings.
pub const LANGUAGE_STRINGS: PlatformResource = PlatformResource {
    kind: EntityKind::LanguageStrings,
    endpoint: "language-strings",
    bucket: "staticdata/language-strings",
    localized: true,
    wrap_as: None,
};

/// Profile icon data.
pub const PROFILE_ICONS: PlatformResource = PlatformResource {
    kind: EntityKind::ProfileIcons,
    endpoint: "profile-icons",
    bucket: "staticdata/profile-icons",
    localized: true,
    wrap_as: None,
};

/// All platform resources.
pub const PLATFORM_RESOURCES: [PlatformResource; 5] =
    [REALM, VERSIONS, LANGUAGES, LANGUAGE_STRINGS, PROFILE_ICONS];

/// Builds request URLs from a host template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    host_template: String,
}

impl Default for UrlBuilder {
    fn default() -> Self {
        Self {
            host_template: DEFAULT_HOST_TEMPLATE.to_string(),
        }
    }
}

impl UrlBuilder {
    /// Creates a builder, checking the template yields a valid absolute URL.
    pub fn new(host_template: &str) -> AppResult<Self> {
        let probe = host_template.replace("{platform}", "na1");
        let parsed = Url::parse(&probe).map_err(|e| {
            AppError::Config(format!("Invalid host template '{}': {}", host_template, e))
        })?;
        if parsed.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "Host template '{}' is not a base URL",
                host_template
            )));
        }
        Ok(Self {
            host_template: host_template.trim_end_matches('/').to_string(),
        })
    }

    /// URL of an endpoint, optionally addressing one id.
    pub fn url(&self, platform: Platform, endpoint: &str, id: Option<i64>) -> String {
        let host = self
            .host_template
            .replace("{platform}", &platform.host_label());
        match id {
            Some(id) => format!("{}/{}/{}/{}", host, API_PATH, endpoint, id),
            None => format!("{}/{}/{}", host, API_PATH, endpoint),
        }
    }
}
