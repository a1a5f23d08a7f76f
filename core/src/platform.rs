#![deny(missing_docs)]

//! # Platform Table
//!
//! Static mapping from platform identifiers to their region and default locale.

use crate::error::{AppError, AppResult};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A game region, as reported in stamped records.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Region {
    #[display("BR")]
    Brazil,
    #[display("EUNE")]
    EuropeNorthEast,
    #[display("EUW")]
    EuropeWest,
    #[display("JP")]
    Japan,
    #[display("KR")]
    Korea,
    #[display("LAN")]
    LatinAmericaNorth,
    #[display("LAS")]
    LatinAmericaSouth,
    #[display("NA")]
    NorthAmerica,
    #[display("OCE")]
    Oceania,
    #[display("TR")]
    Turkey,
    #[display("RU")]
    Russia,
    #[display("PBE")]
    PublicBeta,
}

/// A platform (shard) of the remote service.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Platform {
    #[display("BR1")]
    Br1,
    #[display("EUN1")]
    Eun1,
    #[display("EUW1")]
    Euw1,
    #[display("JP1")]
    Jp1,
    #[display("KR")]
    Kr,
    #[display("LA1")]
    La1,
    #[display("LA2")]
    La2,
    #[display("NA1")]
    Na1,
    #[display("OC1")]
    Oc1,
    #[display("TR1")]
    Tr1,
    #[display("RU")]
    Ru,
    #[display("PBE1")]
    Pbe1,
}

impl Platform {
    /// Every known platform.
    pub const ALL: [Platform; 12] = [
        Platform::Br1,
        Platform::Eun1,
        Platform::Euw1,
        Platform::Jp1,
        Platform::Kr,
        Platform::La1,
        Platform::La2,
        Platform::Na1,
        Platform::Oc1,
        Platform::Tr1,
        Platform::Ru,
        Platform::Pbe1,
    ];

    /// The region served by this platform.
    pub const fn region(self) -> Region {
        match self {
            Platform::Br1 => Region::Brazil,
            Platform::Eun1 => Region::EuropeNorthEast,
            Platform::Euw1 => Region::EuropeWest,
            Platform::Jp1 => Region::Japan,
            Platform::Kr => Region::Korea,
            Platform::La1 => Region::LatinAmericaNorth,
            Platform::La2 => Region::LatinAmericaSouth,
            Platform::Na1 => Region::NorthAmerica,
            Platform::Oc1 => Region::Oceania,
            Platform::Tr1 => Region::Turkey,
            Platform::Ru => Region::Russia,
            Platform::Pbe1 => Region::PublicBeta,
        }
    }

    /// The locale used when a query does not name one.
    pub const fn default_locale(self) -> &'static str {
        match self {
            Platform::Br1 => "pt_BR",
            Platform::Eun1 | Platform::Euw1 => "en_GB",
            Platform::Jp1 => "ja_JP",
            Platform::Kr => "ko_KR",
            Platform::La1 => "es_MX",
            Platform::La2 => "es_AR",
            Platform::Na1 | Platform::Pbe1 => "en_US",
            Platform::Oc1 => "en_AU",
            Platform::Tr1 => "tr_TR",
            Platform::Ru => "ru_RU",
        }
    }

    /// Lowercase host label, e.g. `na1`.
    pub fn host_label(self) -> String {
        self.to_string().to_lowercase()
    }
}

impl FromStr for Platform {
    type Err = AppError;

    /// Parses a platform identifier case-insensitively.
    fn from_str(s: &str) -> AppResult<Self> {
        let wanted = s.trim().to_uppercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.to_string() == wanted)
            .ok_or_else(|| AppError::invalid(format!("Unknown platform '{}'", s)))
    }
}

impl Region {
    /// Region label as stamped onto records.
    pub fn as_value(self) -> String {
        self.to_string()
    }
}
