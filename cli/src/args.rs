#![deny(missing_docs)]

//! # Shared Arguments
//!
//! Engine construction and query options common to every command. Values
//! come from the YAML file first, then environment variables and flags.

use crate::error::CliResult;
use staticdata_core::query::keys;
use staticdata_core::{EntityKind, Query, Settings, StaticDataSource};
use std::path::PathBuf;

/// Options used to build the engine.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// YAML settings file.
    #[clap(long, env = "STATICDATA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// API key sent with every request.
    #[clap(long, env = "RIOT_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Host template; `{platform}` is replaced with e.g. `na1`.
    #[clap(long, env = "STATICDATA_HOST", global = true)]
    pub host: Option<String>,

    /// Resolve single entities from their list even when an id is given.
    #[clap(long, env = "STATICDATA_REQUEST_BY_ID", global = true)]
    pub request_by_id: Option<bool>,

    /// Minimum spacing between requests of one bucket, in milliseconds.
    #[clap(long, env = "STATICDATA_MIN_INTERVAL_MS", global = true)]
    pub min_interval_ms: Option<u64>,
}

impl SourceArgs {
    /// Settings from the file (if any) with flags applied on top.
    pub fn settings(&self) -> CliResult<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_yaml_file(path)?,
            None => Settings::default(),
        };
        if let Some(key) = &self.api_key {
            settings.http.api_key = Some(key.clone());
        }
        if let Some(host) = &self.host {
            settings.host_template = host.clone();
        }
        if let Some(flag) = self.request_by_id {
            settings.request_by_id = flag;
        }
        if let Some(ms) = self.min_interval_ms {
            settings.http.min_interval_ms = ms;
        }
        settings.validate()?;
        Ok(settings)
    }

    /// Builds the HTTP-backed engine.
    pub fn build(&self) -> CliResult<StaticDataSource> {
        Ok(StaticDataSource::from_settings(&self.settings()?)?)
    }
}

/// Optional query parameters shared by `get` and `many`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct QueryOptions {
    /// Data version, e.g. `7.24.1`.
    #[clap(long)]
    pub version: Option<String>,

    /// Locale, e.g. `en_US`.
    #[clap(long)]
    pub locale: Option<String>,

    /// Included-data tags, comma separated.
    #[clap(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Key champion lists by id.
    #[clap(long)]
    pub data_by_id: bool,
}

impl QueryOptions {
    /// Adds the given options to `query`.
    pub fn apply(&self, mut query: Query) -> Query {
        if let Some(version) = &self.version {
            query.insert(keys::VERSION, version.as_str());
        }
        if let Some(locale) = &self.locale {
            query.insert(keys::LOCALE, locale.as_str());
        }
        if !self.tags.is_empty() {
            query.insert(keys::INCLUDED_DATA, self.tags.clone());
        }
        if self.data_by_id {
            query.insert(keys::DATA_BY_ID, true);
        }
        query
    }
}

/// Parses an entity kind such as `champion` or `item-list`.
pub fn parse_kind(s: &str) -> Result<EntityKind, String> {
    s.parse::<EntityKind>().map_err(|e| e.to_string())
}
