//! Pluggable default resolvers for optional query fields.

use super::value::QueryValue;
use super::{keys, Query, ResolvedQuery};
use crate::context::Context;
use crate::error::{AppError, AppResult};
use crate::record::EntityKind;

/// Supplies a value for an absent field from the partially resolved query.
pub type DefaultFn = fn(&ResolvedQuery, &Context<'_>) -> AppResult<QueryValue>;

/// The platform's current data version, read from its realm record.
///
/// Resolved through the pipeline. `StaticDataSource` does not cache realms, so
/// every single-entity get without a `version` costs one realm request on top
/// of the (possibly cached) list. Pass `version` to avoid it.
pub fn default_version(query: &ResolvedQuery, ctx: &Context<'_>) -> AppResult<QueryValue> {
    let platform = query.platform()?;
    let realm = ctx
        .pipeline()
        .get(EntityKind::Realm, &Query::new().with(keys::PLATFORM, platform))?;
    realm
        .get("v")
        .and_then(|v| v.as_str())
        .map(QueryValue::from)
        .ok_or_else(|| {
            AppError::NotFound(format!("Realm for {} does not report a version", platform))
        })
}

/// The platform's statically configured locale. Never touches the network.
pub fn default_locale(query: &ResolvedQuery, _ctx: &Context<'_>) -> AppResult<QueryValue> {
    Ok(QueryValue::from(query.platform()?.default_locale()))
}
