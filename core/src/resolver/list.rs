//! Whole-list resolution through the `ListCache`.

use super::fanout::LazyRecords;
use super::{push_param, Backend, Resolver};
use crate::context::Context;
use crate::endpoints::ListFamily;
use crate::error::AppResult;
use crate::normalization::{normalize, Stamp};
use crate::query::defaults::default_locale;
use crate::query::{keys, Field, Query, QuerySchema, QueryValue, ResolvedQuery};
use crate::record::Record;
use crate::transport::Params;
use serde_json::Value;
use std::sync::Arc;

/// Schema of a single-platform list request.
pub(crate) fn list_schema(family: ListFamily) -> QuerySchema {
    let mut schema = QuerySchema::new()
        .has(Field::platform(keys::PLATFORM))
        .can_have(Field::string(keys::VERSION))
        .can_have_or_else(Field::locale(keys::LOCALE), default_locale);
    if family.included_data {
        schema = schema.can_have_or(Field::tags(keys::INCLUDED_DATA), QueryValue::tags(["all"]));
    }
    if family.data_by_id {
        schema = schema.can_have_or(Field::boolean(keys::DATA_BY_ID), QueryValue::Bool(false));
    }
    schema
}

fn many_list_schema(family: ListFamily) -> QuerySchema {
    let mut schema = QuerySchema::new()
        .has(Field::platform_list(keys::PLATFORMS))
        .can_have(Field::string(keys::VERSION))
        .can_have(Field::locale(keys::LOCALE));
    if family.included_data {
        schema = schema.can_have_or(Field::tags(keys::INCLUDED_DATA), QueryValue::tags(["all"]));
    }
    if family.data_by_id {
        schema = schema.can_have_or(Field::boolean(keys::DATA_BY_ID), QueryValue::Bool(false));
    }
    schema
}

/// Validates a list query and returns the (possibly cached) list.
pub(crate) fn get_list(
    backend: &Backend,
    family: ListFamily,
    query: &Query,
    ctx: &Context<'_>,
) -> AppResult<Arc<Record>> {
    let resolved = list_schema(family).validate(query, ctx)?;
    backend
        .cache()
        .get_or_fetch(family.list, resolved.fingerprint(), || {
            fetch_list(backend, family, &resolved)
        })
}

fn fetch_list(backend: &Backend, family: ListFamily, resolved: &ResolvedQuery) -> AppResult<Record> {
    let platform = resolved.platform()?;

    let mut params = Params::new();
    if let Some(version) = resolved.version() {
        push_param(&mut params, keys::VERSION, version);
    }
    if let Some(locale) = resolved.locale() {
        push_param(&mut params, keys::LOCALE, locale);
    }
    if family.included_data {
        if let Some(tags) = resolved.included_data() {
            push_param(&mut params, "tags", QueryValue::Tags(tags.clone()).to_param());
        }
    }
    if family.data_by_id {
        push_param(&mut params, keys::DATA_BY_ID, resolved.data_by_id().to_string());
    }

    let payload = backend.fetch(platform, family.endpoint, None, &params, family.list_bucket)?;
    let mut list = Record::from_value(family.list, payload)?;

    let stamp = Stamp {
        region: platform.region().as_value(),
        version: resolved.version(),
        locale: resolved.locale(),
        included_data: if family.included_data {
            resolved.included_data()
        } else {
            None
        },
    };
    stamp.apply(list.as_map_mut());

    let list_version = list.version().map(str::to_string);
    let entry_stamp = stamp.with_version(resolved.version().or(list_version.as_deref()));
    if let Some(Value::Object(entries)) = list.as_map_mut().get_mut("data") {
        for entry in entries.values_mut() {
            if let Value::Object(entry) = entry {
                normalize(family.entity, entry, &entry_stamp);
            }
        }
    }

    tracing::debug!(
        kind = %family.list,
        %platform,
        entries = list.entries().count(),
        "fetched list"
    );
    Ok(list)
}

/// Resolves whole lists (`ChampionList`, `ItemList`, ...).
#[derive(Clone)]
pub struct ListResolver {
    family: ListFamily,
    many_schema: QuerySchema,
}

impl ListResolver {
    /// Builds the resolver for a family.
    pub fn new(family: ListFamily) -> Self {
        Self {
            family,
            many_schema: many_list_schema(family),
        }
    }
}

impl Resolver for ListResolver {
    fn get(&self, backend: &Backend, query: &Query, ctx: &Context<'_>) -> AppResult<Record> {
        let list = get_list(backend, self.family, query, ctx)?;
        Ok(Record::clone(&list))
    }

    fn get_many<'a>(
        &self,
        backend: &'a Backend,
        query: &Query,
        ctx: Context<'a>,
    ) -> AppResult<LazyRecords<'a>> {
        let resolved = self.many_schema.validate(query, &ctx)?;
        let platforms = resolved.platforms()?.to_vec();
        let per_platform = resolved.to_query_without(&[keys::PLATFORMS]);
        let family = self.family;

        Ok(LazyRecords::per_platform(family.list, platforms, move |platform| {
            let query = per_platform.clone().with(keys::PLATFORM, platform);
            let list = get_list(backend, family, &query, &ctx)?;
            Ok(Record::clone(&list))
        }))
    }
}
