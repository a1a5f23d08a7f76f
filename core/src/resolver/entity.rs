//! Single list-backed entities.
//!
//! A single entity is resolved either by fetching `/{endpoint}/{id}` directly
//! or by taking its list (through the cache) and filtering. Names always go
//! through the list, as does every lookup when `request_by_id` is set.

use super::fanout::{IdFanOut, LazyRecords};
use super::list::get_list;
use super::{push_param, Backend, Resolver};
use crate::context::Context;
use crate::endpoints::ListFamily;
use crate::error::{AppError, AppResult};
use crate::normalization::{normalize, Stamp};
use crate::query::defaults::{default_locale, default_version};
use crate::query::{keys, Field, Query, QuerySchema, QueryValue, ResolvedQuery};
use crate::record::Record;
use crate::transport::Params;
use serde_json::Value;

/// Resolves one entity kind of a list family.
#[derive(Clone)]
pub struct EntityResolver {
    family: ListFamily,
    get_schema: QuerySchema,
    many_schema: QuerySchema,
}

impl EntityResolver {
    /// Builds the resolver for a family.
    pub fn new(family: ListFamily) -> Self {
        let mut get_schema = QuerySchema::new()
            .has_either(Field::int(keys::ID), Field::string(keys::NAME))
            .has(Field::platform(keys::PLATFORM))
            .can_have_or_else(Field::string(keys::VERSION), default_version)
            .can_have_or_else(Field::locale(keys::LOCALE), default_locale);

        let mut many_schema = QuerySchema::new()
            .has(Field::int_list(keys::IDS))
            .has(Field::platform(keys::PLATFORM))
            .can_have(Field::string(keys::VERSION))
            .can_have_or_else(Field::locale(keys::LOCALE), default_locale);

        if family.included_data {
            let all = QueryValue::tags(["all"]);
            get_schema = get_schema.can_have_or(Field::tags(keys::INCLUDED_DATA), all.clone());
            many_schema = many_schema.can_have_or(Field::tags(keys::INCLUDED_DATA), all);
        }

        Self {
            family,
            get_schema,
            many_schema,
        }
    }

    fn stamp<'q>(&self, resolved: &'q ResolvedQuery) -> AppResult<Stamp<'q>> {
        Ok(Stamp {
            region: resolved.platform()?.region().as_value(),
            version: resolved.version(),
            locale: resolved.locale(),
            included_data: if self.family.included_data {
                resolved.included_data()
            } else {
                None
            },
        })
    }

    fn from_list(
        &self,
        backend: &Backend,
        resolved: &ResolvedQuery,
        ctx: &Context<'_>,
    ) -> AppResult<Record> {
        let list_query = resolved.to_query_without(&[keys::ID, keys::NAME]);
        let list = get_list(backend, self.family, &list_query, ctx)?;

        let id = resolved.id();
        let name = resolved.name();
        let found = list.entries().find(|entry| {
            let entry_id = entry.get("id").and_then(Value::as_i64);
            let entry_name = entry.get("name").and_then(Value::as_str);
            (id.is_some() && entry_id == id) || (name.is_some() && entry_name == name)
        });

        let Some(entry) = found else {
            return Err(AppError::NotFound(match (id, name) {
                (Some(id), _) => format!("No {} exists with id \"{}\"", self.family.label, id),
                (None, Some(name)) => {
                    format!("No {} exists with name \"{}\"", self.family.label, name)
                }
                (None, None) => format!("No {} matches the query", self.family.label),
            }));
        };

        let mut record = entry.clone();
        normalize(self.family.entity, &mut record, &self.stamp(resolved)?);
        Ok(Record::new(self.family.entity, record))
    }

    fn direct(&self, backend: &Backend, resolved: &ResolvedQuery, id: i64) -> AppResult<Record> {
        let platform = resolved.platform()?;

        let mut params = Params::new();
        if let Some(version) = resolved.version() {
            push_param(&mut params, keys::VERSION, version);
        }
        if let Some(locale) = resolved.locale() {
            push_param(&mut params, keys::LOCALE, locale);
        }
        if self.family.included_data {
            if let Some(tags) = resolved.included_data() {
                push_param(&mut params, "tags", QueryValue::Tags(tags.clone()).to_param());
            }
        }

        let payload = backend.fetch(
            platform,
            self.family.endpoint,
            Some(id),
            &params,
            self.family.entity_bucket,
        )?;
        let mut record = Record::from_value(self.family.entity, payload)?;
        normalize(self.family.entity, record.as_map_mut(), &self.stamp(resolved)?);
        Ok(record)
    }
}

impl Resolver for EntityResolver {
    fn get(&self, backend: &Backend, query: &Query, ctx: &Context<'_>) -> AppResult<Record> {
        let resolved = self.get_schema.validate(query, ctx)?;

        match resolved.id() {
            Some(id) if !backend.request_by_id() && self.family.direct_fetch => {
                tracing::debug!(kind = %self.family.entity, id, "resolving directly");
                self.direct(backend, &resolved, id)
            }
            _ => {
                tracing::debug!(kind = %self.family.entity, "resolving from list");
                self.from_list(backend, &resolved, ctx)
            }
        }
    }

    fn get_many<'a>(
        &self,
        backend: &'a Backend,
        query: &Query,
        ctx: Context<'a>,
    ) -> AppResult<LazyRecords<'a>> {
        let resolved = self.many_schema.validate(query, &ctx)?;
        let ids = resolved.ids()?.to_vec();
        let list_query = resolved.to_query_without(&[keys::IDS]);

        Ok(LazyRecords::new(
            self.family.entity,
            IdFanOut::new(backend, self.family, list_query, ctx, ids),
        ))
    }
}
