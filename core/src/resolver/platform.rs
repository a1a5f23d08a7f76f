//! Per-platform resources: realms, versions, languages, language strings and
//! profile icons. These are never cached by the engine.

use super::fanout::LazyRecords;
use super::{push_param, Backend, Resolver};
use crate::context::Context;
use crate::endpoints::PlatformResource;
use crate::error::AppResult;
use crate::normalization::Stamp;
use crate::query::defaults::default_locale;
use crate::query::{keys, Field, Query, QuerySchema};
use crate::record::Record;
use crate::transport::Params;
use serde_json::{Map, Value};

/// Resolves one platform resource.
#[derive(Clone)]
pub struct PlatformResolver {
    resource: PlatformResource,
    get_schema: QuerySchema,
    many_schema: QuerySchema,
}

impl PlatformResolver {
    /// Builds the resolver for a resource.
    pub fn new(resource: PlatformResource) -> Self {
        let mut get_schema = QuerySchema::new().has(Field::platform(keys::PLATFORM));
        let mut many_schema = QuerySchema::new().has(Field::platform_list(keys::PLATFORMS));
        if resource.localized {
            get_schema = get_schema
                .can_have(Field::string(keys::VERSION))
                .can_have_or_else(Field::locale(keys::LOCALE), default_locale);
            many_schema = many_schema
                .can_have(Field::string(keys::VERSION))
                .can_have(Field::locale(keys::LOCALE));
        }
        Self {
            resource,
            get_schema,
            many_schema,
        }
    }
}

impl Resolver for PlatformResolver {
    fn get(&self, backend: &Backend, query: &Query, ctx: &Context<'_>) -> AppResult<Record> {
        let resolved = self.get_schema.validate(query, ctx)?;
        let platform = resolved.platform()?;

        let mut params = Params::new();
        if self.resource.localized {
            if let Some(version) = resolved.version() {
                push_param(&mut params, keys::VERSION, version);
            }
            if let Some(locale) = resolved.locale() {
                push_param(&mut params, keys::LOCALE, locale);
            }
        }

        let payload = backend.fetch(
            platform,
            self.resource.endpoint,
            None,
            &params,
            self.resource.bucket,
        )?;
        let payload = match (payload, self.resource.wrap_as) {
            (Value::Object(map), _) => Value::Object(map),
            (other, Some(key)) => {
                let mut wrapped = Map::new();
                wrapped.insert(key.to_string(), other);
                Value::Object(wrapped)
            }
            (other, None) => other,
        };

        let mut record = Record::from_value(self.resource.kind, payload)?;
        Stamp {
            region: platform.region().as_value(),
            locale: if self.resource.localized {
                resolved.locale()
            } else {
                None
            },
            ..Stamp::default()
        }
        .apply(record.as_map_mut());
        Ok(record)
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
        let this = self.clone();

        Ok(LazyRecords::per_platform(
            self.resource.kind,
            platforms,
            move |platform| {
                let query = per_platform.clone().with(keys::PLATFORM, platform);
                this.get(backend, &query, &ctx)
            },
        ))
    }
}
