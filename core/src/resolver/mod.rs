#![deny(missing_docs)]

//! # Resolvers
//!
//! One resolver per `EntityKind`, registered once in a `ResolverRegistry`.
//! Every resolver validates its query against its own schemas, then picks a
//! resolution strategy:
//!
//! - `EntityResolver`: single list-backed entities (direct fetch or list-and-filter).
//! - `ListResolver`: whole lists, memoized in the `ListCache`.
//! - `PlatformResolver`: per-platform resources such as realms and languages.

use crate::cache::ListCache;
use crate::context::Context;
use crate::endpoints::{UrlBuilder, LIST_FAMILIES, PLATFORM_RESOURCES};
use crate::error::{AppError, AppResult};
use crate::platform::Platform;
use crate::query::Query;
use crate::record::{EntityKind, Record};
use crate::transport::{Params, RateLimiter, Transport};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub mod entity;
pub mod fanout;
pub mod list;
pub mod platform;

pub use entity::EntityResolver;
pub use fanout::LazyRecords;
pub use list::ListResolver;
pub use platform::PlatformResolver;

/// Common interface of every registered resolver.
pub trait Resolver: Send + Sync {
    /// Resolves one record.
    fn get(&self, backend: &Backend, query: &Query, ctx: &Context<'_>) -> AppResult<Record>;

    /// Validates `query` eagerly and returns a lazy sequence of records.
    ///
    /// Nothing is fetched until the sequence is pulled.
    fn get_many<'a>(
        &self,
        backend: &'a Backend,
        query: &Query,
        ctx: Context<'a>,
    ) -> AppResult<LazyRecords<'a>>;
}

/// Shared collaborators and state handed to resolvers.
pub struct Backend {
    transport: Arc<dyn Transport>,
    limiter: Arc<dyn RateLimiter>,
    urls: UrlBuilder,
    cache: ListCache,
    request_by_id: bool,
}

impl Backend {
    /// Bundles the collaborators.
    pub fn new(
        transport: Arc<dyn Transport>,
        limiter: Arc<dyn RateLimiter>,
        urls: UrlBuilder,
        cache: ListCache,
        request_by_id: bool,
    ) -> Self {
        Self {
            transport,
            limiter,
            urls,
            cache,
            request_by_id,
        }
    }

    /// The list cache.
    pub fn cache(&self) -> &ListCache {
        &self.cache
    }

    /// Whether single entities are resolved from their list even when an id is given.
    pub fn request_by_id(&self) -> bool {
        self.request_by_id
    }

    /// GETs an endpoint, waiting on the bucket throttle first.
    ///
    /// A remote 404 comes back as `AppError::NotFound`.
    pub fn fetch(
        &self,
        platform: Platform,
        endpoint: &str,
        id: Option<i64>,
        params: &Params,
        bucket: &str,
    ) -> AppResult<Value> {
        let url = self.urls.url(platform, endpoint, id);
        let limiter = self.limiter.for_bucket(platform, bucket);
        tracing::debug!(%url, bucket, "fetching");
        Ok(self.transport.fetch(&url, params, &limiter)?)
    }
}

/// Mapping from entity kind to its resolver.
#[derive(Default)]
pub struct ResolverRegistry {
    resolvers: HashMap<EntityKind, Arc<dyn Resolver>>,
}

impl ResolverRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with a resolver for every built-in kind.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for family in LIST_FAMILIES {
            registry.register(family.entity, EntityResolver::new(family));
            registry.register(family.list, ListResolver::new(family));
        }
        for resource in PLATFORM_RESOURCES {
            registry.register(resource.kind, PlatformResolver::new(resource));
        }
        registry
    }

    /// Registers (or replaces) the resolver for `kind`.
    pub fn register(&mut self, kind: EntityKind, resolver: impl Resolver + 'static) {
        self.resolvers.insert(kind, Arc::new(resolver));
    }

    /// The resolver for `kind`.
    pub fn resolver(&self, kind: EntityKind) -> AppResult<&dyn Resolver> {
        self.resolvers
            .get(&kind)
            .map(|r| r.as_ref())
            .ok_or_else(|| AppError::invalid(format!("No resolver registered for {}", kind)))
    }

    /// Registered kinds.
    pub fn kinds(&self) -> impl Iterator<Item = EntityKind> + '_ {
        self.resolvers.keys().copied()
    }
}

pub(crate) fn push_param(params: &mut Params, key: &str, value: impl Into<String>) {
    params.push((key.to_string(), value.into()));
}
