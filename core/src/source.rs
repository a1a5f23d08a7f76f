#![deny(missing_docs)]

//! # Static Data Source
//!
//! The public entry point: routes `get` and `get_many` calls to the resolver
//! registered for the requested kind.
//!
//! ```no_run
//! use staticdata_core::{EntityKind, Query, Settings, StaticDataSource};
//! use staticdata_core::query::keys;
//!
//! let source = StaticDataSource::from_settings(&Settings::default())?;
//! let teemo = source.resolve(
//!     EntityKind::Champion,
//!     &Query::new().with(keys::NAME, "Teemo").with(keys::PLATFORM, "NA1"),
//! )?;
//! println!("{}", teemo.id().unwrap_or_default());
//! # Ok::<(), staticdata_core::AppError>(())
//! ```

use crate::cache::ListCache;
use crate::config::Settings;
use crate::context::{Context, Pipeline};
use crate::error::AppResult;
use crate::query::Query;
use crate::record::{EntityKind, Record};
use crate::resolver::{Backend, LazyRecords, Resolver, ResolverRegistry};
use crate::transport::{RateLimiter, Transport};
use std::sync::Arc;

/// Resolves static data records.
pub struct StaticDataSource {
    backend: Backend,
    registry: ResolverRegistry,
}

impl StaticDataSource {
    /// Builds a source from settings and explicit collaborators.
    pub fn new(
        settings: &Settings,
        transport: Arc<dyn Transport>,
        limiter: Arc<dyn RateLimiter>,
    ) -> AppResult<Self> {
        settings.validate()?;
        let backend = Backend::new(
            transport,
            limiter,
            settings.url_builder()?,
            ListCache::new(settings.single_flight),
            settings.request_by_id,
        );
        Ok(Self {
            backend,
            registry: ResolverRegistry::with_defaults(),
        })
    }

    /// Builds a source over HTTP with the bundled interval rate limiter.
    #[cfg(feature = "http")]
    pub fn from_settings(settings: &Settings) -> AppResult<Self> {
        use crate::transport::{HttpTransport, IntervalRateLimiter};

        let transport = HttpTransport::new(settings.http.timeout(), settings.http.api_key.clone());
        let limiter = IntervalRateLimiter::new(settings.http.min_interval());
        Self::new(settings, Arc::new(transport), Arc::new(limiter))
    }

    /// Resolves one record.
    pub fn get(&self, kind: EntityKind, query: &Query, ctx: &Context<'_>) -> AppResult<Record> {
        self.registry.resolver(kind)?.get(&self.backend, query, ctx)
    }

    /// Validates `query` and returns a lazy sequence of records.
    ///
    /// `InvalidQuery` is returned here; every other failure surfaces on the
    /// element it belongs to.
    pub fn get_many<'a>(
        &'a self,
        kind: EntityKind,
        query: &Query,
        ctx: Context<'a>,
    ) -> AppResult<LazyRecords<'a>> {
        self.registry
            .resolver(kind)?
            .get_many(&self.backend, query, ctx)
    }

    /// `get` with this source as the pipeline.
    pub fn resolve(&self, kind: EntityKind, query: &Query) -> AppResult<Record> {
        self.get(kind, query, &Context::new(self))
    }

    /// `get_many` with this source as the pipeline.
    pub fn resolve_many(&self, kind: EntityKind, query: &Query) -> AppResult<LazyRecords<'_>> {
        self.get_many(kind, query, Context::new(self))
    }

    /// The shared list cache.
    pub fn cache(&self) -> &ListCache {
        self.backend.cache()
    }

    /// Replaces the resolver of one kind.
    pub fn register(&mut self, kind: EntityKind, resolver: impl Resolver + 'static) {
        self.registry.register(kind, resolver);
    }
}

impl Pipeline for StaticDataSource {
    fn get(&self, kind: EntityKind, query: &Query) -> AppResult<Record> {
        self.resolve(kind, query)
    }
}
