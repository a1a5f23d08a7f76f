#![deny(missing_docs)]

//! # Static Data Core
//!
//! Validated, cached resolution of versioned and localized static game data
//! (champions, items, runes, realms, ...) from a remote HTTP service.

/// Shared error types.
pub mod error;

/// Engine settings.
pub mod config;

/// Platform and region table.
pub mod platform;

/// Entity kinds and resolved records.
pub mod record;

/// Queries, schemas and default resolvers.
pub mod query;

/// Pipeline callback handed to every call.
pub mod context;

/// Remote endpoints and URL construction.
pub mod endpoints;

/// Transport and rate limiter collaborators.
pub mod transport;

/// Stamping and per-kind repairs.
pub mod normalization;

/// List cache.
pub mod cache;

/// Per-kind resolution strategies.
pub mod resolver;

/// Public entry point.
pub mod source;

pub use cache::ListCache;
pub use config::{HttpSettings, Settings};
pub use context::{Context, Pipeline};
pub use error::{AppError, AppResult};
pub use platform::{Platform, Region};
pub use query::{Query, QueryFingerprint, QuerySchema, QueryValue, ResolvedQuery};
pub use record::{EntityKind, Record};
pub use resolver::{LazyRecords, Resolver, ResolverRegistry};
pub use source::StaticDataSource;
pub use transport::{
    IntervalRateLimiter, LimiterHandle, Params, RateLimiter, Throttle, Transport,
    TransportError, UnlimitedRateLimiter,
};

#[cfg(feature = "http")]
pub use transport::HttpTransport;
