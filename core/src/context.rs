#![deny(missing_docs)]

//! # Pipeline Context
//!
//! The ambient handle passed into every call so that defaults can be resolved
//! through the orchestrating pipeline (e.g. the current version comes from the
//! realm record). It is borrowed per call and never retained by the engine.

use crate::error::AppResult;
use crate::query::Query;
use crate::record::{EntityKind, Record};

/// Anything that can resolve a record by kind and query.
pub trait Pipeline {
    /// Resolves a single record.
    fn get(&self, kind: EntityKind, query: &Query) -> AppResult<Record>;
}

/// Per-call context.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pipeline: &'a dyn Pipeline,
}

impl<'a> Context<'a> {
    /// Wraps a pipeline handle.
    pub fn new(pipeline: &'a dyn Pipeline) -> Self {
        Self { pipeline }
    }

    /// The orchestrating pipeline.
    pub fn pipeline(&self) -> &'a dyn Pipeline {
        self.pipeline
    }
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context").field("pipeline", &"Pipeline(..)").finish()
    }
}
