//! Lazy sequences for "get many" requests.
//!
//! Each element is resolved when pulled, so one failing element never prevents
//! the others from being produced. A sequence is consumed by iteration and
//! cannot be restarted.

use super::list::get_list;
use super::Backend;
use crate::context::Context;
use crate::endpoints::ListFamily;
use crate::error::{AppError, AppResult};
use crate::platform::Platform;
use crate::query::Query;
use crate::record::{EntityKind, Record};
use serde_json::Value;
use std::collections::HashMap;
use std::iter::FusedIterator;
use std::sync::Arc;

/// A finite, single-pass sequence of per-element results.
pub struct LazyRecords<'a> {
    kind: EntityKind,
    inner: Box<dyn Iterator<Item = AppResult<Record>> + 'a>,
}

impl<'a> LazyRecords<'a> {
    /// Wraps any per-element iterator.
    pub fn new(kind: EntityKind, inner: impl Iterator<Item = AppResult<Record>> + 'a) -> Self {
        Self {
            kind,
            inner: Box::new(inner.fuse()),
        }
    }

    /// One element per platform, each resolved by `resolve` on demand.
    pub fn per_platform<F>(kind: EntityKind, platforms: Vec<Platform>, mut resolve: F) -> Self
    where
        F: FnMut(Platform) -> AppResult<Record> + 'a,
    {
        Self::new(kind, platforms.into_iter().map(move |p| resolve(p)))
    }

    /// The kind every element is resolved as.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }
}

impl Iterator for LazyRecords<'_> {
    type Item = AppResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        if let Err(err) = &item {
            tracing::warn!(kind = %self.kind, error = %err, "fan-out element failed");
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl FusedIterator for LazyRecords<'_> {}

enum ListState {
    Pending,
    Ready {
        list: Arc<Record>,
        keys_by_id: HashMap<i64, String>,
    },
    Failed,
}

/// Many ids on one platform: one list fetch, then per-id lookups.
///
/// The list is fetched (or taken from the cache) on the first pull. If that
/// fetch fails, its error is the first element and the sequence ends.
pub(crate) struct IdFanOut<'a> {
    backend: &'a Backend,
    family: ListFamily,
    list_query: Query,
    ctx: Context<'a>,
    ids: std::vec::IntoIter<i64>,
    state: ListState,
}

impl<'a> IdFanOut<'a> {
    pub(crate) fn new(
        backend: &'a Backend,
        family: ListFamily,
        list_query: Query,
        ctx: Context<'a>,
        ids: Vec<i64>,
    ) -> Self {
        Self {
            backend,
            family,
            list_query,
            ctx,
            ids: ids.into_iter(),
            state: ListState::Pending,
        }
    }

    fn ensure_list(&mut self) -> AppResult<()> {
        if let ListState::Pending = self.state {
            match get_list(self.backend, self.family, &self.list_query, &self.ctx) {
                Ok(list) => {
                    let keys_by_id = index_by_id(&list);
                    self.state = ListState::Ready { list, keys_by_id };
                }
                Err(err) => {
                    self.state = ListState::Failed;
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    fn lookup(&self, id: i64) -> AppResult<Record> {
        let ListState::Ready { list, keys_by_id } = &self.state else {
            return Err(AppError::NotFound(format!(
                "No {} list available for id \"{}\"",
                self.family.label, id
            )));
        };

        keys_by_id
            .get(&id)
            .and_then(|key| list.get("data")?.get(key)?.as_object())
            .map(|entry| Record::new(self.family.entity, entry.clone()))
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No {} exists with id \"{}\"",
                    self.family.label, id
                ))
            })
    }
}

impl Iterator for IdFanOut<'_> {
    type Item = AppResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if let ListState::Failed = self.state {
            return None;
        }
        let id = self.ids.next()?;
        if let Err(err) = self.ensure_list() {
            return Some(Err(err));
        }
        Some(self.lookup(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.state {
            ListState::Failed => (0, Some(0)),
            _ => (0, Some(self.ids.len())),
        }
    }
}

/// Maps entry ids to their keys in the list's `data` object.
fn index_by_id(list: &Record) -> HashMap<i64, String> {
    list.get("data")
        .and_then(Value::as_object)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|(key, entry)| Some((entry.get("id")?.as_i64()?, key.clone())))
                .collect()
        })
        .unwrap_or_default()
}
