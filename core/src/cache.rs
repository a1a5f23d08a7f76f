#![deny(missing_docs)]

//! # List Cache
//!
//! Process-lifetime memo of list responses, per list kind, keyed by the query
//! fingerprint. A hit is authoritative: there is no TTL and no freshness check,
//! so entries can go stale when the upstream version moves on.
//!
//! Stored records are shared behind `Arc` and never mutated after insertion.

use crate::error::AppResult;
use crate::query::QueryFingerprint;
use crate::record::{EntityKind, Record};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

type Slot = Arc<Mutex<()>>;

/// Memoized list responses.
#[derive(Default)]
pub struct ListCache {
    single_flight: bool,
    entries: RwLock<HashMap<EntityKind, HashMap<QueryFingerprint, Arc<Record>>>>,
    in_flight: Mutex<HashMap<(EntityKind, QueryFingerprint), Slot>>,
}

impl ListCache {
    /// Creates an empty cache.
    ///
    /// With `single_flight`, concurrent misses on the same fingerprint wait for
    /// the first fetch instead of fetching again. Without it, every racing
    /// caller fetches and the last write wins.
    pub fn new(single_flight: bool) -> Self {
        Self {
            single_flight,
            ..Self::default()
        }
    }

    /// Cached value, if any.
    pub fn get(&self, kind: EntityKind, fingerprint: &QueryFingerprint) -> Option<Arc<Record>> {
        self.entries
            .read()
            .get(&kind)
            .and_then(|by_fp| by_fp.get(fingerprint))
            .cloned()
    }

    /// Stores a value, replacing any previous one.
    pub fn insert(
        &self,
        kind: EntityKind,
        fingerprint: QueryFingerprint,
        record: Record,
    ) -> Arc<Record> {
        let record = Arc::new(record);
        self.entries
            .write()
            .entry(kind)
            .or_default()
            .insert(fingerprint, record.clone());
        record
    }

    /// Returns the cached value or runs `fetch` and caches its result.
    ///
    /// Failed fetches are not cached.
    pub fn get_or_fetch<F>(
        &self,
        kind: EntityKind,
        fingerprint: QueryFingerprint,
        fetch: F,
    ) -> AppResult<Arc<Record>>
    where
        F: FnOnce() -> AppResult<Record>,
    {
        if let Some(hit) = self.get(kind, &fingerprint) {
            tracing::debug!(%kind, "list cache hit");
            return Ok(hit);
        }

        if !self.single_flight {
            tracing::debug!(%kind, "list cache miss");
            let record = fetch()?;
            return Ok(self.insert(kind, fingerprint, record));
        }

        let key = (kind, fingerprint);
        let slot: Slot = self.in_flight.lock().entry(key.clone()).or_default().clone();

        let result = {
            let _guard = slot.lock();
            match self.get(kind, &key.1) {
                Some(hit) => {
                    tracing::debug!(%kind, "list cache filled by concurrent fetch");
                    Ok(hit)
                }
                None => {
                    tracing::debug!(%kind, "list cache miss");
                    fetch().map(|record| self.insert(kind, key.1.clone(), record))
                }
            }
        };
        self.release(&key, slot);
        result
    }

    /// Gives up one hold on a slot; the last holder removes it.
    ///
    /// Slots are only cloned and released under the `in_flight` lock, so a
    /// count of one means the map holds the only reference.
    fn release(&self, key: &(EntityKind, QueryFingerprint), slot: Slot) {
        let mut in_flight = self.in_flight.lock();
        drop(slot);
        if in_flight.get(key).is_some_and(|s| Arc::strong_count(s) == 1) {
            in_flight.remove(key);
        }
    }

    /// Number of cached lists across all kinds.
    pub fn len(&self) -> usize {
        self.entries.read().values().map(HashMap::len).sum()
    }

    /// Number of cached lists of one kind.
    pub fn len_of(&self, kind: EntityKind) -> usize {
        self.entries.read().get(&kind).map_or(0, HashMap::len)
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Drops the entries of one kind.
    pub fn clear_kind(&self, kind: EntityKind) {
        self.entries.write().remove(&kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::query::QueryValue;
    use indexmap::IndexMap;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    fn fingerprint(version: &str) -> QueryFingerprint {
        let mut params = IndexMap::new();
        params.insert("version".to_string(), QueryValue::from(version));
        QueryFingerprint::of(&params)
    }

    fn list(version: &str) -> Record {
        Record::from_value(EntityKind::ChampionList, json!({"version": version, "data": {}}))
            .unwrap()
    }

    #[test]
    fn test_second_lookup_is_a_hit() {
        let cache = ListCache::new(false);
        let calls = AtomicUsize::new(0);
        let fetch = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(list("7.24.1"))
        };

        let first = cache
            .get_or_fetch(EntityKind::ChampionList, fingerprint("7.24.1"), fetch)
            .unwrap();
        let second = cache
            .get_or_fetch(EntityKind::ChampionList, fingerprint("7.24.1"), || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(list("other"))
            })
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_kinds_are_separate() {
        let cache = ListCache::new(true);
        cache.insert(EntityKind::ChampionList, fingerprint("1"), list("1"));
        assert!(cache.get(EntityKind::ItemList, &fingerprint("1")).is_none());
        assert_eq!(cache.len_of(EntityKind::ChampionList), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let cache = ListCache::new(true);
        let err = cache
            .get_or_fetch(EntityKind::RuneList, fingerprint("1"), || {
                Err(AppError::NotFound("gone".into()))
            })
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(cache.is_empty());

        cache
            .get_or_fetch(EntityKind::RuneList, fingerprint("1"), || Ok(list("1")))
            .unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let cache = ListCache::new(false);
        cache.insert(EntityKind::ChampionList, fingerprint("1"), list("1"));
        cache.insert(EntityKind::ItemList, fingerprint("1"), list("1"));
        cache.clear_kind(EntityKind::ItemList);
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_single_flight_fetches_once_under_contention() {
        let cache = Arc::new(ListCache::new(true));
        let calls = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                let calls = calls.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    cache
                        .get_or_fetch(EntityKind::ItemList, fingerprint("7.24.1"), || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(Duration::from_millis(50));
                            Ok(list("7.24.1"))
                        })
                        .unwrap()
                })
            })
            .collect();

        let results: Vec<Arc<Record>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
    }

    #[test]
    fn test_single_flight_holds_after_a_failed_fetch() {
        let cache = Arc::new(ListCache::new(true));
        let calls = Arc::new(AtomicUsize::new(0));
        let running = Arc::new(AtomicUsize::new(0));
        let max_running = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = [0u64, 20, 200]
            .into_iter()
            .map(|delay| {
                let cache = cache.clone();
                let calls = calls.clone();
                let running = running.clone();
                let max_running = max_running.clone();
                thread::spawn(move || {
                    thread::sleep(Duration::from_millis(delay));
                    cache.get_or_fetch(EntityKind::ItemList, fingerprint("7.24.1"), || {
                        let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                        max_running.fetch_max(now, Ordering::SeqCst);
                        let first = calls.fetch_add(1, Ordering::SeqCst) == 0;
                        let result = if first {
                            thread::sleep(Duration::from_millis(100));
                            Err(AppError::NotFound("upstream hiccup".into()))
                        } else {
                            thread::sleep(Duration::from_millis(300));
                            Ok(list("7.24.1"))
                        };
                        running.fetch_sub(1, Ordering::SeqCst);
                        result
                    })
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(max_running.load(Ordering::SeqCst), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(results[0].as_ref().unwrap_err().is_not_found());
        assert!(results[1].is_ok() && results[2].is_ok());
        assert!(cache.in_flight.lock().is_empty());
    }

    #[test]
    fn test_in_flight_slots_are_released() {
        let cache = ListCache::new(true);
        cache
            .get_or_fetch(EntityKind::RuneList, fingerprint("1"), || Ok(list("1")))
            .unwrap();
        cache
            .get_or_fetch(EntityKind::RuneList, fingerprint("2"), || {
                Err(AppError::NotFound("gone".into()))
            })
            .unwrap_err();
        assert!(cache.in_flight.lock().is_empty());
    }

    #[test]
    fn test_without_single_flight_racing_writes_stay_consistent() {
        let cache = Arc::new(ListCache::new(false));
        let barrier = Arc::new(Barrier::new(4));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = cache.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    cache
                        .get_or_fetch(EntityKind::ItemList, fingerprint("7.24.1"), || {
                            Ok(list("7.24.1"))
                        })
                        .unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().version(), Some("7.24.1"));
        }
        assert_eq!(cache.len(), 1);
    }
}
