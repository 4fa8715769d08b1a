//! Bounded in-memory cache of page results, keyed by (filter, page).
//!
//! Each key runs a small state machine: `Fetching` while a request is
//! in flight, then `Resolved` or `Failed`. Resolved entries answer
//! repeat requests without a network call for a bounded staleness
//! window; `Failed` is terminal for its key until the caller retries.
//! The map is owned by its controller, never global, and evicts
//! oldest-first once over capacity so arbitrary filter combinations
//! cannot grow it without bound.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use abitus_core::filter::QueryKey;
use abitus_core::page::PageResult;

/// How long a resolved page answers without a refetch.
pub const PAGE_TTL: Duration = Duration::from_secs(5 * 60);

/// Upper bound on concurrently cached keys.
pub const CACHE_CAPACITY: usize = 64;

// ---------------------------------------------------------------------------
// Entry state machine
// ---------------------------------------------------------------------------

/// Per-key fetch state.
#[derive(Debug, Clone)]
pub enum EntryState {
    /// A request for this key is in flight.
    Fetching,
    /// The key has a result.
    Resolved(PageResult),
    /// The fetch failed; the message is user-facing. Terminal until a
    /// manual retry replaces the entry.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub state: EntryState,
    pub updated_at: Instant,
}

// ---------------------------------------------------------------------------
// PageCache
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct PageCache {
    entries: HashMap<QueryKey, CacheEntry>,
    capacity: usize,
    ttl: Duration,
}

impl PageCache {
    pub fn new() -> Self {
        Self::with_settings(CACHE_CAPACITY, PAGE_TTL)
    }

    pub fn with_settings(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
            ttl,
        }
    }

    pub fn state(&self, key: &QueryKey) -> Option<&EntryState> {
        self.entries.get(key).map(|entry| &entry.state)
    }

    /// Whether the key holds a resolved result younger than the TTL.
    pub fn is_fresh(&self, key: &QueryKey, now: Instant) -> bool {
        self.fresh_result(key, now).is_some()
    }

    /// The resolved result for a key, if it is still inside the
    /// staleness window.
    pub fn fresh_result(&self, key: &QueryKey, now: Instant) -> Option<&PageResult> {
        let entry = self.entries.get(key)?;
        match &entry.state {
            EntryState::Resolved(result) if now.duration_since(entry.updated_at) < self.ttl => {
                Some(result)
            }
            _ => None,
        }
    }

    /// Record that a request for this key is in flight.
    pub fn mark_fetching(&mut self, key: QueryKey, now: Instant) {
        self.insert(key, EntryState::Fetching, now);
    }

    pub fn commit_resolved(&mut self, key: QueryKey, result: PageResult, now: Instant) {
        self.insert(key, EntryState::Resolved(result), now);
    }

    pub fn commit_failed(&mut self, key: QueryKey, message: String, now: Instant) {
        self.insert(key, EntryState::Failed(message), now);
    }

    /// Drop a key entirely (silent prefetch failure, manual retry).
    pub fn remove(&mut self, key: &QueryKey) {
        self.entries.remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: QueryKey, state: EntryState, now: Instant) {
        self.entries.insert(
            key,
            CacheEntry {
                state,
                updated_at: now,
            },
        );
        self.evict(now);
    }

    /// Drop expired resolved entries, then the oldest settled entries
    /// until back under capacity. In-flight entries are kept: they mark
    /// requests whose results are still expected.
    fn evict(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| match &entry.state {
            EntryState::Resolved(_) => now.duration_since(entry.updated_at) < ttl,
            _ => true,
        });

        while self.entries.len() > self.capacity {
            let oldest = self
                .entries
                .iter()
                .filter(|(_, entry)| !matches!(entry.state, EntryState::Fetching))
                .min_by_key(|(_, entry)| entry.updated_at)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => self.entries.remove(&key),
                None => break,
            };
        }
    }
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use abitus_core::filter::Filter;

    fn key(page: u32) -> QueryKey {
        QueryKey {
            filter: Filter::default(),
            page,
        }
    }

    fn page_result() -> PageResult {
        PageResult {
            items: vec![],
            total_pages: 1,
            total_elements: 0,
        }
    }

    // -- freshness -----------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn resolved_entry_is_fresh_inside_ttl() {
        let mut cache = PageCache::new();
        let now = Instant::now();
        cache.commit_resolved(key(1), page_result(), now);

        assert!(cache.is_fresh(&key(1), now + Duration::from_secs(4 * 60)));
        assert!(!cache.is_fresh(&key(1), now + Duration::from_secs(6 * 60)));
    }

    #[tokio::test(start_paused = true)]
    async fn fetching_and_failed_are_never_fresh() {
        let mut cache = PageCache::new();
        let now = Instant::now();
        cache.mark_fetching(key(1), now);
        cache.commit_failed(key(2), "erro".into(), now);

        assert!(!cache.is_fresh(&key(1), now));
        assert!(!cache.is_fresh(&key(2), now));
    }

    // -- eviction ------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn oldest_entry_evicted_over_capacity() {
        let mut cache = PageCache::with_settings(2, PAGE_TTL);
        let now = Instant::now();
        cache.commit_resolved(key(1), page_result(), now);
        cache.commit_resolved(key(2), page_result(), now + Duration::from_secs(1));
        cache.commit_resolved(key(3), page_result(), now + Duration::from_secs(2));

        assert_eq!(cache.len(), 2);
        assert!(cache.state(&key(1)).is_none());
        assert!(cache.state(&key(2)).is_some());
        assert!(cache.state(&key(3)).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entries_dropped_on_insert() {
        let mut cache = PageCache::new();
        let now = Instant::now();
        cache.commit_resolved(key(1), page_result(), now);

        let later = now + Duration::from_secs(6 * 60);
        cache.commit_resolved(key(2), page_result(), later);

        assert!(cache.state(&key(1)).is_none());
        assert!(cache.state(&key(2)).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_entries_survive_eviction() {
        let mut cache = PageCache::with_settings(1, PAGE_TTL);
        let now = Instant::now();
        cache.mark_fetching(key(1), now);
        cache.commit_resolved(key(2), page_result(), now + Duration::from_secs(1));

        assert!(matches!(
            cache.state(&key(1)),
            Some(EntryState::Fetching)
        ));
    }
}
