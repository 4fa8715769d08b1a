//! The query-state controller behind the listing page.
//!
//! Owns the user-editable filter and page number, derives the query key
//! from them, and keeps the visible page reconciled with the cache:
//! fresh cache entries answer without a network call, key changes keep
//! the previous page on screen as a stale placeholder while the new
//! fetch runs, and every freshly shown page speculatively prefetches
//! its successor.
//!
//! Fetches run as spawned tasks and report back over an unbounded
//! channel; [`ListingController::pump`] commits completions on the
//! owning task. A completion whose key is no longer current goes into
//! the cache but never touches visible state, which is the entire
//! stale-response-discard discipline: there is no transport-level
//! cancellation, late results are simply ignored.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::Instant;

use abitus_core::filter::{Filter, QueryKey, SexFilter, StatusFilter};
use abitus_core::page::{clamp_page, PageResult};
use abitus_core::person::PersonSummary;
use abitus_gateway::{Directory, GatewayError};

use crate::cache::{EntryState, PageCache};
use crate::debounce::{Debounce, SEARCH_DEBOUNCE};

// ---------------------------------------------------------------------------
// Fetch plumbing
// ---------------------------------------------------------------------------

/// Why a fetch was issued. Foreground failures become visible; prefetch
/// failures are silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    Foreground,
    Prefetch,
}

/// A completed fetch, delivered over the controller's channel.
struct FetchOutcome {
    key: QueryKey,
    kind: FetchKind,
    result: Result<PageResult, GatewayError>,
}

// ---------------------------------------------------------------------------
// Read surface
// ---------------------------------------------------------------------------

/// Load state of the current query key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingPhase {
    /// No result for the current key yet; a fetch is pending or in
    /// flight.
    Loading,
    /// The visible items belong to the current key.
    Ready,
    /// The fetch for the current key failed. Terminal until
    /// [`ListingController::retry`].
    Failed(String),
}

/// Snapshot handed to the UI.
#[derive(Debug, Clone)]
pub struct ListingView {
    pub items: Vec<PersonSummary>,
    pub page: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    pub phase: ListingPhase,
    /// The visible items belong to a previous key and are shown as a
    /// placeholder while the current key loads. Callers disable the
    /// next-page control while this is set.
    pub is_stale_data: bool,
}

// ---------------------------------------------------------------------------
// ListingController
// ---------------------------------------------------------------------------

pub struct ListingController {
    directory: Arc<dyn Directory>,
    /// Effective filter. Its `search_text` only moves when the debounce
    /// settles; the other fields move on every setter call.
    filter: Filter,
    search: Debounce<String>,
    page: u32,
    cache: PageCache,
    /// Last result committed to visible state, with the key it belongs
    /// to. Kept on screen as a placeholder when the key changes.
    displayed: Option<(QueryKey, PageResult)>,
    tx: mpsc::UnboundedSender<FetchOutcome>,
    rx: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl ListingController {
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            directory,
            filter: Filter::default(),
            search: Debounce::new(String::new(), SEARCH_DEBOUNCE),
            page: 1,
            cache: PageCache::new(),
            displayed: None,
            tx,
            rx,
        }
    }

    // ---- mutation surface ----

    /// Record a search-text edit. Takes effect only after the debounce
    /// interval passes with no further edit; settling resets the page
    /// to 1.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search.set(text.into(), Instant::now());
    }

    /// Set the age bounds (years; `0` means unset). Effective on the
    /// next fetch immediately.
    pub fn set_age_range(&mut self, min_age: u32, max_age: u32) {
        if self.filter.min_age != min_age || self.filter.max_age != max_age {
            self.filter.min_age = min_age;
            self.filter.max_age = max_age;
            self.page = 1;
        }
    }

    /// Set the sex filter. Effective on the next fetch immediately.
    pub fn set_sex(&mut self, sex: SexFilter) {
        if self.filter.sex != sex {
            self.filter.sex = sex;
            self.page = 1;
        }
    }

    /// Set the status filter. Effective on the next fetch immediately.
    pub fn set_status(&mut self, status: StatusFilter) {
        if self.filter.status != status {
            self.filter.status = status;
            self.page = 1;
        }
    }

    /// Jump to a page, clamped against the last known page count for
    /// the current filter.
    pub fn set_page(&mut self, page: u32) {
        self.page = match self.known_total_pages() {
            Some(total) => clamp_page(page, total),
            None => page.max(1),
        };
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    /// Reset every filter field and return to page 1.
    pub fn clear_filters(&mut self) {
        self.filter = Filter::default();
        self.search = Debounce::new(String::new(), SEARCH_DEBOUNCE);
        self.page = 1;
    }

    /// Re-attempt the fetch for the current key after a failure.
    pub fn retry(&mut self) {
        let key = self.effective_key();
        if matches!(self.cache.state(&key), Some(EntryState::Failed(_))) {
            self.cache.remove(&key);
        }
    }

    // ---- read surface ----

    pub fn page(&self) -> u32 {
        self.page
    }

    /// The text an input field should echo (pending edits included).
    pub fn search_input(&self) -> &str {
        self.search.latest()
    }

    /// The filter as it currently applies to fetches.
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> ListingView {
        let key = self.effective_key();
        let displayed_current = self.displays(&key);

        let phase = match self.cache.state(&key) {
            Some(EntryState::Failed(message)) => ListingPhase::Failed(message.clone()),
            Some(EntryState::Resolved(_)) if displayed_current => ListingPhase::Ready,
            _ => ListingPhase::Loading,
        };

        let (items, total_pages, total_elements) = match &self.displayed {
            Some((_, result)) => (result.items.clone(), result.total_pages, result.total_elements),
            None => (Vec::new(), 0, 0),
        };

        ListingView {
            items,
            page: self.page,
            total_pages,
            total_elements,
            phase,
            is_stale_data: !displayed_current && self.displayed.is_some(),
        }
    }

    // ---- drivers ----

    /// Advance the controller: settle the debounce, commit completed
    /// fetches, and issue whatever fetch the current key needs. Cheap;
    /// call after any mutation and on every UI tick.
    pub fn pump(&mut self) {
        let now = Instant::now();
        if self.search.poll(now) {
            self.filter.search_text = self.search.settled().clone();
            self.page = 1;
        }
        while let Ok(outcome) = self.rx.try_recv() {
            self.handle_outcome(outcome, now);
        }
        self.ensure_current(now);
    }

    /// Drive until the current key is resolved or failed (debounce
    /// included). The await points are where fetch results are allowed
    /// to land; state only ever mutates on this task.
    pub async fn settle(&mut self) {
        loop {
            self.pump();
            if self.is_settled() {
                return;
            }

            let received = match self.search.deadline() {
                Some(deadline) => {
                    tokio::select! {
                        outcome = self.rx.recv() => outcome,
                        _ = tokio::time::sleep_until(deadline) => None,
                    }
                }
                None => self.rx.recv().await,
            };
            if let Some(outcome) = received {
                self.handle_outcome(outcome, Instant::now());
            }
        }
    }

    // ---- internals ----

    fn effective_key(&self) -> QueryKey {
        QueryKey {
            filter: self.filter.clone(),
            page: self.page,
        }
    }

    fn displays(&self, key: &QueryKey) -> bool {
        self.displayed
            .as_ref()
            .map(|(displayed_key, _)| displayed_key == key)
            .unwrap_or(false)
    }

    /// The last total-page count observed for the current filter, taken
    /// from the displayed result when it belongs to that filter.
    fn known_total_pages(&self) -> Option<u32> {
        self.displayed
            .as_ref()
            .filter(|(key, _)| key.filter == self.filter)
            .map(|(_, result)| result.total_pages)
    }

    fn is_settled(&self) -> bool {
        if self.search.deadline().is_some() {
            return false;
        }
        let key = self.effective_key();
        match self.cache.state(&key) {
            Some(EntryState::Failed(_)) => true,
            Some(EntryState::Resolved(_)) => self.displays(&key),
            _ => false,
        }
    }

    /// Commit one completed fetch. Results always land in the cache;
    /// only a result for the *current* key may touch visible state.
    fn handle_outcome(&mut self, outcome: FetchOutcome, now: Instant) {
        let FetchOutcome { key, kind, result } = outcome;
        match result {
            Ok(result) => {
                self.cache.commit_resolved(key.clone(), result.clone(), now);
                if key == self.effective_key() {
                    self.show(key, result, now);
                }
            }
            Err(error) => match kind {
                FetchKind::Prefetch => {
                    // Best-effort: drop the slot so a real navigation
                    // issues a normal foreground fetch.
                    tracing::debug!(page = key.page, error = %error, "prefetch failed");
                    self.cache.remove(&key);
                }
                FetchKind::Foreground => {
                    self.cache.commit_failed(key, error.to_string(), now);
                }
            },
        }
    }

    /// Make `result` the visible page and prefetch its successor. A
    /// result proving fewer pages than the current position snaps the
    /// page number back into range.
    fn show(&mut self, key: QueryKey, result: PageResult, now: Instant) {
        self.maybe_prefetch(&key, result.total_pages, now);
        let last_page = result.total_pages.max(1);
        self.displayed = Some((key, result));
        if self.page > last_page {
            self.page = last_page;
        }
    }

    /// Issue the speculative fetch for `page + 1` unless the cache
    /// already holds a live entry for it. The cache check is what makes
    /// "at most one prefetch per resolved page-load" structural.
    fn maybe_prefetch(&mut self, key: &QueryKey, total_pages: u32, now: Instant) {
        if key.page >= total_pages {
            return;
        }
        let next = QueryKey {
            filter: key.filter.clone(),
            page: key.page + 1,
        };
        let live = match self.cache.state(&next) {
            Some(EntryState::Fetching) => true,
            Some(EntryState::Failed(_)) => true,
            Some(EntryState::Resolved(_)) => self.cache.is_fresh(&next, now),
            None => false,
        };
        if !live {
            self.cache.mark_fetching(next.clone(), now);
            self.spawn_fetch(next, FetchKind::Prefetch);
        }
    }

    /// Issue the foreground fetch the current key needs, or promote a
    /// fresh cache entry without a network call.
    fn ensure_current(&mut self, now: Instant) {
        let key = self.effective_key();

        enum Action {
            Wait,
            Promote(PageResult),
            Fetch,
        }

        let action = match self.cache.state(&key) {
            Some(EntryState::Fetching) | Some(EntryState::Failed(_)) => Action::Wait,
            Some(EntryState::Resolved(_)) => match self.cache.fresh_result(&key, now) {
                Some(result) if !self.displays(&key) => Action::Promote(result.clone()),
                Some(_) => Action::Wait,
                // Expired: revalidate while the old result stays visible.
                None => Action::Fetch,
            },
            None => Action::Fetch,
        };

        match action {
            Action::Wait => {}
            Action::Promote(result) => self.show(key, result, now),
            Action::Fetch => {
                self.cache.mark_fetching(key.clone(), now);
                self.spawn_fetch(key, FetchKind::Foreground);
            }
        }
    }

    fn spawn_fetch(&self, key: QueryKey, kind: FetchKind) {
        tracing::debug!(page = key.page, ?kind, "issuing listing fetch");
        let directory = Arc::clone(&self.directory);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = directory.list_by_filter(&key.filter, key.page).await;
            // The controller may have been dropped; nothing to do then.
            let _ = tx.send(FetchOutcome { key, kind, result });
        });
    }
}
