//! Scripted [`Directory`] double shared by the controller integration
//! tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use abitus_core::filter::{Filter, QueryKey};
use abitus_core::page::{total_pages, PageResult, PAGE_SIZE};
use abitus_core::person::{LocationStatus, PersonDetail, PersonSummary, Sex};
use abitus_core::statistics::Statistics;
use abitus_core::tip::TipSubmission;
use abitus_core::types::DbId;
use abitus_gateway::error::MSG_DATA_UNAVAILABLE;
use abitus_gateway::{Directory, GatewayError};

/// A [`Directory`] whose responses are scripted per key. Unscripted
/// keys answer with `DataUnavailable`, so a test that forgets a script
/// fails loudly rather than hanging.
#[derive(Default)]
pub struct ScriptedDirectory {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    pages: HashMap<QueryKey, PageScript>,
    listing_calls: Vec<QueryKey>,
    details: HashMap<DbId, PersonDetail>,
    statistics: VecDeque<Result<Statistics, GatewayError>>,
    statistics_calls: usize,
    tip_results: VecDeque<Result<(), GatewayError>>,
    tips: Vec<TipSubmission>,
}

struct PageScript {
    result: Result<PageResult, GatewayError>,
    delay: Duration,
}

impl ScriptedDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- scripting ----

    pub fn script_page(&self, filter: Filter, page: u32, result: Result<PageResult, GatewayError>) {
        self.script_page_delayed(filter, page, result, Duration::ZERO);
    }

    /// Script a page whose response only arrives after `delay` of
    /// virtual time (for in-flight / superseded-key scenarios).
    pub fn script_page_delayed(
        &self,
        filter: Filter,
        page: u32,
        result: Result<PageResult, GatewayError>,
        delay: Duration,
    ) {
        let key = QueryKey { filter, page };
        self.inner
            .lock()
            .unwrap()
            .pages
            .insert(key, PageScript { result, delay });
    }

    pub fn script_statistics(&self, result: Result<Statistics, GatewayError>) {
        self.inner.lock().unwrap().statistics.push_back(result);
    }

    pub fn script_tip(&self, result: Result<(), GatewayError>) {
        self.inner.lock().unwrap().tip_results.push_back(result);
    }

    // ---- observations ----

    pub fn listing_calls(&self) -> Vec<QueryKey> {
        self.inner.lock().unwrap().listing_calls.clone()
    }

    /// How many listing calls were issued for one (filter, page) key.
    pub fn calls_for(&self, filter: &Filter, page: u32) -> usize {
        let key = QueryKey {
            filter: filter.clone(),
            page,
        };
        self.inner
            .lock()
            .unwrap()
            .listing_calls
            .iter()
            .filter(|called| **called == key)
            .count()
    }

    pub fn statistics_calls(&self) -> usize {
        self.inner.lock().unwrap().statistics_calls
    }

    pub fn submitted_tips(&self) -> Vec<TipSubmission> {
        self.inner.lock().unwrap().tips.clone()
    }
}

#[async_trait::async_trait]
impl Directory for ScriptedDirectory {
    async fn list_by_filter(
        &self,
        filter: &Filter,
        page: u32,
    ) -> Result<PageResult, GatewayError> {
        let key = QueryKey {
            filter: filter.clone(),
            page,
        };
        let (result, delay) = {
            let mut inner = self.inner.lock().unwrap();
            inner.listing_calls.push(key.clone());
            match inner.pages.get(&key) {
                Some(script) => (script.result.clone(), script.delay),
                None => (
                    Err(GatewayError::DataUnavailable(MSG_DATA_UNAVAILABLE)),
                    Duration::ZERO,
                ),
            }
        };
        if delay > Duration::ZERO {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn get_by_id(&self, id: DbId) -> Result<PersonDetail, GatewayError> {
        self.inner
            .lock()
            .unwrap()
            .details
            .get(&id)
            .cloned()
            .ok_or(GatewayError::DataUnavailable(MSG_DATA_UNAVAILABLE))
    }

    async fn get_statistics(&self) -> Result<Statistics, GatewayError> {
        let mut inner = self.inner.lock().unwrap();
        inner.statistics_calls += 1;
        inner
            .statistics
            .pop_front()
            .unwrap_or(Err(GatewayError::DataUnavailable(MSG_DATA_UNAVAILABLE)))
    }

    async fn submit_tip(&self, tip: &TipSubmission) -> Result<(), GatewayError> {
        let mut inner = self.inner.lock().unwrap();
        inner.tips.push(tip.clone());
        inner
            .tip_results
            .pop_front()
            .unwrap_or(Err(GatewayError::SubmissionFailed(
                abitus_gateway::error::MSG_SUBMISSION_FAILED,
            )))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Build a page of `count` synthetic cards out of `total_elements`
/// records, with ids starting at `first_id`.
pub fn make_page(first_id: DbId, count: usize, total_elements: u64) -> PageResult {
    let items = (0..count)
        .map(|offset| PersonSummary {
            id: first_id + offset as DbId,
            display_name: format!("Pessoa {}", first_id + offset as DbId),
            photo_url: "assets/placeholder-pessoa.jpg".into(),
            location_status: LocationStatus::Missing,
            sex: Sex::Unknown,
            age: None,
        })
        .collect();
    PageResult {
        items,
        total_pages: total_pages(total_elements, PAGE_SIZE),
        total_elements,
    }
}

/// A one-page result set (no prefetch will be issued for it).
pub fn single_page(first_id: DbId, count: usize) -> PageResult {
    make_page(first_id, count, count as u64)
}

/// Yield to the runtime so freshly spawned fetch tasks get to run
/// before a test inspects the call log.
pub async fn drain_spawned_tasks() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}
