//! Summary counters with their own staleness clock.
//!
//! Statistics change far less often than listing pages, so they live in
//! a separate single-value cache with a longer lifetime. A failed fetch
//! degrades the counters to a pending display and never disturbs the
//! listing.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use abitus_core::statistics::Statistics;
use abitus_gateway::Directory;

/// How long a fetched [`Statistics`] answers without a refetch.
pub const STATISTICS_TTL: Duration = Duration::from_secs(10 * 60);

/// What the two summary counters should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatisticsView {
    /// No usable value; render the counters as pending.
    Pending,
    Ready(Statistics),
}

pub struct StatisticsCache {
    directory: Arc<dyn Directory>,
    cached: Option<(Statistics, Instant)>,
    ttl: Duration,
}

impl StatisticsCache {
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self {
            directory,
            cached: None,
            ttl: STATISTICS_TTL,
        }
    }

    /// Return the counters, refetching when the cached value has aged
    /// out. On failure the stale value is not served; the counters drop
    /// to [`StatisticsView::Pending`] until a later call succeeds.
    pub async fn get(&mut self) -> StatisticsView {
        let now = Instant::now();
        if let Some((statistics, fetched_at)) = self.cached {
            if now.duration_since(fetched_at) < self.ttl {
                return StatisticsView::Ready(statistics);
            }
        }

        match self.directory.get_statistics().await {
            Ok(statistics) => {
                self.cached = Some((statistics, now));
                StatisticsView::Ready(statistics)
            }
            Err(error) => {
                tracing::warn!(error = %error, "statistics refresh failed");
                self.cached = None;
                StatisticsView::Pending
            }
        }
    }
}
