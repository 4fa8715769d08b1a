//! Query-state and submission controllers for the directory UI.
//!
//! [`ListingController`](listing::ListingController) reconciles the
//! user-editable filter with paginated, cached, prefetched fetches.
//! [`StatisticsCache`](statistics::StatisticsCache) keeps the summary
//! counters on their own staleness clock. [`TipDialog`](tip_dialog::TipDialog)
//! runs the tip-composition dialog's lifecycle.
//!
//! All state mutation happens on the owning task; spawned fetches hand
//! their results back over a channel and are committed (or discarded as
//! stale) on the next pump.

pub mod cache;
pub mod debounce;
pub mod listing;
pub mod statistics;
pub mod tip_dialog;

pub use listing::{ListingController, ListingPhase, ListingView};
pub use statistics::{StatisticsCache, StatisticsView};
pub use tip_dialog::{DialogState, TipDialog};
