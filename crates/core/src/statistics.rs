//! Aggregate case counters shown above the listing.

use serde::{Deserialize, Serialize};

/// Directory-wide counts of open and resolved cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub missing_count: u64,
    pub located_count: u64,
}
