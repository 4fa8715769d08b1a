//! User-editable search criteria and the cache key derived from them.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enum filters
// ---------------------------------------------------------------------------

/// Sex filter. `Unspecified` matches all records and is omitted from the
/// wire request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SexFilter {
    #[default]
    Unspecified,
    Male,
    Female,
}

impl SexFilter {
    /// Wire parameter value, or `None` when the filter is unspecified.
    pub fn as_wire(&self) -> Option<&'static str> {
        match self {
            SexFilter::Unspecified => None,
            SexFilter::Male => Some("MASCULINO"),
            SexFilter::Female => Some("FEMININO"),
        }
    }
}

/// Case status filter. `Unspecified` matches all records and is omitted
/// from the wire request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    Unspecified,
    Missing,
    Located,
}

impl StatusFilter {
    /// Wire parameter value, or `None` when the filter is unspecified.
    pub fn as_wire(&self) -> Option<&'static str> {
        match self {
            StatusFilter::Unspecified => None,
            StatusFilter::Missing => Some("DESAPARECIDO"),
            StatusFilter::Located => Some("LOCALIZADO"),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// The user-editable filter fields.
///
/// The default (empty) filter matches all records: blank search text and
/// zero age bounds are treated as unset and omitted from the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    pub search_text: String,
    /// Lower age bound in years; `0` means unset.
    pub min_age: u32,
    /// Upper age bound in years; `0` means unset.
    pub max_age: u32,
    pub sex: SexFilter,
    pub status: StatusFilter,
}

impl Filter {
    /// Whether this filter constrains nothing (matches all records).
    pub fn matches_all(&self) -> bool {
        self.search_text.trim().is_empty()
            && self.min_age == 0
            && self.max_age == 0
            && self.sex == SexFilter::Unspecified
            && self.status == StatusFilter::Unspecified
    }
}

// ---------------------------------------------------------------------------
// QueryKey
// ---------------------------------------------------------------------------

/// Identity of one fetchable result set: a filter plus a 1-based page
/// number. Equal keys hit the same cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub filter: Filter,
    pub page: u32,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
