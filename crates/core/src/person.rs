//! Person records and their derived location status.
//!
//! The listing shows [`PersonSummary`] cards; the detail view shows a
//! [`PersonDetail`] with the last-occurrence fields. A record's
//! [`LocationStatus`] is always computed from the last occurrence's
//! "date located" field, never stored on its own.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Placeholder photos
// ---------------------------------------------------------------------------

/// Placeholder card image for records of male sex without a photo.
pub const PLACEHOLDER_PHOTO_MALE: &str = "assets/placeholder-masculino.jpg";
/// Placeholder card image for records of female sex without a photo.
pub const PLACEHOLDER_PHOTO_FEMALE: &str = "assets/placeholder-feminino.jpg";
/// Placeholder card image for records with no sex on the wire.
pub const PLACEHOLDER_PHOTO_UNKNOWN: &str = "assets/placeholder-pessoa.jpg";

// ---------------------------------------------------------------------------
// Sex
// ---------------------------------------------------------------------------

/// Sex as recorded on the remote record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Unknown,
    Male,
    Female,
}

impl Sex {
    /// Parse the wire value (`MASCULINO` / `FEMININO`), defaulting to
    /// `Unknown` for anything else.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "MASCULINO" => Sex::Male,
            "FEMININO" => Sex::Female,
            _ => Sex::Unknown,
        }
    }

    /// Card image used when the record carries no photo URL.
    pub fn placeholder_photo(&self) -> &'static str {
        match self {
            Sex::Male => PLACEHOLDER_PHOTO_MALE,
            Sex::Female => PLACEHOLDER_PHOTO_FEMALE,
            Sex::Unknown => PLACEHOLDER_PHOTO_UNKNOWN,
        }
    }
}

// ---------------------------------------------------------------------------
// LocationStatus
// ---------------------------------------------------------------------------

/// Whether a person is still missing or has been located.
///
/// Purely derived: `Located` iff the last occurrence carries a non-null
/// "date located". There is no independent status field to fall out of
/// sync with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationStatus {
    Missing,
    Located,
}

impl LocationStatus {
    /// Derive the status from the last occurrence's "date located" field.
    ///
    /// A record without a last occurrence has no located date and is
    /// therefore `Missing`.
    pub fn from_date_located(date_located: Option<NaiveDate>) -> Self {
        if date_located.is_some() {
            LocationStatus::Located
        } else {
            LocationStatus::Missing
        }
    }

    /// Display label as the directory shows it.
    pub fn label(&self) -> &'static str {
        match self {
            LocationStatus::Missing => "Desaparecida",
            LocationStatus::Located => "Localizada",
        }
    }
}

// ---------------------------------------------------------------------------
// PersonSummary
// ---------------------------------------------------------------------------

/// One listing card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonSummary {
    pub id: DbId,
    pub display_name: String,
    /// Photo URL; already substituted with a sex-appropriate placeholder
    /// when the wire record carried none.
    pub photo_url: String,
    pub location_status: LocationStatus,
    pub sex: Sex,
    /// Age in years, when the record carries one.
    pub age: Option<u32>,
}

// ---------------------------------------------------------------------------
// PersonDetail
// ---------------------------------------------------------------------------

/// A poster published for the case (missing-person flyer, etc.).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poster {
    pub url: String,
    /// Wire poster kind, e.g. `PDF_DESAPARECIDO`.
    pub kind: Option<String>,
}

/// Full detail record: the summary plus last-occurrence fields.
///
/// Every detail field is optional; absent fields are omitted from
/// display rather than rendered empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonDetail {
    pub summary: PersonSummary,
    /// When the person disappeared.
    pub disappearance_date: Option<NaiveDateTime>,
    /// Free-text description of where the person was last seen.
    pub location_description: Option<String>,
    /// What the person was wearing when last seen.
    pub clothing_description: Option<String>,
    /// Free-text additional information from the occurrence interview.
    pub info: Option<String>,
    /// Occurrence id used to file tips against this case. Nullable on
    /// the wire; a tip cannot be submitted without it.
    pub occurrence_id: Option<DbId>,
    pub posters: Vec<Poster>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
