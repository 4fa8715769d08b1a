//! Citizen tip submissions.
//!
//! A tip is ephemeral: built when the dialog submits, sent once, and
//! discarded. It is never cached or retried automatically.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Rejection message when the dialog holds no occurrence id to file
/// the tip against.
pub const MSG_MISSING_OCCURRENCE: &str =
    "Este registro não possui uma ocorrência associada para receber informações.";

/// One photo attached to a tip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipPhoto {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A sighting or information report filed against one case occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipSubmission {
    pub occurrence_id: DbId,
    /// Where the person was seen.
    pub location: String,
    /// Free-text information for the investigators.
    pub notes: String,
    pub photos: Vec<TipPhoto>,
}

impl TipSubmission {
    /// Assemble a submission, rejecting locally when the occurrence id is
    /// absent. The guard runs before any network call is made.
    pub fn new(
        occurrence_id: Option<DbId>,
        location: String,
        notes: String,
        photos: Vec<TipPhoto>,
    ) -> Result<Self, CoreError> {
        let occurrence_id = occurrence_id
            .ok_or_else(|| CoreError::Validation(MSG_MISSING_OCCURRENCE.to_string()))?;
        Ok(Self {
            occurrence_id,
            location,
            notes,
            photos,
        })
    }
}
