//! Lifecycle of the tip-composition dialog.
//!
//! `Closed → Composing → Submitting → {Succeeded | Failed}`. Success
//! shows a confirmation and auto-closes after a fixed delay (driven by
//! [`TipDialog::tick`], cooperative like the rest of the controller
//! layer); failure keeps the fields intact so the visitor can edit and
//! resubmit without retyping. Exactly one POST per submit, never an
//! automatic retry.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use abitus_core::tip::{TipPhoto, TipSubmission};
use abitus_core::types::DbId;
use abitus_gateway::Directory;

/// How long the success confirmation stays up before the dialog closes
/// itself.
pub const AUTO_CLOSE_DELAY: Duration = Duration::from_secs(3);

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Dialog state. The draft fields live alongside, not inside, so a
/// `Failed → Composing` edit keeps them untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    Closed,
    Composing,
    Submitting,
    Succeeded {
        /// When [`TipDialog::tick`] should auto-close the dialog.
        close_at: Instant,
    },
    Failed {
        /// User-facing message; retry-eligible.
        message: String,
    },
}

/// The fields being composed. The occurrence id comes from the detail
/// record the dialog was opened for and can genuinely be absent — the
/// wire field is nullable — in which case submit rejects locally.
#[derive(Debug, Clone, Default, PartialEq)]
struct TipDraft {
    occurrence_id: Option<DbId>,
    location: String,
    notes: String,
    photos: Vec<TipPhoto>,
}

// ---------------------------------------------------------------------------
// TipDialog
// ---------------------------------------------------------------------------

pub struct TipDialog {
    directory: Arc<dyn Directory>,
    state: DialogState,
    draft: TipDraft,
}

impl TipDialog {
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self {
            directory,
            state: DialogState::Closed,
            draft: TipDraft::default(),
        }
    }

    // ---- lifecycle ----

    /// Open the dialog for a case, with empty fields. The occurrence id
    /// is threaded in from the detail record.
    pub fn open_for_case(&mut self, occurrence_id: Option<DbId>) {
        self.draft = TipDraft {
            occurrence_id,
            ..TipDraft::default()
        };
        self.state = DialogState::Composing;
    }

    /// Cancel from any non-submitting state: clear the fields and
    /// close.
    pub fn cancel(&mut self) {
        if self.state == DialogState::Submitting {
            return;
        }
        self.draft = TipDraft::default();
        self.state = DialogState::Closed;
    }

    /// Dismiss the success confirmation without waiting for the
    /// auto-close.
    pub fn dismiss(&mut self) {
        if matches!(self.state, DialogState::Succeeded { .. }) {
            self.draft = TipDraft::default();
            self.state = DialogState::Closed;
        }
    }

    /// Auto-close the success confirmation once its delay has passed.
    pub fn tick(&mut self) {
        if let DialogState::Succeeded { close_at } = self.state {
            if Instant::now() >= close_at {
                self.draft = TipDraft::default();
                self.state = DialogState::Closed;
            }
        }
    }

    // ---- field editing ----

    pub fn set_location(&mut self, location: impl Into<String>) {
        if self.editing() {
            self.draft.location = location.into();
        }
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        if self.editing() {
            self.draft.notes = notes.into();
        }
    }

    pub fn add_photo(&mut self, photo: TipPhoto) {
        if self.editing() {
            self.draft.photos.push(photo);
        }
    }

    /// An edit while in `Failed` re-enters composition with the fields
    /// intact.
    fn editing(&mut self) -> bool {
        match self.state {
            DialogState::Composing => true,
            DialogState::Failed { .. } => {
                self.state = DialogState::Composing;
                true
            }
            _ => false,
        }
    }

    // ---- submission ----

    /// Submit the draft: exactly one POST. A draft without an
    /// occurrence id is rejected locally, with no network call.
    pub async fn submit(&mut self) {
        if !matches!(
            self.state,
            DialogState::Composing | DialogState::Failed { .. }
        ) {
            return;
        }

        let tip = match TipSubmission::new(
            self.draft.occurrence_id,
            self.draft.location.clone(),
            self.draft.notes.clone(),
            self.draft.photos.clone(),
        ) {
            Ok(tip) => tip,
            Err(error) => {
                self.state = DialogState::Failed {
                    message: error.to_string(),
                };
                return;
            }
        };

        self.state = DialogState::Submitting;
        match self.directory.submit_tip(&tip).await {
            Ok(()) => {
                self.state = DialogState::Succeeded {
                    close_at: Instant::now() + AUTO_CLOSE_DELAY,
                };
            }
            Err(error) => {
                self.state = DialogState::Failed {
                    message: error.to_string(),
                };
            }
        }
    }

    // ---- read surface ----

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn location(&self) -> &str {
        &self.draft.location
    }

    pub fn notes(&self) -> &str {
        &self.draft.notes
    }

    pub fn photo_count(&self) -> usize {
        self.draft.photos.len()
    }
}
