//! Error taxonomy of the gateway.
//!
//! Callers only ever see two kinds: a fetch that could not produce data
//! and a tip submission that did not go through. Network failures,
//! decode failures, and remote error statuses are deliberately not
//! distinguished; the technical cause is logged at the call site and
//! never shown to the user.

/// User-facing message for listing/statistics fetch failures.
pub const MSG_DATA_UNAVAILABLE: &str =
    "Não foi possível carregar os dados. Tente novamente mais tarde.";

/// User-facing message for detail fetch failures (not-found flavored;
/// a remote 404 and a transport error read the same to the visitor).
pub const MSG_RECORD_UNAVAILABLE: &str =
    "Não foi possível carregar os detalhes do registro.";

/// User-facing message for tip submission failures.
pub const MSG_SUBMISSION_FAILED: &str =
    "Não foi possível enviar as informações. Tente novamente.";

/// Errors surfaced to UI callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// A listing, detail, or statistics fetch failed.
    #[error("{0}")]
    DataUnavailable(&'static str),

    /// The tip POST failed. The submission is never retried
    /// automatically.
    #[error("{0}")]
    SubmissionFailed(&'static str),
}

/// Transport-level failure, internal to this crate. Logged, then
/// collapsed into a [`GatewayError`].
#[derive(Debug, thiserror::Error)]
pub(crate) enum ApiFailure {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote API returned a non-2xx status code.
    #[error("remote API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}
