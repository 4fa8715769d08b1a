//! Domain-level error type.

/// Errors produced by pure domain logic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Input failed a domain validation rule.
    #[error("{0}")]
    Validation(String),
}
