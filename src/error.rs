// Error types for the delivery and promotion engines
// Domain-expected conditions (no zone, no promotion) are never errors;
// they surface as typed results instead.

use std::time::Duration;
use thiserror::Error;

/// Errors raised by the external store and geometry collaborators.
///
/// A store error inside a zone strategy is recovered locally (the resolver
/// degrades to the fallback estimator); a store error during the initial
/// business/city lookups propagates to the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached or returned a malformed row
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A single read exceeded the caller-supplied deadline
    #[error("store lookup timed out after {0:?}")]
    Timeout(Duration),
}

/// Main error type for the delivery engine
///
/// Only malformed input and unrecoverable collaborator failures reach the
/// caller; everything else collapses into a `DeliveryResult`.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Latitude or longitude missing, non-finite, or out of range.
    /// Rejected before any store access.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Unrecoverable store failure during the business/city lookups
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

impl From<validator::ValidationErrors> for EngineError {
    fn from(err: validator::ValidationErrors) -> Self {
        EngineError::InvalidCoordinate(err.to_string())
    }
}
