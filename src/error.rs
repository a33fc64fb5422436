//! Error types for hierarchy synchronization.
//!
//! Remote-call failures are classified so that a negative existence probe
//! (HTTP 404) is distinguishable from permission or transient failures: the
//! export engine uses [`SyncError::is_not_found`] to select the creation
//! path instead of treating the probe as a failure.

use thiserror::Error;

/// Errors that can occur while importing or exporting a hierarchy.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Top-level input validation failed.  This is the only error that
    /// aborts a whole export before traversal begins.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Client or credential configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Authentication failed (bad token, expired installation token).
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The remote resource does not exist (HTTP 404).  Used as the negative
    /// arm of an existence probe, not reported as a failure by the engine.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The remote platform rate limited the request.
    #[error("rate limited by remote platform (retry after {retry_after_secs:?}s)")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Any other remote API failure.
    #[error("remote API error (HTTP {status}): {detail}")]
    Api { status: u16, detail: String },

    /// Transport-level HTTP failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response body could not be parsed into the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
}

impl SyncError {
    /// Whether this error is a negative existence probe.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::NotFound(_))
    }
}

/// Result alias used throughout the crate.
pub type SyncResult<T> = Result<T, SyncError>;
