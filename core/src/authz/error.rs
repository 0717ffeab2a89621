//! Authorization error types.

use std::time::Duration;

use thiserror::Error;

/// Failures reaching the tier-role configuration store.
///
/// Both variants mean the same thing to the engine: membership for that
/// tier could not be confirmed. Neither is ever treated as a grant.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or the query failed.
    #[error("tier configuration store unavailable: {0}")]
    Unavailable(String),

    /// The store did not answer within the configured bound.
    #[error("tier configuration store timed out after {timeout:?}")]
    Timeout { timeout: Duration },
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}

/// Structurally invalid input to the engine.
///
/// These are programming errors in the calling layer, not runtime
/// conditions; they propagate instead of being mapped to a deny.
#[derive(Debug, Error)]
pub enum AuthorizationError {
    /// Command tag does not name a known moderation action.
    #[error("unknown moderation action: {0:?}")]
    UnknownAction(String),

    /// Persisted tier value does not name a known role tier.
    #[error("unknown role tier value: {0}")]
    UnknownTier(i16),

    /// Community id was nil.
    #[error("community id must be non-nil")]
    InvalidCommunityId,
}

/// Result type for authorization operations.
pub type AuthzResult<T> = Result<T, AuthorizationError>;
