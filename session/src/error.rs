//! Session error types.

use strata_schema::SchemaError;
use strata_store::StoreError;
use thiserror::Error;

/// Result type for configuration API calls.
pub type SessionResult<T> = Result<T, SessionError>;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Schema could not be built at bootstrap.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Store rejected the request.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl SessionError {
    /// The store error behind this failure, if any.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            SessionError::Store(e) => Some(e),
            SessionError::Schema(_) => None,
        }
    }
}
