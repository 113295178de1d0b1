//! Common error types for Strata.

use thiserror::Error;

/// Errors raised while interpreting core type names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Scalar type name not recognised.
    #[error("Unknown scalar type: {0}")]
    UnknownScalarType(String),

    /// Scope name not recognised.
    #[error("Unknown scope: {0}")]
    UnknownScope(String),
}

/// Result type for core conversions.
pub type CoreResult<T> = Result<T, CoreError>;
