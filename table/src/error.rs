//! Instance table error types.

use strata_core::InstanceId;
use thiserror::Error;

/// Errors that can occur during table operations.
#[derive(Debug, Error)]
pub enum TableError {
    /// Instance not found.
    #[error("Instance not found: {0}")]
    InstanceNotFound(InstanceId),

    /// Instance id already in use.
    #[error("Instance already exists: {0}")]
    InstanceExists(InstanceId),
}

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;
