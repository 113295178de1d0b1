//! Constraint error types.

use strata_core::TypeId;
use thiserror::Error;

/// Result type for constraint operations.
pub type ConstraintResult<T> = Result<T, ConstraintError>;

/// Errors that can occur during constraint checking.
#[derive(Debug, Error)]
pub enum ConstraintError {
    #[error("Unknown type: {type_id}")]
    UnknownType { type_id: TypeId },

    #[error("Unknown property '{property}' on type {type_name}")]
    UnknownProperty { type_name: String, property: String },
}

impl ConstraintError {
    pub fn unknown_type(type_id: TypeId) -> Self {
        Self::UnknownType { type_id }
    }

    pub fn unknown_property(type_name: impl Into<String>, property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            type_name: type_name.into(),
            property: property.into(),
        }
    }
}
