//! Store error types.
//!
//! Every request-time failure leaves the store as it was before the request.

use strata_constraint::{ConstraintError, Violation};
use strata_core::{InstanceId, TypeId};
use strata_table::TableError;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while mutating or reading the store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing required property: {property} on type {type_name}")]
    MissingRequiredProperty { type_name: String, property: String },

    #[error("Type mismatch for {type_name}.{member}: expected {expected}, got {actual}")]
    TypeMismatch {
        type_name: String,
        member: String,
        expected: String,
        actual: String,
    },

    #[error("Constraint violated: {type_name}.{property} value {value} already exists")]
    ConstraintViolation {
        type_name: String,
        property: String,
        value: String,
    },

    #[error("Duplicate link target: {target} is already linked via {type_name}.{link}")]
    DuplicateLinkTarget {
        type_name: String,
        link: String,
        target: InstanceId,
    },

    #[error("Wrong scope for {type_name}.{member}: expected {expected}, got {actual}")]
    WrongScope {
        type_name: String,
        member: String,
        expected: String,
        actual: String,
    },

    #[error("Permission denied: {type_name}.{property} is internal")]
    PermissionDenied { type_name: String, property: String },

    #[error("Unknown property: {property} on type {type_name}")]
    UnknownProperty { type_name: String, property: String },

    #[error("Unknown type: {name}")]
    UnknownType { name: String },

    #[error("Cannot instantiate abstract type: {name}")]
    AbstractType { name: String },

    #[error("Unknown instance: {id}")]
    UnknownInstance { id: InstanceId },

    #[error("Cannot {operation} the root configuration object")]
    RootConfig { operation: &'static str },

    #[error("Invalid store configuration: {message}")]
    Config { message: String },
}

impl StoreError {
    pub fn missing_required(type_name: impl Into<String>, property: impl Into<String>) -> Self {
        Self::MissingRequiredProperty {
            type_name: type_name.into(),
            property: property.into(),
        }
    }

    pub fn type_mismatch(
        type_name: impl Into<String>,
        member: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            type_name: type_name.into(),
            member: member.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn duplicate_link_target(
        type_name: impl Into<String>,
        link: impl Into<String>,
        target: InstanceId,
    ) -> Self {
        Self::DuplicateLinkTarget {
            type_name: type_name.into(),
            link: link.into(),
            target,
        }
    }

    pub fn wrong_scope(
        type_name: impl Into<String>,
        member: impl Into<String>,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        Self::WrongScope {
            type_name: type_name.into(),
            member: member.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub fn permission_denied(type_name: impl Into<String>, property: impl Into<String>) -> Self {
        Self::PermissionDenied {
            type_name: type_name.into(),
            property: property.into(),
        }
    }

    pub fn unknown_property(type_name: impl Into<String>, property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            type_name: type_name.into(),
            property: property.into(),
        }
    }

    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }

    pub fn abstract_type(name: impl Into<String>) -> Self {
        Self::AbstractType { name: name.into() }
    }

    pub fn unknown_instance(id: InstanceId) -> Self {
        Self::UnknownInstance { id }
    }

    pub fn root_config(operation: &'static str) -> Self {
        Self::RootConfig { operation }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Unknown type id, named by its id.
    pub fn unknown_type_id(type_id: TypeId) -> Self {
        Self::unknown_type(type_id.to_string())
    }

    /// True for rejections caused by scope or permission gating.
    pub fn is_gating(&self) -> bool {
        matches!(
            self,
            StoreError::WrongScope { .. } | StoreError::PermissionDenied { .. }
        )
    }
}

impl From<Violation> for StoreError {
    fn from(v: Violation) -> Self {
        Self::ConstraintViolation {
            type_name: v.type_name,
            property: v.property,
            value: v.value.to_string(),
        }
    }
}

impl From<ConstraintError> for StoreError {
    fn from(e: ConstraintError) -> Self {
        match e {
            ConstraintError::UnknownType { type_id } => Self::unknown_type_id(type_id),
            ConstraintError::UnknownProperty {
                type_name,
                property,
            } => Self::UnknownProperty {
                type_name,
                property,
            },
        }
    }
}

impl From<TableError> for StoreError {
    fn from(e: TableError) -> Self {
        match e {
            TableError::InstanceNotFound(id) | TableError::InstanceExists(id) => {
                Self::unknown_instance(id)
            }
        }
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(e: toml::de::Error) -> Self {
        Self::config(e.to_string())
    }
}
