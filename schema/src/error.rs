//! Schema error types.
//!
//! Every variant is a bootstrap failure: the type graph cannot be built and
//! startup must abort.

use thiserror::Error;

/// Result type for schema construction.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while building the type graph.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Duplicate type name: {name}")]
    DuplicateType { name: String },

    #[error("Unknown parent type {parent} for {name}")]
    UnknownParent { name: String, parent: String },

    #[error("Inheritance cycle detected involving type: {name}")]
    Cycle { name: String },

    #[error("Conflicting redefinition of {member} on type {type_name}: {reason}")]
    ConflictingRedefinition {
        type_name: String,
        member: String,
        reason: String,
    },

    #[error("Invalid {kind} name: {name:?}")]
    InvalidName { kind: &'static str, name: String },

    #[error("Unknown type: {name}")]
    UnknownType { name: String },

    #[error("Unknown attribute key: {key}")]
    UnknownAttribute { key: String },

    #[error("Default for {member} on type {type_name} is {actual}, expected {expected}")]
    InvalidDefault {
        type_name: String,
        member: String,
        expected: String,
        actual: String,
    },

    #[error("Schema decode error: {message}")]
    Decode { message: String },
}

impl SchemaError {
    pub fn duplicate_type(name: impl Into<String>) -> Self {
        Self::DuplicateType { name: name.into() }
    }

    pub fn unknown_parent(name: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::UnknownParent {
            name: name.into(),
            parent: parent.into(),
        }
    }

    pub fn cycle(name: impl Into<String>) -> Self {
        Self::Cycle { name: name.into() }
    }

    pub fn conflicting_redefinition(
        type_name: impl Into<String>,
        member: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ConflictingRedefinition {
            type_name: type_name.into(),
            member: member.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_name(kind: &'static str, name: impl Into<String>) -> Self {
        Self::InvalidName {
            kind,
            name: name.into(),
        }
    }

    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }

    pub fn unknown_attribute(key: impl Into<String>) -> Self {
        Self::UnknownAttribute { key: key.into() }
    }

    pub fn invalid_default(
        type_name: impl Into<String>,
        member: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidDefault {
            type_name: type_name.into(),
            member: member.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

impl From<toml::de::Error> for SchemaError {
    fn from(e: toml::de::Error) -> Self {
        Self::Decode {
            message: e.to_string(),
        }
    }
}

impl From<strata_core::CoreError> for SchemaError {
    fn from(e: strata_core::CoreError) -> Self {
        Self::Decode {
            message: e.to_string(),
        }
    }
}
