//! Strata Core Types
//!
//! This crate provides the foundational types used throughout Strata:
//! - Identity types (TypeId, InstanceId, SessionId)
//! - Value types (the Value enum and the ScalarType it is checked against)
//! - Scope types (Scope, ScopeKey)
//! - Common error types

mod error;
mod id;
mod scope;
mod value;

pub use error::*;
pub use id::*;
pub use scope::*;
pub use value::*;
