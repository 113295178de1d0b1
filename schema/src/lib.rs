//! Strata Schema
//!
//! The type graph: object types, their properties and links, single
//! inheritance and the per-member annotations that gate visibility and scope.
//! The graph is built once at bootstrap via TypeGraphBuilder and is immutable
//! afterwards.

mod attributes;
mod builder;
mod error;
mod graph;
mod loader;
mod names;
pub mod testmode;
mod types;

pub use attributes::AttributeRegistry;
pub use builder::TypeGraphBuilder;
pub use error::{SchemaError, SchemaResult};
pub use graph::TypeGraph;
pub use loader::{load_str, AlterDecl, LinkDecl, PropertyDecl, SchemaDecl, TypeDecl};
pub use types::*;
