//! Test-mode configuration schema.

use crate::error::SchemaResult;
use crate::{SchemaDecl, TypeGraph};

/// Source of the test-only configuration objects.
pub const SOURCE: &str = include_str!("testmode.toml");

/// Name of the root configuration type in the test-mode schema.
pub const ROOT_TYPE: &str = "cfg::Config";

/// Parsed test-mode declarations, for callers that extend them.
pub fn decl() -> SchemaResult<SchemaDecl> {
    SchemaDecl::from_toml(SOURCE)
}

/// Build the test-mode type graph.
pub fn schema() -> SchemaResult<TypeGraph> {
    decl()?.build()
}
