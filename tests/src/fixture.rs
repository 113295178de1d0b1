//! Shared fixtures.

use std::sync::Once;

use strata_schema::{load_str, testmode, SchemaResult, TypeGraph};
use strata_session::{ConfigApi, SessionError};
use strata_store::{StoreConfig, StoreError};
use tracing_subscriber::EnvFilter;

/// Base type with an exclusive `name` and two concrete subtypes.
pub const FAMILY_SCHEMA: &str = r#"
[[types]]
name = "test::Subclass1"
extends = "test::Base"
properties = [{ name = "sub1", type = "str" }]

[[types]]
name = "test::Subclass2"
extends = "test::Base"
properties = [{ name = "sub2", type = "str" }]

[[types]]
name = "test::Base"
properties = [{ name = "name", type = "str", required = true, constraints = ["exclusive"] }]

[[types]]
name = "test::Config"
properties = [
    { name = "limit", type = "int64", default = 10 },
    { name = "ratio", type = "float64" },
]
links = [{ name = "items", target = "test::Base", multi = true }]
"#;

static TRACING: Once = Once::new();

/// Install a test subscriber once. Filter with `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Build the family schema.
pub fn family_schema() -> SchemaResult<TypeGraph> {
    load_str(FAMILY_SCHEMA)
}

/// A configuration API over the test-mode schema.
pub fn test_api(test_mode: bool) -> Result<ConfigApi, SessionError> {
    init_tracing();
    ConfigApi::bootstrap(
        testmode::schema()?,
        StoreConfig::default().with_test_mode(test_mode),
    )
}

/// Variant name of the store error behind a failure.
pub fn error_kind(error: &SessionError) -> &'static str {
    match error {
        SessionError::Schema(_) => "Schema",
        SessionError::Store(e) => match e {
            StoreError::MissingRequiredProperty { .. } => "MissingRequiredProperty",
            StoreError::TypeMismatch { .. } => "TypeMismatch",
            StoreError::ConstraintViolation { .. } => "ConstraintViolation",
            StoreError::DuplicateLinkTarget { .. } => "DuplicateLinkTarget",
            StoreError::WrongScope { .. } => "WrongScope",
            StoreError::PermissionDenied { .. } => "PermissionDenied",
            StoreError::UnknownProperty { .. } => "UnknownProperty",
            StoreError::UnknownType { .. } => "UnknownType",
            StoreError::AbstractType { .. } => "AbstractType",
            StoreError::UnknownInstance { .. } => "UnknownInstance",
            StoreError::RootConfig { .. } => "RootConfig",
            StoreError::Config { .. } => "Config",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_schema_builds() {
        let graph = family_schema().unwrap();
        let base = graph.type_id("test::Base").unwrap();
        assert_eq!(graph.get_subtypes(base).count(), 2);
    }

    #[test]
    fn test_error_kind() {
        let error = SessionError::from(StoreError::permission_denied("cfg::Config", "x"));
        assert_eq!(error_kind(&error), "PermissionDenied");
    }
}
