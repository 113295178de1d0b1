//! Name validation for types and members.

use regex_lite::Regex;
use std::sync::LazyLock;

use crate::error::{SchemaError, SchemaResult};

static TYPE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(::[A-Za-z_][A-Za-z0-9_]*)+$")
        .expect("type name pattern is valid")
});

static MEMBER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("member name pattern is valid"));

/// Check a qualified type name (`module::Name`).
pub fn check_type_name(name: &str) -> SchemaResult<()> {
    if TYPE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(SchemaError::invalid_name("type", name))
    }
}

/// Check a property or link name.
pub fn check_member_name(name: &str) -> SchemaResult<()> {
    if MEMBER_NAME.is_match(name) {
        Ok(())
    } else {
        Err(SchemaError::invalid_name("member", name))
    }
}
