//! Constraint violation types.

use std::fmt;

use strata_core::{InstanceId, Value};
use strata_schema::ConstraintKind;

/// A constraint violation.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The kind of constraint that was violated.
    pub kind: ConstraintKind,
    /// Type that declares the constraint.
    pub type_name: String,
    /// Property the constraint is attached to.
    pub property: String,
    /// The offending value.
    pub value: Value,
    /// Existing instance already holding the value.
    pub conflicting: Option<InstanceId>,
}

impl Violation {
    /// Create an exclusivity violation.
    pub fn exclusive(
        type_name: impl Into<String>,
        property: impl Into<String>,
        value: Value,
    ) -> Self {
        Self {
            kind: ConstraintKind::Exclusive,
            type_name: type_name.into(),
            property: property.into(),
            value,
            conflicting: None,
        }
    }

    /// Add the conflicting instance to the violation context.
    pub fn with_conflict(mut self, instance_id: InstanceId) -> Self {
        self.conflicting = Some(instance_id);
        self
    }

    /// Human-readable message describing the violation.
    pub fn message(&self) -> String {
        match self.kind {
            ConstraintKind::Exclusive => format!(
                "{}.{} violates exclusivity constraint: value {} already exists",
                self.type_name, self.property, self.value
            ),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Collection of violations.
#[derive(Debug, Clone, Default)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    /// Create a new empty violations collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a violation.
    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Check if there are any violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Get all violations.
    pub fn all(&self) -> &[Violation] {
        &self.violations
    }

    /// The first violation, if any.
    pub fn first(&self) -> Option<&Violation> {
        self.violations.first()
    }

    /// Get the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Merge another violations collection.
    pub fn merge(&mut self, other: Violations) {
        self.violations.extend(other.violations);
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}
