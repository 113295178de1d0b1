//! Exclusivity checking.

use std::collections::BTreeSet;

use strata_core::{InstanceId, TypeId, Value, Values};
use strata_schema::TypeGraph;
use strata_table::InstanceTable;
use tracing::trace;

use crate::error::{ConstraintError, ConstraintResult};
use crate::violation::{Violation, Violations};

/// Constraint engine over one partition's instance population.
///
/// Pure read: callers hold whatever lock guards `table` across the check and
/// the commit that follows it.
pub struct ConstraintEngine<'g, 't> {
    graph: &'g TypeGraph,
    table: &'t InstanceTable,
}

impl<'g, 't> ConstraintEngine<'g, 't> {
    /// Create a new constraint engine.
    pub fn new(graph: &'g TypeGraph, table: &'t InstanceTable) -> Self {
        Self { graph, table }
    }

    /// True when no instance other than `excluding` holds `value` for
    /// `property` within the exclusivity scope of `type_id`.
    pub fn check_exclusive(
        &self,
        type_id: TypeId,
        property: &str,
        value: &Value,
        excluding: Option<InstanceId>,
    ) -> bool {
        self.find_conflict(type_id, property, value, excluding)
            .is_none()
    }

    /// Check every exclusive property of a prospective instance.
    ///
    /// `values` are the values the instance would hold after the write.
    pub fn check_instance(
        &self,
        type_id: TypeId,
        values: &Values,
        excluding: Option<InstanceId>,
    ) -> ConstraintResult<Violations> {
        let view = self
            .graph
            .resolve(type_id)
            .ok_or_else(|| ConstraintError::unknown_type(type_id))?;

        let mut violations = Violations::new();
        for property in view.properties.iter().filter(|p| p.is_exclusive()) {
            let Some(value) = values.get(&property.name) else {
                continue;
            };
            if let Some((declaring, existing)) =
                self.find_conflict(type_id, &property.name, value, excluding)
            {
                violations.push(
                    Violation::exclusive(
                        self.graph.type_name(declaring),
                        &property.name,
                        value.clone(),
                    )
                    .with_conflict(existing),
                );
            }
        }
        Ok(violations)
    }

    /// Check a single property value of a prospective write.
    pub fn check_property(
        &self,
        type_id: TypeId,
        property: &str,
        value: &Value,
        excluding: Option<InstanceId>,
    ) -> ConstraintResult<Option<Violation>> {
        if self.graph.property(type_id, property).is_none() {
            return Err(ConstraintError::unknown_property(
                self.graph.type_name(type_id),
                property,
            ));
        }

        Ok(self
            .find_conflict(type_id, property, value, excluding)
            .map(|(declaring, existing)| {
                Violation::exclusive(self.graph.type_name(declaring), property, value.clone())
                    .with_conflict(existing)
            }))
    }

    // ========== Internal checking methods ==========

    /// Ancestor-or-self types that declare `property` exclusive.
    fn declaring_types(&self, type_id: TypeId, property: &str) -> Vec<TypeId> {
        self.graph
            .lineage(type_id)
            .iter()
            .copied()
            .filter(|&t| {
                self.graph
                    .get_type(t)
                    .and_then(|ty| ty.own_property(property))
                    .map(|p| p.is_exclusive())
                    .unwrap_or(false)
            })
            .collect()
    }

    /// First instance holding `value`, with the type whose constraint it breaks.
    fn find_conflict(
        &self,
        type_id: TypeId,
        property: &str,
        value: &Value,
        excluding: Option<InstanceId>,
    ) -> Option<(TypeId, InstanceId)> {
        if value.is_null() {
            return None;
        }

        let mut scanned = BTreeSet::new();
        for declaring in self.declaring_types(type_id, property) {
            for member in self.graph.family(declaring) {
                if !scanned.insert(member) {
                    continue;
                }
                trace!(
                    type_name = %self.graph.type_name(member),
                    property,
                    "exclusivity scan"
                );
                let conflict = self
                    .table
                    .find_exact(member, property, value)
                    .find(|&id| Some(id) != excluding);
                if let Some(existing) = conflict {
                    return Some((declaring, existing));
                }
            }
        }
        None
    }
}
