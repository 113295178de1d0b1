//! Property validation helpers for store operations.

use strata_constraint::ConstraintEngine;
use strata_core::{InstanceId, ScalarType, TypeId, Value, Values};
use strata_schema::{PropertyDef, ResolvedType, TypeGraph};
use strata_table::InstanceTable;

use crate::error::{StoreError, StoreResult};

/// Check a value against its declared scalar type.
///
/// `int64` values are widened for `float64` properties when the float holds
/// them exactly; every other mismatch fails.
pub fn coerce_value(type_name: &str, property: &PropertyDef, value: Value) -> StoreResult<Value> {
    match (property.value_type, value) {
        (ScalarType::Float64, Value::Int(i)) => {
            Value::exact_float(i).map(Value::Float).ok_or_else(|| {
                StoreError::type_mismatch(
                    type_name,
                    &property.name,
                    ScalarType::Float64.name(),
                    ScalarType::Int64.name(),
                )
            })
        }
        (expected, value) if value.scalar_type() == Some(expected) => Ok(value),
        (expected, value) => Err(StoreError::type_mismatch(
            type_name,
            &property.name,
            expected.name(),
            value.type_name(),
        )),
    }
}

/// Look up a property for assignment. Links are not assignable as values.
pub fn lookup_property<'a>(view: &'a ResolvedType, name: &str) -> StoreResult<&'a PropertyDef> {
    view.property(name)
        .ok_or_else(|| StoreError::unknown_property(&view.name, name))
}

/// Validate every assigned value; Null assignments are dropped.
pub fn check_values(view: &ResolvedType, values: Values) -> StoreResult<Values> {
    let mut checked = Values::with_capacity(values.len());
    for (name, value) in values {
        let property = lookup_property(view, &name)?;
        if value.is_null() {
            continue;
        }
        let value = coerce_value(&view.name, property, value)?;
        checked.insert(name, value);
    }
    Ok(checked)
}

/// Apply default values to missing properties.
pub fn apply_defaults(view: &ResolvedType, values: &mut Values) {
    for property in &view.properties {
        if !values.contains_key(&property.name) {
            if let Some(ref default_value) = property.default {
                values.insert(property.name.clone(), default_value.clone());
            }
        }
    }
}

/// Check that all required properties are present.
pub fn check_required(view: &ResolvedType, values: &Values) -> StoreResult<()> {
    for property in view.properties.iter().filter(|p| p.required) {
        if !values.contains_key(&property.name) {
            return Err(StoreError::missing_required(&view.name, &property.name));
        }
    }
    Ok(())
}

/// Check exclusivity of a prospective instance against the partition.
pub fn check_exclusive(
    graph: &TypeGraph,
    table: &InstanceTable,
    type_id: TypeId,
    values: &Values,
    excluding: Option<InstanceId>,
) -> StoreResult<()> {
    let violations = ConstraintEngine::new(graph, table).check_instance(type_id, values, excluding)?;
    match violations.into_iter().next() {
        Some(violation) => Err(violation.into()),
        None => Ok(()),
    }
}
