//! Property updates: root-config settings and instance properties.

use strata_constraint::ConstraintEngine;
use strata_core::{InstanceId, Scope, ScopeKey, Value};
use tracing::{debug, warn};

use super::Schema;
use crate::config::Origin;
use crate::error::{StoreError, StoreResult};
use crate::partition::Partition;
use crate::validation;

/// Validate a root-config setting.
///
/// Checks run in a fixed order: the property must exist, `system`
/// properties need System scope, the value must match the declared type,
/// and `internal` properties need test mode or a server origin. Returns the
/// value to store, `None` for a reset.
pub fn check_setting(
    schema: Schema<'_>,
    property: &str,
    value: Option<Value>,
    scope: ScopeKey,
    origin: Origin,
) -> StoreResult<Option<Value>> {
    let view = schema
        .graph
        .resolve(schema.root_type)
        .ok_or_else(|| StoreError::unknown_type_id(schema.root_type))?;
    let def = validation::lookup_property(view, property)?;

    if scope.scope() == Scope::Session && schema.attributes.is_system(view.id, property) {
        warn!(property, scope = %scope, "rejected system setting at session scope");
        return Err(StoreError::wrong_scope(
            &view.name,
            property,
            Scope::System,
            scope,
        ));
    }

    let value = match value {
        Some(value) if !value.is_null() => Some(validation::coerce_value(&view.name, def, value)?),
        _ => None,
    };

    if schema.attributes.is_internal(view.id, property)
        && !schema.test_mode
        && origin == Origin::Client
    {
        warn!(property, "rejected internal setting outside test mode");
        return Err(StoreError::permission_denied(&view.name, property));
    }

    Ok(value)
}

/// Update one property of an existing instance inside its partition.
///
/// A Null value clears an optional property.
pub fn update_instance(
    schema: Schema<'_>,
    partition: &mut Partition,
    id: InstanceId,
    property: &str,
    value: Value,
) -> StoreResult<()> {
    let type_id = partition
        .table
        .get(id)
        .map(|i| i.type_id)
        .ok_or_else(|| StoreError::unknown_instance(id))?;
    let view = schema
        .graph
        .resolve(type_id)
        .ok_or_else(|| StoreError::unknown_type_id(type_id))?;
    let def = validation::lookup_property(view, property)?;

    let value = if value.is_null() {
        if def.required {
            return Err(StoreError::missing_required(&view.name, property));
        }
        Value::Null
    } else {
        let value = validation::coerce_value(&view.name, def, value)?;
        let engine = ConstraintEngine::new(schema.graph, &partition.table);
        if let Some(violation) = engine.check_property(type_id, property, &value, Some(id))? {
            return Err(violation.into());
        }
        value
    };

    partition.table.set_value(id, property, value)?;
    debug!(instance = %id, property, "updated instance");
    Ok(())
}
