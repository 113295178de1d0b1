//! Instance creation.

use strata_core::{InstanceId, ScopeKey, TypeId, Values};
use strata_table::Instance;
use tracing::debug;

use super::Schema;
use crate::error::{StoreError, StoreResult};
use crate::partition::Partition;
use crate::validation;

/// Validate the values of a new instance against its type.
///
/// Returns the values to store: type-checked, widened, with defaults
/// applied and required properties verified.
pub fn prepare_instance(schema: Schema<'_>, type_id: TypeId, values: Values) -> StoreResult<Values> {
    // Look up the type
    let view = schema
        .graph
        .resolve(type_id)
        .ok_or_else(|| StoreError::unknown_type_id(type_id))?;

    // Check that type is not abstract
    if view.is_abstract {
        return Err(StoreError::abstract_type(&view.name));
    }
    if type_id == schema.root_type {
        return Err(StoreError::root_config("create another instance of"));
    }

    let mut values = validation::check_values(view, values)?;
    validation::apply_defaults(view, &mut values);
    validation::check_required(view, &values)?;

    Ok(values)
}

/// Check exclusivity against the partition and store the instance.
pub fn commit_instance(
    schema: Schema<'_>,
    partition: &mut Partition,
    id: InstanceId,
    type_id: TypeId,
    scope: ScopeKey,
    values: Values,
) -> StoreResult<()> {
    validation::check_exclusive(schema.graph, &partition.table, type_id, &values, None)?;

    partition
        .table
        .insert(Instance::new(id, type_id, scope, values))?;

    debug!(
        instance = %id,
        type_name = %schema.graph.type_name(type_id),
        scope = %scope,
        "created instance"
    );
    Ok(())
}
