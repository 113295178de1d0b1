//! Link operations.

use strata_core::{InstanceId, Scope, ScopeKey, SessionId, TypeId};
use strata_schema::LinkDef;
use tracing::debug;

use super::{Placement, Schema};
use crate::error::{StoreError, StoreResult};
use crate::partition::Partition;

/// Partition that stores `owner`'s link set named by `link`.
///
/// `system` links live in the System partition. Other links of the root
/// config live in the session partition, one set per session. Links of any
/// other instance live with their owner. `None` means a session is required
/// but none was given.
pub fn link_scope(
    schema: Schema<'_>,
    owner: InstanceId,
    owner_at: Placement,
    link: &LinkDef,
    session: Option<SessionId>,
) -> Option<ScopeKey> {
    if schema.attributes.is_system(owner_at.type_id, &link.name) {
        Some(ScopeKey::System)
    } else if owner == schema.root {
        session.map(ScopeKey::Session)
    } else {
        Some(owner_at.scope)
    }
}

/// Validate a link request against the schema and the placements of both ends.
pub fn check_link<'a>(
    schema: Schema<'a>,
    owner: InstanceId,
    owner_at: Placement,
    link: &str,
    scope: ScopeKey,
    target_at: Placement,
) -> StoreResult<&'a LinkDef> {
    let view = schema
        .graph
        .resolve(owner_at.type_id)
        .ok_or_else(|| StoreError::unknown_type_id(owner_at.type_id))?;
    let link_def = view
        .link(link)
        .ok_or_else(|| StoreError::unknown_property(&view.name, link))?;

    // The request must address the partition that holds this link set
    match link_scope(schema, owner, owner_at, link_def, scope.session()) {
        Some(expected) if expected == scope => {}
        Some(expected) => {
            return Err(StoreError::wrong_scope(&view.name, link, expected, scope));
        }
        None => {
            return Err(StoreError::wrong_scope(&view.name, link, Scope::Session, scope));
        }
    }

    // The target must live in that same partition
    if target_at.scope != scope {
        return Err(StoreError::wrong_scope(
            &view.name,
            link,
            scope,
            target_at.scope,
        ));
    }

    let target_type = view
        .link_target(link)
        .ok_or_else(|| StoreError::unknown_type(&link_def.target))?;
    if !schema.graph.is_subtype(target_at.type_id, target_type) {
        return Err(StoreError::type_mismatch(
            &view.name,
            link,
            &link_def.target,
            schema.graph.type_name(target_at.type_id),
        ));
    }

    Ok(link_def)
}

/// Add to a multi link, or replace a single link, inside the partition.
pub fn apply_link(
    schema: Schema<'_>,
    partition: &mut Partition,
    owner: InstanceId,
    owner_type: TypeId,
    link: &LinkDef,
    target: InstanceId,
) -> StoreResult<()> {
    if owner != schema.root && !partition.table.contains(owner) {
        return Err(StoreError::unknown_instance(owner));
    }
    if !partition.table.contains(target) {
        return Err(StoreError::unknown_instance(target));
    }

    if link.is_multi() {
        if !partition.table.add_link(owner, &link.name, target) {
            return Err(StoreError::duplicate_link_target(
                schema.graph.type_name(owner_type),
                &link.name,
                target,
            ));
        }
    } else {
        partition.table.replace_link(owner, &link.name, target);
    }

    debug!(owner = %owner, link = %link.name, target = %target, "linked instance");
    Ok(())
}
