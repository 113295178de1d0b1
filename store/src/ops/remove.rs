//! Instance removal and session purge.

use strata_core::InstanceId;
use tracing::debug;

use crate::partition::Partition;

/// Remove an instance and every link reference to it.
/// Returns false if the partition does not hold it.
pub fn remove_instance(partition: &mut Partition, id: InstanceId) -> bool {
    match partition.table.remove(id) {
        Ok(instance) => {
            debug!(instance = %id, scope = %instance.scope, "removed instance");
            true
        }
        Err(_) => false,
    }
}

/// Empty a session partition, returning the ids of the instances it held.
pub fn purge_session(partition: &mut Partition) -> Vec<InstanceId> {
    let ids: Vec<InstanceId> = partition.table.ids().collect();
    *partition = Partition::new();
    ids
}
