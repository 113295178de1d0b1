//! Instance table for one partition.

use std::collections::HashMap;

use strata_core::{InstanceId, TypeId, Value};

use crate::index::{LinkIndex, TypeIndex, ValueIndex};
use crate::{Instance, TableError, TableResult};

/// The in-memory instance storage of one partition.
///
/// Link sets are stored in the partition of the scope they belong to, so an
/// owner recorded here may live in another table.
#[derive(Debug, Default)]
pub struct InstanceTable {
    /// Instance storage
    instances: HashMap<InstanceId, Instance>,
    /// Type index
    type_index: TypeIndex,
    /// Value index
    value_index: ValueIndex,
    /// Link index
    link_index: LinkIndex,
}

impl InstanceTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Instance Operations ====================

    /// Store a new instance.
    pub fn insert(&mut self, instance: Instance) -> TableResult<()> {
        let id = instance.id;
        if self.instances.contains_key(&id) {
            return Err(TableError::InstanceExists(id));
        }

        // Update indexes
        self.type_index.insert(instance.type_id, id);
        for (name, value) in &instance.values {
            self.value_index.insert(instance.type_id, name, value, id);
        }

        self.instances.insert(id, instance);
        Ok(())
    }

    /// Get an instance by ID.
    pub fn get(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(&id)
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.instances.contains_key(&id)
    }

    /// Remove an instance together with every link set it owns and every
    /// reference to it.
    pub fn remove(&mut self, id: InstanceId) -> TableResult<Instance> {
        let instance = self
            .instances
            .remove(&id)
            .ok_or(TableError::InstanceNotFound(id))?;

        self.type_index.remove(instance.type_id, id);
        for (name, value) in &instance.values {
            self.value_index.remove(instance.type_id, name, value, id);
        }
        self.link_index.purge(id);

        Ok(instance)
    }

    /// Set a property value, keeping the value index in sync.
    /// `Value::Null` clears the property.
    pub fn set_value(&mut self, id: InstanceId, name: &str, value: Value) -> TableResult<()> {
        let instance = self
            .instances
            .get_mut(&id)
            .ok_or(TableError::InstanceNotFound(id))?;
        let type_id = instance.type_id;

        if let Some(old_value) = instance.get(name) {
            self.value_index.remove(type_id, name, old_value, id);
        }

        if value.is_null() {
            instance.version += 1;
            instance.values.remove(name);
        } else {
            self.value_index.insert(type_id, name, &value, id);
            instance.set(name.to_string(), value);
        }

        Ok(())
    }

    // ==================== Link Operations ====================

    /// Add a target to a link set. Returns false if already present.
    pub fn add_link(&mut self, owner: InstanceId, link: &str, target: InstanceId) -> bool {
        self.link_index.insert(owner, link, target)
    }

    /// Replace the whole link set with a single target.
    pub fn replace_link(&mut self, owner: InstanceId, link: &str, target: InstanceId) {
        self.link_index.clear(owner, link);
        self.link_index.insert(owner, link, target);
    }

    /// Targets of a link set, in id order.
    pub fn linked(&self, owner: InstanceId, link: &str) -> Vec<InstanceId> {
        self.link_index.targets(owner, link).collect()
    }

    // ==================== Query Operations ====================

    /// Find instances by exact type.
    pub fn by_type(&self, type_id: TypeId) -> impl Iterator<Item = InstanceId> + '_ {
        self.type_index.get(type_id)
    }

    /// Find instances of a type holding exactly this property value.
    pub fn find_exact(
        &self,
        type_id: TypeId,
        property: &str,
        value: &Value,
    ) -> impl Iterator<Item = InstanceId> + '_ {
        self.value_index.find_exact(type_id, property, value)
    }

    pub fn ids(&self) -> impl Iterator<Item = InstanceId> + '_ {
        self.instances.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
