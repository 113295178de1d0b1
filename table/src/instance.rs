//! Configuration object instances.

use strata_core::{InstanceId, ScopeKey, TypeId, Value, Values};

/// An instance of a concrete object type.
#[derive(Debug, Clone)]
pub struct Instance {
    /// Unique identifier for this instance.
    pub id: InstanceId,
    /// Type of this instance (reference to the type graph).
    pub type_id: TypeId,
    /// Partition that owns this instance.
    pub scope: ScopeKey,
    /// Incremented on every property change.
    pub version: u64,
    /// Property values.
    pub values: Values,
}

impl Instance {
    /// Create a new instance with the given properties.
    pub fn new(id: InstanceId, type_id: TypeId, scope: ScopeKey, values: Values) -> Self {
        Self {
            id,
            type_id,
            scope,
            version: 1,
            values,
        }
    }

    /// Get a property value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Set a property value, returning the previous one.
    pub fn set(&mut self, name: String, value: Value) -> Option<Value> {
        self.version += 1;
        self.values.insert(name, value)
    }
}
