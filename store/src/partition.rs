//! Partition state: the instance table and scalar settings of one scope.

use strata_core::{Value, Values};
use strata_table::InstanceTable;

/// Instance data and root-config settings owned by one partition.
#[derive(Debug, Default)]
pub struct Partition {
    /// Config object instances and the link sets stored in this scope.
    pub table: InstanceTable,
    /// Scalar settings of the root config, as set at this scope.
    pub settings: Values,
}

impl Partition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn setting(&self, property: &str) -> Option<&Value> {
        self.settings.get(property)
    }

    /// Store or clear a setting; returns the previous value.
    pub fn put_setting(&mut self, property: &str, value: Option<Value>) -> Option<Value> {
        match value {
            Some(value) => self.settings.insert(property.to_string(), value),
            None => self.settings.remove(property),
        }
    }
}

/// A session partition behind its read-write lock.
///
/// `closed` is set by teardown under the write lock; a mutation that
/// acquires the lock afterwards must retry against a fresh partition.
#[derive(Debug, Default)]
pub struct SessionState {
    pub partition: Partition,
    pub closed: bool,
}
