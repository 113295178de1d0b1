//! Indexes for instance lookups.

use std::collections::{BTreeSet, HashMap, HashSet};

use strata_core::{InstanceId, TypeId, Value};

/// Type index: TypeId -> Set<InstanceId>
#[derive(Debug, Default)]
pub struct TypeIndex {
    index: HashMap<TypeId, HashSet<InstanceId>>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, type_id: TypeId, id: InstanceId) {
        self.index.entry(type_id).or_default().insert(id);
    }

    pub fn remove(&mut self, type_id: TypeId, id: InstanceId) {
        if let Some(set) = self.index.get_mut(&type_id) {
            set.remove(&id);
            if set.is_empty() {
                self.index.remove(&type_id);
            }
        }
    }

    pub fn get(&self, type_id: TypeId) -> impl Iterator<Item = InstanceId> + '_ {
        self.index
            .get(&type_id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }
}

/// Hashable form of a value for exact-match lookups.
///
/// Strings compare by code points, floats by bit pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKey {
    Bool(bool),
    Int(i64),
    Float(u64),
    String(String),
}

impl ValueKey {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(ValueKey::Bool(*b)),
            Value::Int(i) => Some(ValueKey::Int(*i)),
            Value::Float(f) => Some(ValueKey::Float(f.to_bits())),
            Value::String(s) => Some(ValueKey::String(s.clone())),
        }
    }
}

/// Key for value index: (TypeId, property name, value)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ValueIndexKey {
    type_id: TypeId,
    property: String,
    value: ValueKey,
}

/// Value index: (TypeId, property, value) -> Set<InstanceId>
#[derive(Debug, Default)]
pub struct ValueIndex {
    exact: HashMap<ValueIndexKey, HashSet<InstanceId>>,
}

impl ValueIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, type_id: TypeId, property: &str, value: &Value, id: InstanceId) {
        if let Some(value) = ValueKey::from_value(value) {
            let key = ValueIndexKey {
                type_id,
                property: property.to_string(),
                value,
            };
            self.exact.entry(key).or_default().insert(id);
        }
    }

    pub fn remove(&mut self, type_id: TypeId, property: &str, value: &Value, id: InstanceId) {
        if let Some(value) = ValueKey::from_value(value) {
            let key = ValueIndexKey {
                type_id,
                property: property.to_string(),
                value,
            };
            if let Some(set) = self.exact.get_mut(&key) {
                set.remove(&id);
                if set.is_empty() {
                    self.exact.remove(&key);
                }
            }
        }
    }

    pub fn find_exact(
        &self,
        type_id: TypeId,
        property: &str,
        value: &Value,
    ) -> impl Iterator<Item = InstanceId> + '_ {
        ValueKey::from_value(value)
            .and_then(|value| {
                let key = ValueIndexKey {
                    type_id,
                    property: property.to_string(),
                    value,
                };
                self.exact.get(&key)
            })
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }
}

/// Link index: (owner, link) -> ordered set of targets, plus reverse references.
///
/// Owners need not live in the same table: the root config owns link sets in
/// every session partition.
#[derive(Debug, Default)]
pub struct LinkIndex {
    forward: HashMap<(InstanceId, String), BTreeSet<InstanceId>>,
    reverse: HashMap<InstanceId, HashSet<(InstanceId, String)>>,
}

impl LinkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target; returns false if it was already linked.
    pub fn insert(&mut self, owner: InstanceId, link: &str, target: InstanceId) -> bool {
        let added = self
            .forward
            .entry((owner, link.to_string()))
            .or_default()
            .insert(target);
        if added {
            self.reverse
                .entry(target)
                .or_default()
                .insert((owner, link.to_string()));
        }
        added
    }

    /// Remove one target; returns false if it was not linked.
    pub fn remove(&mut self, owner: InstanceId, link: &str, target: InstanceId) -> bool {
        let key = (owner, link.to_string());
        let removed = match self.forward.get_mut(&key) {
            Some(set) => {
                let removed = set.remove(&target);
                if set.is_empty() {
                    self.forward.remove(&key);
                }
                removed
            }
            None => false,
        };
        if removed {
            if let Some(refs) = self.reverse.get_mut(&target) {
                refs.remove(&key);
                if refs.is_empty() {
                    self.reverse.remove(&target);
                }
            }
        }
        removed
    }

    /// Remove every target of one link set.
    pub fn clear(&mut self, owner: InstanceId, link: &str) -> Vec<InstanceId> {
        let targets: Vec<InstanceId> = self.targets(owner, link).collect();
        for &target in &targets {
            self.remove(owner, link, target);
        }
        targets
    }

    pub fn targets(&self, owner: InstanceId, link: &str) -> impl Iterator<Item = InstanceId> + '_ {
        self.forward
            .get(&(owner, link.to_string()))
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Drop an instance from the index, both as owner and as target.
    /// Returns the number of references removed.
    pub fn purge(&mut self, id: InstanceId) -> usize {
        let mut removed = 0;

        if let Some(refs) = self.reverse.remove(&id) {
            for key in refs {
                if let Some(set) = self.forward.get_mut(&key) {
                    if set.remove(&id) {
                        removed += 1;
                    }
                    if set.is_empty() {
                        self.forward.remove(&key);
                    }
                }
            }
        }

        let owned: Vec<(InstanceId, String)> = self
            .forward
            .keys()
            .filter(|(owner, _)| *owner == id)
            .cloned()
            .collect();
        for (owner, link) in owned {
            removed += self.clear(owner, &link).len();
        }

        removed
    }
}
