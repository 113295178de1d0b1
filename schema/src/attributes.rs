//! AttributeRegistry - visibility and scope flags per member.
//!
//! Built once from a frozen TypeGraph. Lookups go through the resolved view,
//! so a flag declared on a base type is visible on every subtype.

use std::collections::HashMap;

use strata_core::TypeId;

use crate::{Annotations, AttributeKey, TypeGraph};

/// Read-only lookup of member annotations.
#[derive(Debug, Default)]
pub struct AttributeRegistry {
    entries: HashMap<(TypeId, String), Annotations>,
}

impl AttributeRegistry {
    /// Index every member of every type in the graph.
    pub fn build(graph: &TypeGraph) -> Self {
        let mut entries = HashMap::new();
        for object_type in graph.all_types() {
            let Some(view) = graph.resolve(object_type.id) else {
                continue;
            };
            for property in &view.properties {
                entries.insert(
                    (view.id, property.name.clone()),
                    property.annotations.clone(),
                );
            }
            for link in &view.links {
                entries.insert((view.id, link.name.clone()), link.annotations.clone());
            }
        }
        Self { entries }
    }

    /// Look up one attribute of a member; `None` if the member or key is absent.
    pub fn get_attribute(&self, type_id: TypeId, member: &str, key: AttributeKey) -> Option<bool> {
        self.entries
            .get(&(type_id, member.to_string()))
            .and_then(|a| a.get(key))
    }

    /// Member is server-internal (settable only in test mode).
    pub fn is_internal(&self, type_id: TypeId, member: &str) -> bool {
        self.get_attribute(type_id, member, AttributeKey::Internal)
            .unwrap_or(false)
    }

    /// Member exists only at System scope.
    pub fn is_system(&self, type_id: TypeId, member: &str) -> bool {
        self.get_attribute(type_id, member, AttributeKey::System)
            .unwrap_or(false)
    }

    /// Member is listed to clients given the test-mode flag.
    pub fn is_visible(&self, type_id: TypeId, member: &str, test_mode: bool) -> bool {
        test_mode || !self.is_internal(type_id, member)
    }
}
