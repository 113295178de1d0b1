//! The TypeGraph - immutable schema lookup.

use std::collections::HashMap;

use strata_core::TypeId;

use crate::{LinkDef, ObjectType, PropertyDef, ResolvedType, SubtypeIndex};

/// The TypeGraph provides runtime lookup of object types.
/// It is immutable after construction via TypeGraphBuilder.
#[derive(Debug)]
pub struct TypeGraph {
    /// Type definitions by ID (own declarations only).
    types: HashMap<TypeId, ObjectType>,
    /// Type ID lookup by name.
    type_names: HashMap<String, TypeId>,
    /// Flattened views, computed once at build.
    resolved: HashMap<TypeId, ResolvedType>,
    /// Precomputed subtype relationships.
    subtype_index: SubtypeIndex,
}

impl TypeGraph {
    pub(crate) fn new(
        types: HashMap<TypeId, ObjectType>,
        type_names: HashMap<String, TypeId>,
        resolved: HashMap<TypeId, ResolvedType>,
        subtype_index: SubtypeIndex,
    ) -> Self {
        Self {
            types,
            type_names,
            resolved,
            subtype_index,
        }
    }

    // ==================== Type Lookups ====================

    /// Get a type definition by name.
    pub fn get_type_by_name(&self, name: &str) -> Option<&ObjectType> {
        self.type_names.get(name).and_then(|id| self.types.get(id))
    }

    /// Get a type definition by ID.
    pub fn get_type(&self, id: TypeId) -> Option<&ObjectType> {
        self.types.get(&id)
    }

    /// Get a type ID by name.
    pub fn type_id(&self, name: &str) -> Option<TypeId> {
        self.type_names.get(name).copied()
    }

    /// Get the name of a type, or a placeholder for unknown IDs.
    pub fn type_name(&self, id: TypeId) -> String {
        self.types
            .get(&id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Get all type definitions.
    pub fn all_types(&self) -> impl Iterator<Item = &ObjectType> {
        self.types.values()
    }

    /// Get the number of types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    // ==================== Resolved Members ====================

    /// Effective member set of a type, merged from the root ancestor down.
    pub fn resolve(&self, id: TypeId) -> Option<&ResolvedType> {
        self.resolved.get(&id)
    }

    /// Get a property definition, including inherited ones.
    pub fn property(&self, id: TypeId, name: &str) -> Option<&PropertyDef> {
        self.resolve(id).and_then(|r| r.property(name))
    }

    /// First declaration of a property with this name on any type, in
    /// type-id order (parents are defined before their children).
    pub fn find_property(&self, name: &str) -> Option<&PropertyDef> {
        self.types
            .values()
            .filter_map(|t| {
                t.properties
                    .iter()
                    .find(|p| p.name == name)
                    .map(|p| (t.id, p))
            })
            .min_by_key(|(id, _)| *id)
            .map(|(_, p)| p)
    }

    /// Get a link definition, including inherited ones.
    pub fn link(&self, id: TypeId, name: &str) -> Option<&LinkDef> {
        self.resolve(id).and_then(|r| r.link(name))
    }

    // ==================== Subtype Queries ====================

    /// Check if `sub` is a subtype of `super_type`.
    pub fn is_subtype(&self, sub: TypeId, super_type: TypeId) -> bool {
        self.subtype_index.is_subtype(sub, super_type)
    }

    /// Get all subtypes of a type (not including the type itself).
    pub fn get_subtypes(&self, type_id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        self.subtype_index.get_subtypes(type_id)
    }

    /// Get all supertypes of a type (not including the type itself).
    pub fn get_supertypes(&self, type_id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        self.subtype_index.get_supertypes(type_id)
    }

    /// The type itself followed by all of its subtypes.
    pub fn family(&self, type_id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        std::iter::once(type_id).chain(self.get_subtypes(type_id))
    }

    /// Ancestry from the root ancestor down to the type (inclusive).
    pub fn lineage(&self, type_id: TypeId) -> &[TypeId] {
        self.resolve(type_id)
            .map(|r| r.lineage.as_slice())
            .unwrap_or(&[])
    }
}
