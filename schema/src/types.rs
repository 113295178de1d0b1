//! Schema definition types.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use strata_core::{ScalarType, TypeId, Value};

use crate::error::SchemaError;

/// Single or multi valued member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    #[default]
    Single,
    Multi,
}

/// Kind of constraint attached to a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    /// No two instances of the declaring type family may share a value.
    Exclusive,
}

/// Recognised annotation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeKey {
    /// Server-only member; settable only in test mode.
    Internal,
    /// Member that only exists at System scope.
    System,
}

impl AttributeKey {
    pub fn name(&self) -> &'static str {
        match self {
            AttributeKey::Internal => "internal",
            AttributeKey::System => "system",
        }
    }
}

impl FromStr for AttributeKey {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bare = s.strip_prefix("cfg::").unwrap_or(s);
        match bare {
            "internal" => Ok(AttributeKey::Internal),
            "system" => Ok(AttributeKey::System),
            _ => Err(SchemaError::unknown_attribute(s)),
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Annotations attached to a property or link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    values: BTreeMap<AttributeKey, bool>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: AttributeKey, value: bool) {
        self.values.insert(key, value);
    }

    pub fn get(&self, key: AttributeKey) -> Option<bool> {
        self.values.get(&key).copied()
    }

    /// True when the key is present and set to `true`.
    pub fn is_set(&self, key: AttributeKey) -> bool {
        self.get(key).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttributeKey, bool)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    /// Overlay `other` on top of `self`; keys in `other` win.
    pub fn merge(&mut self, other: &Annotations) {
        for (key, value) in other.iter() {
            self.values.insert(key, value);
        }
    }
}

/// Property definition within a type.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    /// Property name.
    pub name: String,
    /// Declared scalar type.
    pub value_type: ScalarType,
    /// Whether this property must be present on every instance.
    pub required: bool,
    /// Default value if not provided.
    pub default: Option<Value>,
    pub cardinality: Cardinality,
    pub annotations: Annotations,
    pub constraints: Vec<ConstraintKind>,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, value_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            value_type,
            required: false,
            default: None,
            cardinality: Cardinality::Single,
            annotations: Annotations::new(),
            constraints: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn multi(mut self) -> Self {
        self.cardinality = Cardinality::Multi;
        self
    }

    pub fn exclusive(mut self) -> Self {
        self.add_constraint(ConstraintKind::Exclusive);
        self
    }

    pub fn annotate(mut self, key: AttributeKey, value: bool) -> Self {
        self.annotations.set(key, value);
        self
    }

    pub fn internal(self) -> Self {
        self.annotate(AttributeKey::Internal, true)
    }

    pub fn system(self) -> Self {
        self.annotate(AttributeKey::System, true)
    }

    pub fn add_constraint(&mut self, kind: ConstraintKind) {
        if !self.constraints.contains(&kind) {
            self.constraints.push(kind);
        }
    }

    pub fn is_exclusive(&self) -> bool {
        self.constraints.contains(&ConstraintKind::Exclusive)
    }
}

/// Link definition within a type.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkDef {
    /// Link name.
    pub name: String,
    /// Qualified name of the target type.
    pub target: String,
    pub cardinality: Cardinality,
    pub annotations: Annotations,
}

impl LinkDef {
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            cardinality: Cardinality::Single,
            annotations: Annotations::new(),
        }
    }

    pub fn multi(mut self) -> Self {
        self.cardinality = Cardinality::Multi;
        self
    }

    pub fn annotate(mut self, key: AttributeKey, value: bool) -> Self {
        self.annotations.set(key, value);
        self
    }

    pub fn system(self) -> Self {
        self.annotate(AttributeKey::System, true)
    }

    pub fn internal(self) -> Self {
        self.annotate(AttributeKey::Internal, true)
    }

    pub fn is_multi(&self) -> bool {
        self.cardinality == Cardinality::Multi
    }
}

/// A property or link, as seen when resolving members by name.
#[derive(Debug, Clone, Copy)]
pub enum Member<'a> {
    Property(&'a PropertyDef),
    Link(&'a LinkDef),
}

impl<'a> Member<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Member::Property(p) => &p.name,
            Member::Link(l) => &l.name,
        }
    }

    pub fn annotations(&self) -> &'a Annotations {
        match self {
            Member::Property(p) => &p.annotations,
            Member::Link(l) => &l.annotations,
        }
    }
}

/// Object type definition, holding only its own declarations.
#[derive(Debug, Clone)]
pub struct ObjectType {
    /// Unique identifier.
    pub id: TypeId,
    /// Qualified type name.
    pub name: String,
    /// Parent type (single inheritance).
    pub parent: Option<TypeId>,
    /// Whether this type is abstract (cannot be instantiated directly).
    pub is_abstract: bool,
    /// Own property definitions, in declaration order.
    pub properties: Vec<PropertyDef>,
    /// Own link definitions, in declaration order.
    pub links: Vec<LinkDef>,
}

impl ObjectType {
    pub fn new(id: TypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent: None,
            is_abstract: false,
            properties: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Get an own property definition by name.
    pub fn own_property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Get an own link definition by name.
    pub fn own_link(&self, name: &str) -> Option<&LinkDef> {
        self.links.iter().find(|l| l.name == name)
    }

    /// Check if this type declares a member with the given name itself.
    pub fn declares(&self, name: &str) -> bool {
        self.own_property(name).is_some() || self.own_link(name).is_some()
    }
}

/// Flattened view of a type: own declarations merged with all ancestors'.
#[derive(Debug, Clone)]
pub struct ResolvedType {
    pub id: TypeId,
    pub name: String,
    pub is_abstract: bool,
    /// Ancestry from the root ancestor down to this type (inclusive).
    pub lineage: Vec<TypeId>,
    /// Properties, root ancestor's first.
    pub properties: Vec<PropertyDef>,
    /// Links, root ancestor's first.
    pub links: Vec<LinkDef>,
    /// Resolved link targets, by link name.
    pub link_targets: HashMap<String, TypeId>,
}

impl ResolvedType {
    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn link(&self, name: &str) -> Option<&LinkDef> {
        self.links.iter().find(|l| l.name == name)
    }

    pub fn member(&self, name: &str) -> Option<Member<'_>> {
        self.property(name)
            .map(Member::Property)
            .or_else(|| self.link(name).map(Member::Link))
    }

    pub fn link_target(&self, name: &str) -> Option<TypeId> {
        self.link_targets.get(name).copied()
    }

    /// All member names, properties first.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .map(|p| p.name.as_str())
            .chain(self.links.iter().map(|l| l.name.as_str()))
    }
}

/// Precomputed subtype relationships.
#[derive(Debug, Default)]
pub struct SubtypeIndex {
    /// For each type, the set of all its subtypes (transitive).
    subtypes: HashMap<TypeId, HashSet<TypeId>>,
    /// For each type, the set of all its supertypes (transitive).
    supertypes: HashMap<TypeId, HashSet<TypeId>>,
}

impl SubtypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the subtype index from type definitions.
    pub fn build(types: &HashMap<TypeId, ObjectType>) -> Self {
        let mut index = Self::new();

        for &type_id in types.keys() {
            index.subtypes.insert(type_id, HashSet::new());
            index.supertypes.insert(type_id, HashSet::new());
        }

        // Single inheritance: walking the parent chain visits every supertype.
        for (&type_id, object_type) in types {
            let mut current = object_type.parent;
            while let Some(parent_id) = current {
                if let Some(set) = index.supertypes.get_mut(&type_id) {
                    if !set.insert(parent_id) {
                        break;
                    }
                }
                if let Some(set) = index.subtypes.get_mut(&parent_id) {
                    set.insert(type_id);
                }
                current = types.get(&parent_id).and_then(|t| t.parent);
            }
        }

        index
    }

    /// Check if `sub` is a subtype of `super_type`.
    pub fn is_subtype(&self, sub: TypeId, super_type: TypeId) -> bool {
        if sub == super_type {
            return true;
        }
        self.supertypes
            .get(&sub)
            .map(|set| set.contains(&super_type))
            .unwrap_or(false)
    }

    /// Get all subtypes of a type (not including the type itself).
    pub fn get_subtypes(&self, type_id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        self.subtypes
            .get(&type_id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Get all supertypes of a type (not including the type itself).
    pub fn get_supertypes(&self, type_id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        self.supertypes
            .get(&type_id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }
}
