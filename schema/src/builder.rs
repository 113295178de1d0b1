//! TypeGraphBuilder for constructing an immutable TypeGraph.

use std::collections::HashMap;

use strata_core::{ScalarType, TypeId, Value};
use tracing::{debug, info};

use crate::error::{SchemaError, SchemaResult};
use crate::names::{check_member_name, check_type_name};
use crate::{LinkDef, ObjectType, PropertyDef, ResolvedType, SubtypeIndex, TypeGraph};

/// Builder for constructing an immutable TypeGraph.
///
/// Used only during bootstrap; `build` freezes the declarations and performs
/// the one-time merge of inherited members.
#[derive(Debug, Default)]
pub struct TypeGraphBuilder {
    /// Next type ID to allocate.
    next_type_id: u32,
    /// Types being built.
    types: HashMap<TypeId, ObjectType>,
    /// Type name to ID mapping.
    type_names: HashMap<String, TypeId>,
}

impl TypeGraphBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a new object type. The parent, if any, must already be defined.
    pub fn define_type(
        &mut self,
        name: impl Into<String>,
        parent: Option<&str>,
        is_abstract: bool,
    ) -> SchemaResult<TypeId> {
        let name = name.into();
        check_type_name(&name)?;

        if self.type_names.contains_key(&name) {
            return Err(SchemaError::duplicate_type(name));
        }

        let parent_id = match parent {
            Some(parent_name) => Some(
                self.type_names
                    .get(parent_name)
                    .copied()
                    .ok_or_else(|| SchemaError::unknown_parent(&name, parent_name))?,
            ),
            None => None,
        };

        let id = TypeId::new(self.next_type_id);
        self.next_type_id += 1;

        let mut object_type = ObjectType::new(id, name.clone());
        object_type.parent = parent_id;
        object_type.is_abstract = is_abstract;

        self.type_names.insert(name, id);
        self.types.insert(id, object_type);

        Ok(id)
    }

    /// Get a type ID by name.
    pub fn type_id(&self, name: &str) -> Option<TypeId> {
        self.type_names.get(name).copied()
    }

    /// Re-parent an existing type. Fails if the new parent descends from it.
    pub fn rebase(&mut self, type_id: TypeId, parent: &str) -> SchemaResult<()> {
        let name = self.type_name(type_id)?.to_string();
        let parent_id = self
            .type_names
            .get(parent)
            .copied()
            .ok_or_else(|| SchemaError::unknown_parent(&name, parent))?;

        // Walk up from the new parent; meeting `type_id` means a cycle.
        let mut current = Some(parent_id);
        while let Some(id) = current {
            if id == type_id {
                return Err(SchemaError::cycle(name));
            }
            current = self.types.get(&id).and_then(|t| t.parent);
        }

        if let Some(object_type) = self.types.get_mut(&type_id) {
            object_type.parent = Some(parent_id);
        }
        Ok(())
    }

    /// Add a property to a type.
    pub fn add_property(&mut self, type_id: TypeId, property: PropertyDef) -> SchemaResult<()> {
        check_member_name(&property.name)?;
        let type_name = self.type_name(type_id)?.to_string();

        let mut property = property;
        if let Some(default) = property.default.take() {
            property.default =
                Some(check_default(&type_name, &property.name, property.value_type, default)?);
        }

        let object_type = self.type_mut(type_id)?;
        if object_type.declares(&property.name) {
            return Err(SchemaError::conflicting_redefinition(
                type_name,
                property.name,
                "declared twice on the same type",
            ));
        }
        object_type.properties.push(property);
        Ok(())
    }

    /// Add a link to a type. The target may be defined later.
    pub fn add_link(&mut self, type_id: TypeId, link: LinkDef) -> SchemaResult<()> {
        check_member_name(&link.name)?;
        check_type_name(&link.target)?;
        let type_name = self.type_name(type_id)?.to_string();

        let object_type = self.type_mut(type_id)?;
        if object_type.declares(&link.name) {
            return Err(SchemaError::conflicting_redefinition(
                type_name,
                link.name,
                "declared twice on the same type",
            ));
        }
        object_type.links.push(link);
        Ok(())
    }

    /// Build the immutable TypeGraph.
    pub fn build(self) -> SchemaResult<TypeGraph> {
        // Parents before children: order by depth in the inheritance chain.
        let mut order: Vec<(usize, TypeId)> = Vec::with_capacity(self.types.len());
        for (&id, object_type) in &self.types {
            let mut depth = 0;
            let mut current = object_type.parent;
            while let Some(parent_id) = current {
                depth += 1;
                if depth > self.types.len() {
                    return Err(SchemaError::cycle(&object_type.name));
                }
                current = self.types.get(&parent_id).and_then(|t| t.parent);
            }
            order.push((depth, id));
        }
        order.sort();

        let mut resolved: HashMap<TypeId, ResolvedType> = HashMap::new();
        for (_, id) in order {
            let object_type = &self.types[&id];
            let inherited = object_type.parent.and_then(|p| resolved.get(&p));
            let view = resolve_type(object_type, inherited, &self.type_names)?;
            debug!(
                type_name = %view.name,
                properties = view.properties.len(),
                links = view.links.len(),
                "resolved type"
            );
            resolved.insert(id, view);
        }

        let subtype_index = SubtypeIndex::build(&self.types);

        info!(types = self.types.len(), "type graph built");

        Ok(TypeGraph::new(
            self.types,
            self.type_names,
            resolved,
            subtype_index,
        ))
    }

    fn type_name(&self, type_id: TypeId) -> SchemaResult<&str> {
        self.types
            .get(&type_id)
            .map(|t| t.name.as_str())
            .ok_or_else(|| SchemaError::unknown_type(type_id.to_string()))
    }

    fn type_mut(&mut self, type_id: TypeId) -> SchemaResult<&mut ObjectType> {
        self.types
            .get_mut(&type_id)
            .ok_or_else(|| SchemaError::unknown_type(type_id.to_string()))
    }
}

/// Check that a default matches the declared type, widening int64 to float64.
fn check_default(
    type_name: &str,
    member: &str,
    expected: ScalarType,
    value: Value,
) -> SchemaResult<Value> {
    match (expected, value) {
        (ScalarType::Float64, Value::Int(i)) => {
            Value::exact_float(i).map(Value::Float).ok_or_else(|| {
                SchemaError::invalid_default(
                    type_name,
                    member,
                    ScalarType::Float64.name(),
                    ScalarType::Int64.name(),
                )
            })
        }
        (expected, value) if value.scalar_type() == Some(expected) => Ok(value),
        (expected, value) => Err(SchemaError::invalid_default(
            type_name,
            member,
            expected.name(),
            value.type_name(),
        )),
    }
}

/// Merge a type's own declarations onto its parent's resolved view.
fn resolve_type(
    object_type: &ObjectType,
    inherited: Option<&ResolvedType>,
    type_names: &HashMap<String, TypeId>,
) -> SchemaResult<ResolvedType> {
    let mut view = match inherited {
        Some(parent) => ResolvedType {
            id: object_type.id,
            name: object_type.name.clone(),
            is_abstract: object_type.is_abstract,
            lineage: parent.lineage.clone(),
            properties: parent.properties.clone(),
            links: parent.links.clone(),
            link_targets: parent.link_targets.clone(),
        },
        None => ResolvedType {
            id: object_type.id,
            name: object_type.name.clone(),
            is_abstract: object_type.is_abstract,
            lineage: Vec::new(),
            properties: Vec::new(),
            links: Vec::new(),
            link_targets: HashMap::new(),
        },
    };
    view.lineage.push(object_type.id);

    for own in &object_type.properties {
        if view.link(&own.name).is_some() {
            return Err(SchemaError::conflicting_redefinition(
                &object_type.name,
                &own.name,
                "property redefines an inherited link",
            ));
        }
        match view.properties.iter_mut().find(|p| p.name == own.name) {
            Some(slot) => *slot = merge_property(&object_type.name, slot, own)?,
            None => view.properties.push(own.clone()),
        }
    }

    for own in &object_type.links {
        if view.property(&own.name).is_some() {
            return Err(SchemaError::conflicting_redefinition(
                &object_type.name,
                &own.name,
                "link redefines an inherited property",
            ));
        }
        let target = type_names
            .get(&own.target)
            .copied()
            .ok_or_else(|| SchemaError::unknown_type(&own.target))?;
        match view.links.iter_mut().find(|l| l.name == own.name) {
            Some(slot) => *slot = merge_link(&object_type.name, slot, own)?,
            None => view.links.push(own.clone()),
        }
        view.link_targets.insert(own.name.clone(), target);
    }

    Ok(view)
}

fn merge_property(
    type_name: &str,
    inherited: &PropertyDef,
    own: &PropertyDef,
) -> SchemaResult<PropertyDef> {
    if inherited.value_type != own.value_type {
        return Err(SchemaError::conflicting_redefinition(
            type_name,
            &own.name,
            format!(
                "type {} redefined as {}",
                inherited.value_type, own.value_type
            ),
        ));
    }
    if inherited.cardinality != own.cardinality {
        return Err(SchemaError::conflicting_redefinition(
            type_name,
            &own.name,
            "cardinality changed",
        ));
    }

    let mut merged = inherited.clone();
    merged.required |= own.required;
    if own.default.is_some() {
        merged.default = own.default.clone();
    }
    merged.annotations.merge(&own.annotations);
    for &kind in &own.constraints {
        merged.add_constraint(kind);
    }
    Ok(merged)
}

fn merge_link(type_name: &str, inherited: &LinkDef, own: &LinkDef) -> SchemaResult<LinkDef> {
    if inherited.target != own.target {
        return Err(SchemaError::conflicting_redefinition(
            type_name,
            &own.name,
            format!("target {} redefined as {}", inherited.target, own.target),
        ));
    }
    if inherited.cardinality != own.cardinality {
        return Err(SchemaError::conflicting_redefinition(
            type_name,
            &own.name,
            "cardinality changed",
        ));
    }

    let mut merged = inherited.clone();
    merged.annotations.merge(&own.annotations);
    Ok(merged)
}
