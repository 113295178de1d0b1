//! Declarative schema loading.
//!
//! Declarations arrive from the schema loader in any order. Types are
//! reordered so parents are defined before children; `alter` blocks are
//! applied once every type exists.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Deserialize;
use strata_core::{ScalarType, Value};

use crate::error::{SchemaError, SchemaResult};
use crate::{
    Annotations, AttributeKey, Cardinality, ConstraintKind, LinkDef, PropertyDef, TypeGraph,
    TypeGraphBuilder,
};

/// A complete schema document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDecl {
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    #[serde(default)]
    pub alter: Vec<AlterDecl>,
}

/// `CREATE [ABSTRACT] TYPE name [EXTENDING parent] { ... }`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDecl {
    pub name: String,
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub properties: Vec<PropertyDecl>,
    #[serde(default)]
    pub links: Vec<LinkDecl>,
}

/// `ALTER TYPE name { ... }`: members added to an existing type.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlterDecl {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub properties: Vec<PropertyDecl>,
    #[serde(default)]
    pub links: Vec<LinkDecl>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ScalarType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub multi: bool,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub constraints: Vec<ConstraintKind>,
    #[serde(default)]
    pub attributes: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkDecl {
    pub name: String,
    pub target: String,
    #[serde(default)]
    pub multi: bool,
    #[serde(default)]
    pub attributes: BTreeMap<String, bool>,
}

impl SchemaDecl {
    /// Decode a TOML schema document.
    pub fn from_toml(source: &str) -> SchemaResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Apply all declarations to a builder.
    pub fn apply(&self, builder: &mut TypeGraphBuilder) -> SchemaResult<()> {
        for decl in self.ordered_types(builder)? {
            let type_id =
                builder.define_type(&decl.name, decl.extends.as_deref(), decl.is_abstract)?;
            add_members(builder, type_id, &decl.properties, &decl.links)?;
        }

        for alter in &self.alter {
            let type_id = builder
                .type_id(&alter.type_name)
                .ok_or_else(|| SchemaError::unknown_type(&alter.type_name))?;
            add_members(builder, type_id, &alter.properties, &alter.links)?;
        }

        Ok(())
    }

    /// Build a frozen TypeGraph from this document alone.
    pub fn build(&self) -> SchemaResult<TypeGraph> {
        let mut builder = TypeGraphBuilder::new();
        self.apply(&mut builder)?;
        builder.build()
    }

    /// Type declarations with every parent ahead of its children.
    fn ordered_types(&self, builder: &TypeGraphBuilder) -> SchemaResult<Vec<&TypeDecl>> {
        let mut by_name: HashMap<&str, &TypeDecl> = HashMap::new();
        for decl in &self.types {
            if by_name.insert(decl.name.as_str(), decl).is_some() {
                return Err(SchemaError::duplicate_type(&decl.name));
            }
        }

        let mut ordered = Vec::with_capacity(self.types.len());
        let mut done: HashSet<&str> = HashSet::new();
        let mut visiting: HashSet<&str> = HashSet::new();

        for decl in &self.types {
            visit(decl, &by_name, builder, &mut done, &mut visiting, &mut ordered)?;
        }
        Ok(ordered)
    }
}

fn visit<'a>(
    decl: &'a TypeDecl,
    by_name: &HashMap<&str, &'a TypeDecl>,
    builder: &TypeGraphBuilder,
    done: &mut HashSet<&'a str>,
    visiting: &mut HashSet<&'a str>,
    ordered: &mut Vec<&'a TypeDecl>,
) -> SchemaResult<()> {
    let name = decl.name.as_str();
    if done.contains(name) {
        return Ok(());
    }
    if !visiting.insert(name) {
        return Err(SchemaError::cycle(name));
    }

    if let Some(parent) = decl.extends.as_deref() {
        match by_name.get(parent) {
            Some(parent_decl) => visit(*parent_decl, by_name, builder, done, visiting, ordered)?,
            None if builder.type_id(parent).is_some() => {}
            None => return Err(SchemaError::unknown_parent(name, parent)),
        }
    }

    visiting.remove(name);
    done.insert(name);
    ordered.push(decl);
    Ok(())
}

fn add_members(
    builder: &mut TypeGraphBuilder,
    type_id: strata_core::TypeId,
    properties: &[PropertyDecl],
    links: &[LinkDecl],
) -> SchemaResult<()> {
    for decl in properties {
        builder.add_property(type_id, decl.to_def()?)?;
    }
    for decl in links {
        builder.add_link(type_id, decl.to_def()?)?;
    }
    Ok(())
}

fn annotations(attributes: &BTreeMap<String, bool>) -> SchemaResult<Annotations> {
    let mut result = Annotations::new();
    for (key, &value) in attributes {
        result.set(key.parse::<AttributeKey>()?, value);
    }
    Ok(result)
}

impl PropertyDecl {
    fn to_def(&self) -> SchemaResult<PropertyDef> {
        Ok(PropertyDef {
            name: self.name.clone(),
            value_type: self.value_type,
            required: self.required,
            default: self.default.clone(),
            cardinality: if self.multi {
                Cardinality::Multi
            } else {
                Cardinality::Single
            },
            annotations: annotations(&self.attributes)?,
            constraints: self.constraints.clone(),
        })
    }
}

impl LinkDecl {
    fn to_def(&self) -> SchemaResult<LinkDef> {
        Ok(LinkDef {
            name: self.name.clone(),
            target: self.target.clone(),
            cardinality: if self.multi {
                Cardinality::Multi
            } else {
                Cardinality::Single
            },
            annotations: annotations(&self.attributes)?,
        })
    }
}

/// Decode and build a TypeGraph from a TOML document.
pub fn load_str(source: &str) -> SchemaResult<TypeGraph> {
    SchemaDecl::from_toml(source)?.build()
}
