//! ScopeResolver - merges session and system state on read.

use std::collections::BTreeMap;
use std::sync::Arc;

use strata_core::{ScopeKey, SessionId, Value};
use strata_schema::PropertyDef;
use strata_store::{ConfigStore, StoreError};

use crate::error::SessionResult;

/// Where an effective value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// Override set in the caller's session.
    Session,
    /// Value set at System scope.
    System,
    /// Declared default of the property.
    Default,
    /// Nothing set and no default declared.
    Unset,
}

/// Resolves root-config settings for a session.
#[derive(Debug, Clone)]
pub struct ScopeResolver {
    store: Arc<ConfigStore>,
}

impl ScopeResolver {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }

    /// Effective value of a setting as seen from `session`.
    ///
    /// Session override, else System value, else default, else Null. A
    /// property declared only on other types resolves to its declared
    /// default. Fails only for names no type declares as a property.
    pub fn effective_value(&self, property: &str, session: SessionId) -> SessionResult<Value> {
        self.resolve(property, session).map(|(value, _)| value)
    }

    /// Effective value together with the scope that supplied it.
    pub fn resolve(&self, property: &str, session: SessionId) -> SessionResult<(Value, ValueSource)> {
        let root_type = self.store.root_type();
        let Some(def) = self.store.graph().property(root_type, property) else {
            return self.declared_default(property);
        };

        if let Some(value) = self.store.setting(ScopeKey::Session(session), property) {
            return Ok((value, ValueSource::Session));
        }
        if let Some(value) = self.store.setting(ScopeKey::System, property) {
            return Ok((value, ValueSource::System));
        }
        Ok(default_of(def))
    }

    /// Effective values of every root-config property.
    pub fn effective_values(&self, session: SessionId) -> BTreeMap<String, Value> {
        let system = self.store.settings(ScopeKey::System);
        let overrides = self.store.settings(ScopeKey::Session(session));

        self.store
            .graph()
            .resolve(self.store.root_type())
            .map(|view| {
                view.properties
                    .iter()
                    .map(|p| {
                        let value = overrides
                            .get(&p.name)
                            .or_else(|| system.get(&p.name))
                            .or(p.default.as_ref())
                            .cloned()
                            .unwrap_or(Value::Null);
                        (p.name.clone(), value)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Properties outside the root config hold no settings.
    fn declared_default(&self, property: &str) -> SessionResult<(Value, ValueSource)> {
        let graph = self.store.graph();
        graph.find_property(property).map(default_of).ok_or_else(|| {
            StoreError::unknown_property(graph.type_name(self.store.root_type()), property).into()
        })
    }
}

fn default_of(def: &PropertyDef) -> (Value, ValueSource) {
    match &def.default {
        Some(value) => (value.clone(), ValueSource::Default),
        None => (Value::Null, ValueSource::Unset),
    }
}
