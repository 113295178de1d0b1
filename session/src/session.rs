//! Session handle.

use std::collections::BTreeSet;

use strata_core::{InstanceId, Scope, SessionId, TypeId, Value, Values};
use strata_store::StoreError;

use crate::api::ConfigApi;
use crate::error::SessionResult;

/// One client connection's view of the configuration.
///
/// Session-scoped objects and overrides live until [`Session::close`].
pub struct Session<'a> {
    /// Unique session ID.
    id: SessionId,
    /// The API (shared).
    api: &'a ConfigApi,
}

impl<'a> Session<'a> {
    /// Wrap an existing session id.
    pub fn new(id: SessionId, api: &'a ConfigApi) -> Self {
        Self { id, api }
    }

    /// Get the session ID.
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn get(&self, property: &str) -> SessionResult<Value> {
        self.api.get(property, self.id)
    }

    pub fn set(&self, property: &str, value: Option<Value>, scope: Scope) -> SessionResult<()> {
        self.api.set(property, value, scope, self.id)
    }

    pub fn list(&self, scope: Scope) -> BTreeSet<String> {
        self.api.list(scope, self.id)
    }

    /// Create a config object at `scope`, addressed from this session.
    pub fn create(&self, type_name: &str, scope: Scope, values: Values) -> SessionResult<InstanceId> {
        let store = self.api.store();
        let type_id = self.type_id(type_name)?;
        Ok(store.create_instance(type_id, scope.key(self.id), values)?)
    }

    /// Link an object into a multi link of the root config.
    pub fn link_root(&self, link: &str, scope: Scope, target: InstanceId) -> SessionResult<()> {
        let store = self.api.store();
        store.link_instances(store.root(), scope.key(self.id), link, target)?;
        Ok(())
    }

    /// Targets of a root-config link as seen from this session.
    pub fn root_links(&self, link: &str) -> Vec<InstanceId> {
        let store = self.api.store();
        store.linked(store.root(), link, self.id)
    }

    /// End the session, dropping all of its state.
    pub fn close(self) -> bool {
        self.api.teardown_session(self.id)
    }

    fn type_id(&self, type_name: &str) -> SessionResult<TypeId> {
        self.api
            .store()
            .graph()
            .type_id(type_name)
            .ok_or_else(|| StoreError::unknown_type(type_name).into())
    }
}
