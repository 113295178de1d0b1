//! Configuration API surface: `get`, `set` and `list`.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use strata_core::{Scope, SessionId, Value};
use strata_schema::TypeGraph;
use strata_store::{ConfigStore, Origin, StoreConfig};
use tracing::debug;

use crate::error::SessionResult;
use crate::resolver::ScopeResolver;
use crate::session::Session;

/// Client-facing configuration API over one store.
#[derive(Debug)]
pub struct ConfigApi {
    store: Arc<ConfigStore>,
    resolver: ScopeResolver,
    next_session: AtomicU64,
}

impl ConfigApi {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self {
            resolver: ScopeResolver::new(store.clone()),
            store,
            next_session: AtomicU64::new(1),
        }
    }

    /// Build a store over a frozen type graph and wrap it.
    pub fn bootstrap(graph: TypeGraph, config: StoreConfig) -> SessionResult<Self> {
        let store = ConfigStore::new(Arc::new(graph), config)?;
        Ok(Self::new(Arc::new(store)))
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    pub fn resolver(&self) -> &ScopeResolver {
        &self.resolver
    }

    /// Effective value of a setting for `session`.
    pub fn get(&self, property: &str, session: SessionId) -> SessionResult<Value> {
        self.resolver.effective_value(property, session)
    }

    /// Set a setting at `scope`; `None` resets it.
    pub fn set(
        &self,
        property: &str,
        value: Option<Value>,
        scope: Scope,
        session: SessionId,
    ) -> SessionResult<()> {
        self.store.set_scalar_property(
            self.store.root(),
            property,
            value,
            scope.key(session),
            Origin::Client,
        )?;
        Ok(())
    }

    /// Names of the root-config members a client may see at `scope`.
    ///
    /// `internal` members are hidden unless test mode is on; a Session
    /// listing also omits `system` members.
    pub fn list(&self, scope: Scope, session: SessionId) -> BTreeSet<String> {
        let root_type = self.store.root_type();
        let attributes = self.store.attributes();
        let test_mode = self.store.test_mode();

        let Some(view) = self.store.graph().resolve(root_type) else {
            return BTreeSet::new();
        };
        let names: BTreeSet<String> = view
            .member_names()
            .filter(|name| attributes.is_visible(root_type, name, test_mode))
            .filter(|name| scope == Scope::System || !attributes.is_system(root_type, name))
            .map(str::to_string)
            .collect();

        debug!(scope = %scope, session = %session, visible = names.len(), "listed config");
        names
    }

    /// Open a new session.
    pub fn open_session(&self) -> Session<'_> {
        let id = SessionId::new(self.next_session.fetch_add(1, Ordering::Relaxed));
        Session::new(id, self)
    }

    /// Drop all state of a session. Called when its connection closes.
    pub fn teardown_session(&self, session: SessionId) -> bool {
        self.store.teardown_session(session)
    }
}
