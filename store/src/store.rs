//! The ConfigStore - partitioned, concurrently mutated config state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use strata_core::{InstanceId, ScopeKey, SessionId, TypeId, Value, Values};
use strata_schema::{AttributeRegistry, TypeGraph};
use strata_table::Instance;
use tracing::{debug, info};

use crate::config::{Origin, StoreConfig};
use crate::error::{StoreError, StoreResult};
use crate::ops::{self, Placement, Schema};
use crate::partition::{Partition, SessionState};

type SessionCell = Arc<RwLock<SessionState>>;

/// Typed configuration store with one System partition and one partition
/// per live session.
///
/// System-scope mutations hold the System write lock across validation, the
/// exclusivity scan and the commit. Session-scope mutations serialize on the
/// session's write lock and never touch the System partition. Reads take
/// read locks only.
pub struct ConfigStore {
    graph: Arc<TypeGraph>,
    attributes: Arc<AttributeRegistry>,
    config: StoreConfig,
    root: InstanceId,
    root_type: TypeId,
    next_id: AtomicU64,
    system: RwLock<Partition>,
    sessions: DashMap<SessionId, SessionCell>,
    /// Partition and type of every live instance.
    owners: DashMap<InstanceId, Placement>,
}

impl ConfigStore {
    /// Create a store and its root configuration object.
    pub fn new(graph: Arc<TypeGraph>, config: StoreConfig) -> StoreResult<Self> {
        let root_type = graph
            .type_id(&config.root_type)
            .ok_or_else(|| StoreError::unknown_type(&config.root_type))?;
        if graph.get_type(root_type).map(|t| t.is_abstract).unwrap_or(true) {
            return Err(StoreError::abstract_type(&config.root_type));
        }

        let attributes = Arc::new(AttributeRegistry::build(&graph));
        let root = InstanceId::new(1);

        let mut system = Partition::new();
        system.table.insert(Instance::new(
            root,
            root_type,
            ScopeKey::System,
            Values::new(),
        ))?;

        let owners = DashMap::new();
        owners.insert(
            root,
            Placement {
                scope: ScopeKey::System,
                type_id: root_type,
            },
        );

        info!(
            root_type = %config.root_type,
            test_mode = config.test_mode,
            types = graph.type_count(),
            "config store ready"
        );

        Ok(Self {
            graph,
            attributes,
            config,
            root,
            root_type,
            next_id: AtomicU64::new(root.raw() + 1),
            system: RwLock::new(system),
            sessions: DashMap::new(),
            owners,
        })
    }

    // ==================== Accessors ====================

    pub fn graph(&self) -> &Arc<TypeGraph> {
        &self.graph
    }

    pub fn attributes(&self) -> &Arc<AttributeRegistry> {
        &self.attributes
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn test_mode(&self) -> bool {
        self.config.test_mode
    }

    /// The root configuration object.
    pub fn root(&self) -> InstanceId {
        self.root
    }

    pub fn root_type(&self) -> TypeId {
        self.root_type
    }

    // ==================== Mutations ====================

    /// Create an instance of a concrete type in the given partition.
    pub fn create_instance(
        &self,
        type_id: TypeId,
        scope: ScopeKey,
        values: Values,
    ) -> StoreResult<InstanceId> {
        let values = ops::prepare_instance(self.schema(), type_id, values)?;

        self.with_partition_mut(scope, |partition| {
            let id = InstanceId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
            ops::commit_instance(self.schema(), partition, id, type_id, scope, values)?;
            self.owners.insert(id, Placement { scope, type_id });
            Ok(id)
        })
    }

    /// Link `target` into `owner`'s link set, stored in partition `scope`.
    ///
    /// Multi links add and reject duplicates; single links replace.
    pub fn link_instances(
        &self,
        owner: InstanceId,
        scope: ScopeKey,
        link: &str,
        target: InstanceId,
    ) -> StoreResult<()> {
        let owner_at = self.placement(owner)?;
        let target_at = self.placement(target)?;
        let schema = self.schema();
        let link_def = ops::check_link(schema, owner, owner_at, link, scope, target_at)?;

        self.with_existing_partition_mut(scope, |partition| {
            ops::apply_link(schema, partition, owner, owner_at.type_id, link_def, target)
        })
        .unwrap_or_else(|| Err(StoreError::unknown_instance(target)))
    }

    /// Set or reset a scalar setting of the root configuration object.
    ///
    /// `None` removes the value stored at `scope`, so the next scope down
    /// (or the declared default) applies again.
    pub fn set_scalar_property(
        &self,
        config: InstanceId,
        property: &str,
        value: Option<Value>,
        scope: ScopeKey,
        origin: Origin,
    ) -> StoreResult<()> {
        if config != self.root {
            return Err(StoreError::unknown_instance(config));
        }
        let value = ops::check_setting(self.schema(), property, value, scope, origin)?;

        let reset = value.is_none();
        let apply = |partition: &mut Partition| -> StoreResult<()> {
            partition.put_setting(property, value);
            debug!(property, scope = %scope, reset, "set config value");
            Ok(())
        };

        if reset && scope != ScopeKey::System {
            // Resetting in a session without state changes nothing
            return self
                .with_existing_partition_mut(scope, apply)
                .unwrap_or(Ok(()));
        }
        self.with_partition_mut(scope, apply)
    }

    /// Update one property of an existing instance.
    ///
    /// Root-config properties go through [`ConfigStore::set_scalar_property`]
    /// at System scope with a client origin.
    pub fn set_instance_property(
        &self,
        id: InstanceId,
        property: &str,
        value: Value,
    ) -> StoreResult<()> {
        if id == self.root {
            return self.set_scalar_property(
                id,
                property,
                Some(value),
                ScopeKey::System,
                Origin::Client,
            );
        }
        let at = self.placement(id)?;
        let schema = self.schema();

        self.with_existing_partition_mut(at.scope, |partition| {
            ops::update_instance(schema, partition, id, property, value)
        })
        .unwrap_or_else(|| Err(StoreError::unknown_instance(id)))
    }

    /// Remove an instance and every link reference to it.
    ///
    /// Returns false when there was nothing to remove.
    pub fn remove_instance(&self, id: InstanceId) -> StoreResult<bool> {
        if id == self.root {
            return Err(StoreError::root_config("remove"));
        }
        let Some(at) = self.owners.get(&id).map(|entry| *entry) else {
            return Ok(false);
        };

        self.with_existing_partition_mut(at.scope, |partition| {
            let removed = ops::remove_instance(partition, id);
            if removed {
                self.owners.remove(&id);
            }
            Ok(removed)
        })
        .unwrap_or(Ok(false))
    }

    /// Drop a session partition: its instances, link sets and overrides.
    ///
    /// Returns false if the session held no state.
    pub fn teardown_session(&self, session: SessionId) -> bool {
        let Some(cell) = self.sessions.get(&session).map(|entry| entry.clone()) else {
            return false;
        };

        let mut state = cell.write();
        state.closed = true;
        self.sessions
            .remove_if(&session, |_, current| Arc::ptr_eq(current, &cell));

        let ids = ops::purge_session(&mut state.partition);
        for id in &ids {
            self.owners.remove(id);
        }
        debug!(session = %session, instances = ids.len(), "tore down session");
        true
    }

    // ==================== Reads ====================

    /// The setting stored at exactly this scope, if any.
    pub fn setting(&self, scope: ScopeKey, property: &str) -> Option<Value> {
        self.with_partition(scope, |partition| partition.setting(property).cloned())
            .flatten()
    }

    /// All settings stored at exactly this scope.
    pub fn settings(&self, scope: ScopeKey) -> Values {
        self.with_partition(scope, |partition| partition.settings.clone())
            .unwrap_or_default()
    }

    /// Snapshot of an instance. The root config carries its System settings.
    pub fn instance(&self, id: InstanceId) -> Option<Instance> {
        let at = self.owners.get(&id).map(|entry| *entry)?;
        self.with_partition(at.scope, |partition| {
            partition.table.get(id).cloned().map(|mut instance| {
                if id == self.root {
                    instance.values = partition.settings.clone();
                }
                instance
            })
        })
        .flatten()
    }

    /// Targets of `owner`'s link set as seen from `session`.
    pub fn linked(&self, owner: InstanceId, link: &str, session: SessionId) -> Vec<InstanceId> {
        let Ok(owner_at) = self.placement(owner) else {
            return Vec::new();
        };
        let Some(link_def) = self.graph.link(owner_at.type_id, link) else {
            return Vec::new();
        };
        let Some(scope) = ops::link_scope(self.schema(), owner, owner_at, link_def, Some(session))
        else {
            return Vec::new();
        };
        self.with_partition(scope, |partition| partition.table.linked(owner, link))
            .unwrap_or_default()
    }

    /// Instances of a type and all its subtypes in one partition, by id.
    pub fn instances_of(&self, type_id: TypeId, scope: ScopeKey) -> Vec<InstanceId> {
        let mut ids = self
            .with_partition(scope, |partition| {
                self.graph
                    .family(type_id)
                    .flat_map(|t| partition.table.by_type(t).collect::<Vec<_>>())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        ids.sort();
        ids
    }

    /// Number of sessions holding state.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    // ========== Internal helpers ==========

    fn schema(&self) -> Schema<'_> {
        Schema {
            graph: &self.graph,
            attributes: &self.attributes,
            root: self.root,
            root_type: self.root_type,
            test_mode: self.config.test_mode,
        }
    }

    fn placement(&self, id: InstanceId) -> StoreResult<Placement> {
        self.owners
            .get(&id)
            .map(|entry| *entry)
            .ok_or_else(|| StoreError::unknown_instance(id))
    }

    /// Run `f` against a partition, creating the session partition if needed.
    fn with_partition_mut<T>(
        &self,
        scope: ScopeKey,
        f: impl FnOnce(&mut Partition) -> StoreResult<T>,
    ) -> StoreResult<T> {
        match scope {
            ScopeKey::System => f(&mut self.system.write()),
            ScopeKey::Session(session) => loop {
                let cell = self
                    .sessions
                    .entry(session)
                    .or_insert_with(SessionCell::default)
                    .clone();
                let mut state = cell.write();
                if state.closed {
                    // Torn down after lookup; retry against a fresh partition
                    continue;
                }
                return f(&mut state.partition);
            },
        }
    }

    /// Run `f` against a partition that already exists; `None` otherwise.
    fn with_existing_partition_mut<T>(
        &self,
        scope: ScopeKey,
        f: impl FnOnce(&mut Partition) -> StoreResult<T>,
    ) -> Option<StoreResult<T>> {
        match scope {
            ScopeKey::System => Some(f(&mut self.system.write())),
            ScopeKey::Session(session) => {
                let cell = self.sessions.get(&session).map(|entry| entry.clone())?;
                let mut state = cell.write();
                if state.closed {
                    return None;
                }
                Some(f(&mut state.partition))
            }
        }
    }

    /// Run `f` against a partition for reading; `None` if the session has no state.
    fn with_partition<T>(&self, scope: ScopeKey, f: impl FnOnce(&Partition) -> T) -> Option<T> {
        match scope {
            ScopeKey::System => Some(f(&self.system.read())),
            ScopeKey::Session(session) => {
                let cell = self.sessions.get(&session).map(|entry| entry.clone())?;
                let state = cell.read();
                if state.closed {
                    return None;
                }
                Some(f(&state.partition))
            }
        }
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("root", &self.root)
            .field("test_mode", &self.config.test_mode)
            .field("sessions", &self.sessions.len())
            .field("instances", &self.owners.len())
            .finish()
    }
}
