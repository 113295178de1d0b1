//! Store operation implementations.
//!
//! Each operation validates against the schema first and touches a
//! partition only in its final step, which the store runs under that
//! partition's lock.

mod create;
mod link;
mod remove;
mod set;

pub use create::{commit_instance, prepare_instance};
pub use link::{apply_link, check_link, link_scope};
pub use remove::{purge_session, remove_instance};
pub use set::{check_setting, update_instance};

use strata_core::{InstanceId, ScopeKey, TypeId};
use strata_schema::{AttributeRegistry, TypeGraph};

/// Schema-side context shared by every operation.
#[derive(Clone, Copy)]
pub struct Schema<'a> {
    pub graph: &'a TypeGraph,
    pub attributes: &'a AttributeRegistry,
    pub root: InstanceId,
    pub root_type: TypeId,
    pub test_mode: bool,
}

/// Where an instance lives and what it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub scope: ScopeKey,
    pub type_id: TypeId,
}
