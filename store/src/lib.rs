//! Strata Store
//!
//! Partitioned storage of configuration objects and settings.
//!
//! Responsibilities:
//! - Validate writes against the type graph and its constraints
//! - Keep System state and per-session state in separate partitions
//! - Gate `internal` and `system` settings
//! - Tear down session state atomically
//!
//! # Module Structure
//!
//! - `store` - the ConfigStore and its locking
//! - `ops/` - individual operations (create, link, set, remove)
//! - `validation` - shared property validation helpers
//! - `partition` - per-scope instance table and settings
//! - `config` - StoreConfig and request origin

mod config;
mod error;
mod ops;
mod partition;
mod store;
mod validation;

pub use config::{Origin, StoreConfig, DEFAULT_ROOT_TYPE};
pub use error::{StoreError, StoreResult};
pub use store::ConfigStore;
pub use strata_table::Instance;
