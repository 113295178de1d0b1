//! Strata Instance Table
//!
//! Storage for configuration object instances of one partition:
//! - Instance storage keyed by InstanceId
//! - Type index: find instances by exact type
//! - Value index: find instances by exact property value
//! - Link index: link sets by owner and the reverse references to each target

mod error;
mod index;
mod instance;
mod table;

pub use error::{TableError, TableResult};
pub use index::ValueKey;
pub use instance::Instance;
pub use table::InstanceTable;
