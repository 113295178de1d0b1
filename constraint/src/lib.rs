//! Strata Constraint
//!
//! Validate prospective writes against declared constraints.
//!
//! Responsibilities:
//! - Scan the inheritance-inclusive population for exclusive values
//! - Collect every violated constraint of a prospective instance at once
//! - Produce meaningful violation messages

mod engine;
mod error;
mod violation;

pub use engine::ConstraintEngine;
pub use error::{ConstraintError, ConstraintResult};
pub use violation::{Violation, Violations};
