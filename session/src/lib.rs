//! Strata Session
//!
//! The client-facing configuration API.
//!
//! Responsibilities:
//! - Resolve effective values: session override, system value, default
//! - Expose `get`, `set` and `list` over the root configuration object
//! - Open sessions and tear them down when they close

mod api;
mod error;
mod resolver;
mod session;

pub use api::ConfigApi;
pub use error::{SessionError, SessionResult};
pub use resolver::{ScopeResolver, ValueSource};
pub use session::Session;
