//! Strata integration test framework.
//!
//! Provides fixtures for building stores over the test-mode schema and a
//! small scenario runner: named steps run in order against one
//! [`ConfigApi`](strata_session::ConfigApi), each checked by an assertion.

mod error;
mod fixture;
mod scenario;

pub use assertion::Assertion;
pub use error::{ScenarioError, ScenarioResult};
pub use fixture::{error_kind, family_schema, init_tracing, test_api, FAMILY_SCHEMA};
pub use scenario::{Context, Scenario};

/// Everything a test file needs.
pub mod prelude {
    pub use crate::{
        error_kind, family_schema, init_tracing, test_api, Assertion, Context, Scenario,
        ScenarioError, FAMILY_SCHEMA,
    };
    pub use strata_core::{values, InstanceId, Scope, ScopeKey, SessionId, Value, Values};
    pub use strata_session::{ConfigApi, SessionError};
    pub use strata_store::{ConfigStore, Origin, StoreConfig, StoreError};
}
