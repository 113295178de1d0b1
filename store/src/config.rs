//! Store configuration.

use serde::Deserialize;

use crate::error::StoreResult;

/// Default root configuration type.
pub const DEFAULT_ROOT_TYPE: &str = "cfg::Config";

/// Settings fixed when a store is constructed.
///
/// ```toml
/// test_mode = true
/// root_type = "cfg::Config"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Allow clients to mutate `internal` properties.
    pub test_mode: bool,
    /// Type of the root configuration object.
    pub root_type: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            test_mode: false,
            root_type: DEFAULT_ROOT_TYPE.to_string(),
        }
    }
}

impl StoreConfig {
    /// Decode a configuration from TOML.
    pub fn from_toml(source: &str) -> StoreResult<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    pub fn with_root_type(mut self, root_type: impl Into<String>) -> Self {
        self.root_type = root_type.into();
        self
    }
}

/// Where a mutation request comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    /// A client request through the configuration API.
    #[default]
    Client,
    /// The server itself; may set `internal` properties outside test mode.
    Server,
}
