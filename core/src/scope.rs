//! Configuration scopes.
//!
//! A scope names a partition of configuration state. The `Session` partition
//! exists once per client connection, the `System` partition once per process.

use crate::{CoreError, SessionId};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Scope of a configuration value or object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Scope {
    /// Bound to a single client connection.
    Session,
    /// Process-wide, survives connections.
    System,
}

impl Scope {
    /// Address the partition of this scope as seen from `session`.
    pub fn key(self, session: SessionId) -> ScopeKey {
        match self {
            Scope::Session => ScopeKey::Session(session),
            Scope::System => ScopeKey::System,
        }
    }
}

impl FromStr for Scope {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "session" => Ok(Scope::Session),
            "system" | "instance" => Ok(Scope::System),
            _ => Err(CoreError::UnknownScope(s.to_string())),
        }
    }
}

impl TryFrom<String> for Scope {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Session => write!(f, "session"),
            Scope::System => write!(f, "system"),
        }
    }
}

/// Address of one concrete partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKey {
    System,
    Session(SessionId),
}

impl ScopeKey {
    /// The scope this partition belongs to.
    pub fn scope(&self) -> Scope {
        match self {
            ScopeKey::System => Scope::System,
            ScopeKey::Session(_) => Scope::Session,
        }
    }

    /// The owning session, if this is a session partition.
    pub fn session(&self) -> Option<SessionId> {
        match self {
            ScopeKey::System => None,
            ScopeKey::Session(id) => Some(*id),
        }
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKey::System => write!(f, "system"),
            ScopeKey::Session(id) => write!(f, "session {}", id),
        }
    }
}
