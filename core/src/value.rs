//! Value types for Strata properties.
//!
//! Values are the atomic data stored in configuration object properties.
//! Every property declares a [`ScalarType`]; values are checked against it
//! before they are stored.

use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A value that can be stored in a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Empty value (property has neither a stored value nor a default).
    #[serde(skip_deserializing)]
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 string.
    String(String),
}

impl Value {
    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as boolean if this is a Bool value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as integer if this is an Int value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as float if this is a Float value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as string reference if this is a String value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The scalar type this value carries, `None` for Null.
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(ScalarType::Bool),
            Value::Int(_) => Some(ScalarType::Int64),
            Value::Float(_) => Some(ScalarType::Float64),
            Value::String(_) => Some(ScalarType::Str),
        }
    }

    /// Widen an integer to a float. `None` when the float cannot hold it
    /// exactly (magnitudes above 2^53 that are not representable).
    pub fn exact_float(i: i64) -> Option<f64> {
        let f = i as f64;
        (f as i128 == i as i128).then_some(f)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self.scalar_type() {
            Some(scalar) => scalar.name(),
            None => "null",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "{{}}"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "'{}'", s),
        }
    }
}

// Convenient From implementations
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

/// Primitive type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum ScalarType {
    Str,
    Int64,
    Float64,
    Bool,
}

impl ScalarType {
    /// Canonical name, as used in schema declarations.
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Str => "str",
            ScalarType::Int64 => "int64",
            ScalarType::Float64 => "float64",
            ScalarType::Bool => "bool",
        }
    }
}

impl FromStr for ScalarType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bare = s.strip_prefix("std::").unwrap_or(s);
        match bare {
            "str" => Ok(ScalarType::Str),
            "int64" => Ok(ScalarType::Int64),
            "float64" => Ok(ScalarType::Float64),
            "bool" => Ok(ScalarType::Bool),
            _ => Err(CoreError::UnknownScalarType(s.to_string())),
        }
    }
}

impl TryFrom<String> for ScalarType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type alias for property value maps.
pub type Values = std::collections::HashMap<String, Value>;

/// Helper macro to create property value maps.
#[macro_export]
macro_rules! values {
    () => {
        std::collections::HashMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        {
            let mut map = std::collections::HashMap::new();
            $(
                map.insert($key.to_string(), $crate::Value::from($value));
            )+
            map
        }
    };
}
