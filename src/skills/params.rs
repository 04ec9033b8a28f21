//! Effect parameters for skill cards.
//!
//! Skills carry parameters like "damage_multiplier", "duration" or
//! "time_scale". The engine only reads the few it needs for build
//! metrics; everything else is for the effect executor.
//!
//! ## ParamValue Types
//!
//! - `Int`: Whole numbers (hit count, flat damage)
//! - `Float`: Multipliers and durations
//! - `Bool`: Flags (pierces shields)
//! - `Text`: Strings (status name)

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Key for accessing effect parameters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamKey(pub String);

impl ParamKey {
    /// Create a new parameter key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl From<&str> for ParamKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ParamKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Value of an effect parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl ParamValue {
    /// Get as integer if this is an Int value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as float. Int values widen.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

/// Collection of effect parameters.
pub type Params = FxHashMap<ParamKey, ParamValue>;
