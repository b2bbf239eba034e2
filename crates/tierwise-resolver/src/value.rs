//! Scalar setting values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest magnitude an `i64` can have and still convert to `f64` exactly.
pub const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// A single scalar setting value.
///
/// Absence of a value is expressed by the field not being present in a
/// layer at all, so `false`, `0` and `""` are ordinary opinions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    Integer(i64),
    /// Must be finite; enforced when a layer is built.
    Number(f64),
    Text(String),
}

/// Kind of a scalar value, used to detect ill-typed overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Bool,
    Integer,
    Number,
    Text,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Bool => write!(f, "bool"),
            ValueKind::Integer => write!(f, "integer"),
            ValueKind::Number => write!(f, "number"),
            ValueKind::Text => write!(f, "text"),
        }
    }
}

impl ScalarValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            ScalarValue::Bool(_) => ValueKind::Bool,
            ScalarValue::Integer(_) => ValueKind::Integer,
            ScalarValue::Number(_) => ValueKind::Number,
            ScalarValue::Text(_) => ValueKind::Text,
        }
    }

    /// Whether this value may replace a value of `base` kind.
    ///
    /// Integers are accepted where the base holds a number, since document
    /// formats do not distinguish `1` from `1.0` reliably. Only integers
    /// within [`MAX_EXACT_INTEGER`] qualify, so widening never rounds.
    pub fn fits(&self, base: ValueKind) -> bool {
        match (self, base) {
            (ScalarValue::Integer(i), ValueKind::Number) => i.unsigned_abs() <= MAX_EXACT_INTEGER,
            _ => self.kind() == base,
        }
    }

    pub(crate) fn is_finite(&self) -> bool {
        match self {
            ScalarValue::Number(n) => n.is_finite(),
            _ => true,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScalarValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ScalarValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`, rounding beyond
    /// [`MAX_EXACT_INTEGER`].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Number(n) => Some(*n),
            ScalarValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(b) => write!(f, "{}", b),
            ScalarValue::Integer(i) => write!(f, "{}", i),
            ScalarValue::Number(n) => write!(f, "{}", n),
            ScalarValue::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Integer(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Number(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Text(value)
    }
}
