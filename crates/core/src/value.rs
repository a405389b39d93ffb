//! Scalar values and resolved operands.

use std::fmt;

use serde_json::Value as JsonValue;

/// A scalar comparison value.
///
/// Literals, payload leaves, and coercion results are all `Value`s.
/// Mappings and lists never appear here; see [`Operand`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Short variant name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether both values carry the same variant.
    pub fn same_variant(&self, other: &Value) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Convert a JSON scalar. Returns `None` for arrays and objects.
    ///
    /// Integers that fit `i64` become [`Value::Int`]; every other number
    /// becomes [`Value::Float`].
    pub fn from_json(json: &JsonValue) -> Option<Self> {
        match json {
            JsonValue::Null => Some(Self::Null),
            JsonValue::Bool(b) => Some(Self::Bool(*b)),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Int(i)),
                None => n.as_f64().map(Self::Float),
            },
            JsonValue::String(s) => Some(Self::String(s.clone())),
            JsonValue::Array(_) | JsonValue::Object(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            // Keep a trailing `.0` on integral floats so `50.0` stringifies
            // as `50.0` rather than `50`.
            Self::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 => {
                write!(f, "{x:.1}")
            }
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

/// What an expression token resolves to.
///
/// Lists are only meaningful as the right-hand container of `in` and
/// `not in`; every other operator requires two scalars.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Scalar(Value),
    List(Vec<Value>),
}

impl Operand {
    /// Convert a resolved JSON node. Returns `None` for mappings and for
    /// lists holding anything other than scalars.
    pub fn from_json(json: &JsonValue) -> Option<Self> {
        match json {
            JsonValue::Array(items) => items
                .iter()
                .map(Value::from_json)
                .collect::<Option<Vec<_>>>()
                .map(Self::List),
            JsonValue::Object(_) => None,
            scalar => Value::from_json(scalar).map(Self::Scalar),
        }
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(v) => Some(v),
            Self::List(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Scalar(v) => v.type_name(),
            Self::List(_) => "list",
        }
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Self::Scalar(v)
    }
}
