//! The fixed operator registry and its predicates.
//!
//! Predicates are pure and assume the caller has already applied the
//! active comparison mode; they only fail on inputs the operator itself
//! cannot handle (unorderable pairs, non-container right-hand sides,
//! malformed regex patterns).

use std::cmp::Ordering;

use regex::Regex;

use crate::error::ExpressionError;
use crate::value::{Operand, Value};

/// Predicate signature shared by every registry entry.
pub type Predicate = fn(&Operand, &Operand) -> Result<bool, String>;

/// A supported comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
    Matches,
}

/// Wire token → operator. Never empty, never mutated.
pub const REGISTRY: &[(&str, Operator)] = &[
    ("==", Operator::Eq),
    ("!=", Operator::Ne),
    ("<", Operator::Lt),
    ("<=", Operator::Le),
    (">", Operator::Gt),
    (">=", Operator::Ge),
    ("in", Operator::In),
    ("not in", Operator::NotIn),
    ("matches", Operator::Matches),
];

/// Look up an operator by its wire token.
pub fn resolve_operator(token: &str) -> Result<Operator, ExpressionError> {
    REGISTRY
        .iter()
        .find(|(t, _)| *t == token)
        .map(|(_, op)| *op)
        .ok_or_else(|| ExpressionError::UnsupportedOperator(token.to_string()))
}

impl Operator {
    /// Return the wire token for this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::Matches => "matches",
        }
    }

    /// `==` and `!=`.
    pub fn is_equality(&self) -> bool {
        matches!(self, Self::Eq | Self::Ne)
    }

    /// `in` and `not in`.
    pub fn is_membership(&self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    pub fn predicate(&self) -> Predicate {
        match self {
            Self::Eq => op_eq,
            Self::Ne => op_ne,
            Self::Lt => op_lt,
            Self::Le => op_le,
            Self::Gt => op_gt,
            Self::Ge => op_ge,
            Self::In => op_in,
            Self::NotIn => op_not_in,
            Self::Matches => op_matches,
        }
    }

    /// Run the predicate, wrapping any failure as
    /// [`ExpressionError::ComparisonFailed`].
    pub fn apply(&self, lhs: &Operand, rhs: &Operand) -> Result<bool, ExpressionError> {
        (self.predicate())(lhs, rhs).map_err(|reason| ExpressionError::ComparisonFailed {
            operator: self.as_str(),
            reason,
        })
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

fn scalars<'a>(lhs: &'a Operand, rhs: &'a Operand) -> Result<(&'a Value, &'a Value), String> {
    match (lhs, rhs) {
        (Operand::Scalar(a), Operand::Scalar(b)) => Ok((a, b)),
        _ => Err(format!(
            "expected two scalars, got {} and {}",
            lhs.type_name(),
            rhs.type_name()
        )),
    }
}

/// Equality between two values. Int/Float pairs compare numerically.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => (*x as f64) == *y,
        _ => a == b,
    }
}

/// Order two values, or explain why they cannot be ordered.
pub fn order_values(a: &Value, b: &Value) -> Result<Ordering, String> {
    let ordering = match (a, b) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y),
        (Value::Int(x), Value::Float(y)) => (*x as f64).partial_cmp(y),
        (Value::Float(x), Value::Int(y)) => x.partial_cmp(&(*y as f64)),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    };
    ordering.ok_or_else(|| {
        format!(
            "ordering not supported between {} and {}",
            a.type_name(),
            b.type_name()
        )
    })
}

fn op_eq(lhs: &Operand, rhs: &Operand) -> Result<bool, String> {
    let (a, b) = scalars(lhs, rhs)?;
    Ok(values_equal(a, b))
}

fn op_ne(lhs: &Operand, rhs: &Operand) -> Result<bool, String> {
    op_eq(lhs, rhs).map(|eq| !eq)
}

fn op_lt(lhs: &Operand, rhs: &Operand) -> Result<bool, String> {
    let (a, b) = scalars(lhs, rhs)?;
    Ok(order_values(a, b)? == Ordering::Less)
}

fn op_le(lhs: &Operand, rhs: &Operand) -> Result<bool, String> {
    let (a, b) = scalars(lhs, rhs)?;
    Ok(order_values(a, b)? != Ordering::Greater)
}

fn op_gt(lhs: &Operand, rhs: &Operand) -> Result<bool, String> {
    let (a, b) = scalars(lhs, rhs)?;
    Ok(order_values(a, b)? == Ordering::Greater)
}

fn op_ge(lhs: &Operand, rhs: &Operand) -> Result<bool, String> {
    let (a, b) = scalars(lhs, rhs)?;
    Ok(order_values(a, b)? != Ordering::Less)
}

fn op_in(lhs: &Operand, rhs: &Operand) -> Result<bool, String> {
    let needle = lhs
        .as_scalar()
        .ok_or_else(|| "left operand of 'in' must be a scalar".to_string())?;
    match rhs {
        Operand::List(items) => Ok(items.iter().any(|item| values_equal(needle, item))),
        Operand::Scalar(Value::String(haystack)) => match needle {
            Value::String(s) => Ok(haystack.contains(s.as_str())),
            other => Err(format!(
                "'in <string>' requires a string left operand, got {}",
                other.type_name()
            )),
        },
        Operand::Scalar(other) => Err(format!(
            "right operand of 'in' must be a list or string, got {}",
            other.type_name()
        )),
    }
}

fn op_not_in(lhs: &Operand, rhs: &Operand) -> Result<bool, String> {
    op_in(lhs, rhs).map(|found| !found)
}

fn op_matches(lhs: &Operand, rhs: &Operand) -> Result<bool, String> {
    let (subject, pattern) = scalars(lhs, rhs)?;
    let Value::String(pattern) = pattern else {
        return Err("Regex pattern must be a string".to_string());
    };
    let re = Regex::new(&format!("^(?:{pattern})$"))
        .map_err(|e| format!("invalid regex pattern '{pattern}': {e}"))?;
    Ok(re.is_match(&subject.to_string()))
}
