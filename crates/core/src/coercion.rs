//! Type compatibility and relaxed-mode coercion.
//!
//! Strict mode only accepts operands of the same variant. Relaxed mode
//! runs the pair through an ordered list of coercion steps; the first step
//! that applies decides the outcome. Every step is symmetric in its
//! operands, and no step may yield a NaN or infinite float.

use crate::config::ComparisonMode;
use crate::error::ExpressionError;
use crate::value::Value;

/// Strings accepted as boolean-like in relaxed mode (case-insensitive).
pub const TRUTHY_STRINGS: &[&str] = &["true", "yes", "1"];
pub const FALSY_STRINGS: &[&str] = &["false", "no", "0"];

/// Whether `lhs` and `rhs` may be compared under `mode`.
///
/// `Null` on either side is never comparable here; null equality is
/// decided by the expression evaluator before this check runs.
pub fn comparable(lhs: &Value, rhs: &Value, mode: ComparisonMode) -> bool {
    match mode {
        ComparisonMode::Strict => !lhs.is_null() && !rhs.is_null() && lhs.same_variant(rhs),
        ComparisonMode::Relaxed => coerce(lhs, rhs).is_ok(),
    }
}

/// Normalize a pair of operands for relaxed comparison.
///
/// Fails with [`ExpressionError::CoercionFailure`] exactly when
/// `comparable(lhs, rhs, Relaxed)` is false.
pub fn coerce(lhs: &Value, rhs: &Value) -> Result<(Value, Value), ExpressionError> {
    try_coerce(lhs, rhs).ok_or_else(|| {
        ExpressionError::CoercionFailure(format!(
            "cannot compare {} '{lhs}' with {} '{rhs}'",
            lhs.type_name(),
            rhs.type_name()
        ))
    })
}

fn try_coerce(lhs: &Value, rhs: &Value) -> Option<(Value, Value)> {
    use Value::*;

    match (lhs, rhs) {
        (Null, _) | (_, Null) => None,

        (Bool(_), _) | (_, Bool(_)) => Some((Bool(to_bool(lhs)?), Bool(to_bool(rhs)?))),

        (Int(a), Float(b)) => Some((Float(*a as f64), Float(*b))),
        (Float(a), Int(b)) => Some((Float(*a), Float(*b as f64))),

        (Int(_) | Float(_), String(s)) => {
            let (n, parsed) = numeric_with_string(lhs, s)?;
            Some((n, parsed))
        }
        (String(s), Int(_) | Float(_)) => {
            let (n, parsed) = numeric_with_string(rhs, s)?;
            Some((parsed, n))
        }

        (String(a), String(b)) => strings(a, b),

        _ if lhs.same_variant(rhs) => Some((lhs.clone(), rhs.clone())),
        _ => None,
    }
}

/// Parse `s` into the numeric type of `n`. An `Int` paired with a string
/// that only reads as a float widens both sides to `Float`.
fn numeric_with_string(n: &Value, s: &str) -> Option<(Value, Value)> {
    match n {
        Value::Int(i) => match parse_int(s) {
            Some(parsed) => Some((Value::Int(*i), Value::Int(parsed))),
            None => Some((Value::Float(*i as f64), Value::Float(parse_finite_float(s)?))),
        },
        Value::Float(x) => Some((Value::Float(*x), Value::Float(parse_finite_float(s)?))),
        _ => None,
    }
}

/// Two strings: both as `Int`, then both as `Float`, else unchanged.
fn strings(a: &str, b: &str) -> Option<(Value, Value)> {
    if is_non_finite_numeric(a) || is_non_finite_numeric(b) {
        return None;
    }
    if let (Some(x), Some(y)) = (parse_int(a), parse_int(b)) {
        return Some((Value::Int(x), Value::Int(y)));
    }
    if let (Some(x), Some(y)) = (parse_finite_float(a), parse_finite_float(b)) {
        return Some((Value::Float(x), Value::Float(y)));
    }
    Some((Value::String(a.to_string()), Value::String(b.to_string())))
}

/// Relaxed boolean reading of a value.
pub fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Int(0) => Some(false),
        Value::Int(1) => Some(true),
        Value::Float(x) if *x == 0.0 => Some(false),
        Value::Float(x) if *x == 1.0 => Some(true),
        Value::String(s) => {
            let lowered = s.trim().to_ascii_lowercase();
            if TRUTHY_STRINGS.contains(&lowered.as_str()) {
                Some(true)
            } else if FALSY_STRINGS.contains(&lowered.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn parse_int(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok()
}

/// Parse a float, rejecting NaN and infinities.
pub fn parse_finite_float(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|x| x.is_finite())
}

/// Whether `value` reads as NaN or an infinity.
///
/// Such values never coerce, and are unequal to everything in relaxed mode.
pub fn has_non_finite_reading(value: &Value) -> bool {
    match value {
        Value::Float(x) => !x.is_finite(),
        Value::String(s) => is_non_finite_numeric(s),
        _ => false,
    }
}

/// `"nan"`, `"inf"`, `"-infinity"`, `"1e999"` and friends.
fn is_non_finite_numeric(s: &str) -> bool {
    s.trim()
        .parse::<f64>()
        .map(|x| !x.is_finite())
        .unwrap_or(false)
}
