//! Literal token parsing.
//!
//! Turns a raw expression token into a typed [`Value`], or reports that the
//! token is not a literal so the caller can treat it as a payload path.

use std::sync::LazyLock;

use regex::Regex;

use crate::value::Value;

/// Signed integers and decimals, optionally in scientific notation.
/// No `nan` / `inf` spellings.
const NUMERIC_PATTERN: &str = r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$";

static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NUMERIC_PATTERN).expect("valid regex"));

/// Parse a token into a literal value.
///
/// Returns `None` when the token is not a literal.
pub fn parse_literal(token: &str) -> Option<Value> {
    let normalized = normalize(token);
    let val = normalized.trim();

    if val.eq_ignore_ascii_case("true") {
        return Some(Value::Bool(true));
    }
    if val.eq_ignore_ascii_case("false") {
        return Some(Value::Bool(false));
    }
    if val.eq_ignore_ascii_case("null") || val.eq_ignore_ascii_case("none") {
        return Some(Value::Null);
    }
    if let Some(inner) = strip_quotes(val) {
        return Some(Value::String(inner.to_string()));
    }
    parse_number(val)
}

/// Whether `token` parses as a literal, without building the value.
pub fn is_literal(token: &str) -> bool {
    let normalized = normalize(token);
    let val = normalized.trim();

    val.eq_ignore_ascii_case("true")
        || val.eq_ignore_ascii_case("false")
        || val.eq_ignore_ascii_case("null")
        || val.eq_ignore_ascii_case("none")
        || strip_quotes(val).is_some()
        || is_numeric(val)
}

/// Whether `token` names a dotted payload path rather than a literal.
///
/// Quoted strings and numbers such as `50.0` contain a dot but are not
/// references.
pub fn is_symbolic_reference(token: &str) -> bool {
    let normalized = normalize(token);
    let val = normalized.trim();
    val.contains('.') && strip_quotes(val).is_none() && !is_numeric(val)
}

/// Collapse tripled and doubled quote runs left behind by nested quoting.
fn normalize(token: &str) -> String {
    token
        .replace("'''", "'")
        .replace("\"\"\"", "\"")
        .replace("''", "'")
        .replace("\"\"", "\"")
}

/// Inner text of a token fully wrapped in one matching quote pair.
fn strip_quotes(val: &str) -> Option<&str> {
    if val.len() < 2 {
        return None;
    }
    ['\'', '"']
        .into_iter()
        .find(|q| val.starts_with(*q) && val.ends_with(*q))
        .map(|_| &val[1..val.len() - 1])
}

fn is_numeric(val: &str) -> bool {
    parse_number(val).is_some()
}

fn parse_number(val: &str) -> Option<Value> {
    if !val.is_empty() && val.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(i) = val.parse::<i64>() {
            return Some(Value::Int(i));
        }
    }
    if !NUMERIC_RE.is_match(val) {
        return None;
    }
    let is_integral = !val.contains(['.', 'e', 'E']);
    if is_integral {
        if let Ok(i) = val.parse::<i64>() {
            return Some(Value::Int(i));
        }
    }
    val.parse::<f64>()
        .ok()
        .filter(|x| x.is_finite())
        .map(Value::Float)
}
