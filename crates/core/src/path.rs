//! Dotted key-path resolution against a payload tree.

use serde_json::Value as JsonValue;

use crate::error::ExpressionError;
use crate::value::Operand;

/// Walk `path` (e.g. `"domain_definition.nx"`) through `payload` and return
/// the terminal node.
///
/// A `null` terminal is legal; a `null` anywhere before it is not. Missing
/// keys are reported against the full path.
pub fn resolve_node<'a>(payload: &'a JsonValue, path: &str) -> Result<&'a JsonValue, ExpressionError> {
    let keys: Vec<&str> = path.split('.').collect();
    let last = keys.len() - 1;
    let mut current = payload;

    for (i, key) in keys.iter().enumerate() {
        let map = current
            .as_object()
            .ok_or_else(|| ExpressionError::ExpectedMapping {
                key: key.to_string(),
                path: path.to_string(),
            })?;
        if key.is_empty() {
            return Err(missing(path));
        }
        current = map.get(*key).ok_or_else(|| missing(path))?;
        if current.is_null() && i != last {
            return Err(ExpressionError::NullIntermediate {
                key: key.to_string(),
                path: path.to_string(),
            });
        }
    }
    Ok(current)
}

/// Resolve `path` to a comparable operand.
///
/// Mapping terminals and lists with nested containers are rejected as
/// [`ExpressionError::InvalidOperand`].
pub fn resolve(payload: &JsonValue, path: &str) -> Result<Operand, ExpressionError> {
    let node = resolve_node(payload, path)?;
    Operand::from_json(node).ok_or_else(|| ExpressionError::InvalidOperand {
        token: path.to_string(),
        reason: match node {
            JsonValue::Object(_) => "path resolves to a mapping".to_string(),
            _ => "path resolves to a list with non-scalar elements".to_string(),
        },
    })
}

fn missing(path: &str) -> ExpressionError {
    ExpressionError::MissingKey {
        path: path.to_string(),
    }
}
