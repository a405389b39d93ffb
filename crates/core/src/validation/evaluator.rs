//! Single-rule evaluator. Pure logic, no I/O.

use serde_json::Value as JsonValue;

use crate::config::EngineConfig;
use crate::error::RuleEvaluationError;
use crate::expression::evaluate_with_config;

use super::rules::Rule;

/// Evaluate one rule's condition against `payload`.
///
/// A rule without a condition is vacuously `Ok(true)`; the profile
/// enforcer skips such rules before calling this. Evaluation errors are
/// returned as [`RuleEvaluationError`] and never folded into a boolean.
///
/// The comparison mode is `config.mode_override`, else the rule's own
/// mode, else `config.default_mode`.
pub fn evaluate_rule(
    rule: &Rule,
    payload: &JsonValue,
    config: &EngineConfig,
) -> Result<bool, RuleEvaluationError> {
    let Some(condition) = rule.condition.as_deref() else {
        return Ok(true);
    };
    let mode = config.effective_mode(rule.mode);

    evaluate_with_config(condition, payload, mode, config).map_err(|source| {
        tracing::warn!(condition, mode = %mode, error = %source, "Rule evaluation failed");
        RuleEvaluationError {
            condition: condition.to_string(),
            source,
        }
    })
}
