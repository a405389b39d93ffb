//! Fail-fast profile enforcement.
//!
//! Rules are scanned in order. A condition that evaluates to `true` is a
//! failure precondition: the rule fires and enforcement stops. A rule that
//! cannot be evaluated stops enforcement as well, with the cause attached.

use serde_json::Value as JsonValue;

use crate::config::EngineConfig;
use crate::error::ValidationProfileError;

use super::evaluator::evaluate_rule;
use super::rules::Rule;

/// Enforce `rules` against `payload` with the default configuration
/// (strict mode, no override).
pub fn enforce_profile(rules: &[Rule], payload: &JsonValue) -> Result<(), ValidationProfileError> {
    enforce_profile_with(rules, payload, &EngineConfig::default())
}

/// Enforce `rules` against `payload`, reporting the first rule that fires
/// or fails to evaluate.
pub fn enforce_profile_with(
    rules: &[Rule],
    payload: &JsonValue,
    config: &EngineConfig,
) -> Result<(), ValidationProfileError> {
    for (index, rule) in rules.iter().enumerate() {
        if !rule.is_active() {
            tracing::debug!(index, "Skipping rule without condition");
            continue;
        }

        match evaluate_rule(rule, payload, config) {
            Ok(false) => {}
            Ok(true) => {
                tracing::debug!(index, message = %rule.message, "Validation rule fired");
                return Err(ValidationProfileError::violated(index, rule.message.clone()));
            }
            Err(cause) => {
                return Err(ValidationProfileError::unevaluable(
                    index,
                    rule.message.clone(),
                    cause,
                ));
            }
        }
    }

    tracing::debug!(rule_count = rules.len(), "Validation profile passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComparisonMode;
    use crate::error::ExpressionError;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn empty_profile_passes() {
        assert_eq!(enforce_profile(&[], &json!({})), Ok(()));
    }

    #[test]
    fn rule_that_does_not_fire_passes() {
        let rules = [Rule::new("domain_definition.nx == 0", "nx must be nonzero")];
        let payload = json!({"domain_definition": {"nx": 5}});
        assert_eq!(enforce_profile(&rules, &payload), Ok(()));
    }

    #[test]
    fn firing_rule_reports_index_and_message() {
        let rules = [
            Rule::new("domain_definition.nx == 1", "first"),
            Rule::new("domain_definition.nx == 0", "nx must be nonzero"),
        ];
        let payload = json!({"domain_definition": {"nx": 0}});
        let err = enforce_profile(&rules, &payload).unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.message, "nx must be nonzero");
        assert!(err.cause.is_none());
        assert_eq!(err.to_string(), "[Rule 1] nx must be nonzero");
    }

    #[test]
    fn stops_at_first_violation() {
        let rules = [
            Rule::new("domain_definition.nx == 0", "nx must be > 0"),
            Rule::new(
                "domain_definition.max_z <= domain_definition.min_z",
                "max_z must be above min_z",
            ),
        ];
        let payload = json!({"domain_definition": {"nx": 0, "max_z": 0, "min_z": 10}});
        let err = enforce_profile(&rules, &payload).unwrap_err();
        assert_eq!(err.index, 0);
        assert_eq!(err.message, "nx must be > 0");
    }

    #[test]
    fn rules_without_condition_are_skipped() {
        let rules = [
            Rule::inactive("This rule has no condition"),
            Rule::new("n == 3", "n must not be 3"),
        ];
        let err = enforce_profile(&rules, &json!({"n": 3})).unwrap_err();
        assert_eq!(err.index, 1);
    }

    #[test]
    fn unevaluable_rule_stops_with_cause() {
        let rules = [
            Rule::new("domain_definition.nx =", "Invalid expression"),
            Rule::new("domain_definition.nx == 0", "never reached"),
        ];
        let err = enforce_profile(&rules, &json!({"domain_definition": {"nx": 0}})).unwrap_err();
        assert_eq!(err.index, 0);
        assert_matches!(
            err.cause.as_ref().map(|c| &c.source),
            Some(ExpressionError::MalformedExpression(_))
        );
        assert!(err.to_string().contains("Unsupported expression format"));
    }

    #[test]
    fn relaxed_rule_on_mapping_operand_is_unevaluable() {
        let rules = [Rule::new("domain_definition.bbox == null", "bbox missing")
            .with_mode(ComparisonMode::Relaxed)];
        let payload = json!({"domain_definition": {"bbox": {"min_x": 0}}});

        let err = enforce_profile(&rules, &payload).unwrap_err();
        assert_eq!(err.index, 0);
        assert_matches!(
            err.cause.as_ref().map(|c| &c.source),
            Some(ExpressionError::InvalidOperand { .. })
        );
    }

    #[test]
    fn relaxed_bad_cast_is_unevaluable_not_a_violation() {
        let rules = [Rule::new("h != 50.0", "height must be 50").with_mode(ComparisonMode::Relaxed)];

        let err = enforce_profile(&rules, &json!({"h": "abc"})).unwrap_err();
        assert_matches!(
            err.cause.as_ref().map(|c| &c.source),
            Some(ExpressionError::CoercionFailure(_))
        );

        let err = enforce_profile(&rules, &json!({"h": "nan"})).unwrap_err();
        assert!(!err.is_evaluation_failure());
    }

    #[test]
    fn config_default_mode_applies_to_unspecified_rules() {
        let rules = [Rule::new("values.height == 50.0", "mismatch")];
        let payload = json!({"values": {"height": "50.0"}});

        let strict = enforce_profile(&rules, &payload).unwrap_err();
        assert!(strict.is_evaluation_failure());

        let relaxed = EngineConfig::default().with_default_mode(ComparisonMode::Relaxed);
        let fired = enforce_profile_with(&rules, &payload, &relaxed).unwrap_err();
        assert!(!fired.is_evaluation_failure());
    }
}
