//! Error taxonomy for expression, rule, and profile evaluation.
//!
//! Each layer wraps the error of the layer below it and adds context:
//! [`ExpressionError`] → [`RuleEvaluationError`] → [`ValidationProfileError`].
//! Callers of the profile enforcer only ever see [`ValidationProfileError`].

/// Failure while evaluating a single `lhs op rhs` expression.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExpressionError {
    #[error("Unsupported expression format: '{0}'")]
    MalformedExpression(String),

    #[error("Unsupported comparison operator: '{0}'")]
    UnsupportedOperator(String),

    #[error("Missing key in payload: '{path}'")]
    MissingKey { path: String },

    #[error("Expected mapping at '{key}' in path '{path}'")]
    ExpectedMapping { key: String, path: String },

    #[error("Null value encountered at '{key}' in path '{path}'")]
    NullIntermediate { key: String, path: String },

    #[error("Invalid operand '{token}': {reason}")]
    InvalidOperand { token: String, reason: String },

    #[error("Incompatible types under strict mode: {lhs} vs {rhs}")]
    IncompatibleTypes {
        lhs: &'static str,
        rhs: &'static str,
    },

    #[error("Type coercion failed in relaxed mode: {0}")]
    CoercionFailure(String),

    #[error("Comparison '{operator}' failed: {reason}")]
    ComparisonFailed {
        operator: &'static str,
        reason: String,
    },
}

impl ExpressionError {
    /// Whether this error came out of path resolution.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::MissingKey { .. } | Self::ExpectedMapping { .. } | Self::NullIntermediate { .. }
        )
    }
}

/// A rule whose condition could not be evaluated.
///
/// Distinct from a rule that evaluated cleanly to `false`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Evaluation error for '{condition}': {source}")]
pub struct RuleEvaluationError {
    pub condition: String,
    #[source]
    pub source: ExpressionError,
}

/// The single error type surfaced by profile enforcement.
///
/// Displays as `[Rule {index}] {message}`, suffixed with the evaluation
/// error when the rule itself could not be evaluated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("[Rule {index}] {message}{}", cause_suffix(.cause))]
pub struct ValidationProfileError {
    pub index: usize,
    pub message: String,
    #[source]
    pub cause: Option<RuleEvaluationError>,
}

impl ValidationProfileError {
    /// The rule's condition fired.
    pub fn violated(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
            cause: None,
        }
    }

    /// The rule could not be evaluated.
    pub fn unevaluable(index: usize, message: impl Into<String>, cause: RuleEvaluationError) -> Self {
        Self {
            index,
            message: message.into(),
            cause: Some(cause),
        }
    }

    /// `true` when the rule was broken rather than triggered.
    pub fn is_evaluation_failure(&self) -> bool {
        self.cause.is_some()
    }
}

fn cause_suffix(cause: &Option<RuleEvaluationError>) -> String {
    match cause {
        Some(err) => format!(": {err}"),
        None => String::new(),
    }
}

/// A rule record or profile document that cannot be turned into rules.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileConfigError {
    #[error("Invalid rule structure: expected list under 'rules' key")]
    RulesNotAList,

    #[error("Invalid rule record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("Invalid type check mode: '{0}'. Must be one of: strict, relaxed")]
    InvalidMode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_message_has_rule_prefix() {
        let err = ValidationProfileError::violated(3, "nx must be nonzero");
        assert_eq!(err.to_string(), "[Rule 3] nx must be nonzero");
        assert!(!err.is_evaluation_failure());
    }

    #[test]
    fn unevaluable_message_carries_cause() {
        let cause = RuleEvaluationError {
            condition: "a.b == 1".to_string(),
            source: ExpressionError::MissingKey {
                path: "a.b".to_string(),
            },
        };
        let err = ValidationProfileError::unevaluable(0, "broken", cause);
        assert_eq!(
            err.to_string(),
            "[Rule 0] broken: Evaluation error for 'a.b == 1': Missing key in payload: 'a.b'"
        );
        assert!(err.is_evaluation_failure());
    }

    #[test]
    fn source_chain_is_preserved() {
        use std::error::Error;

        let cause = RuleEvaluationError {
            condition: "x == 1".to_string(),
            source: ExpressionError::UnsupportedOperator("=~".to_string()),
        };
        let err = ValidationProfileError::unevaluable(1, "bad", cause);
        let rule_err = err.source().expect("rule error source");
        let expr_err = rule_err.source().expect("expression error source");
        assert_eq!(
            expr_err.to_string(),
            "Unsupported comparison operator: '=~'"
        );
    }

    #[test]
    fn resolution_errors_are_classified() {
        assert!(ExpressionError::MissingKey { path: "a".into() }.is_resolution_error());
        assert!(!ExpressionError::CoercionFailure("x".into()).is_resolution_error());
    }
}
