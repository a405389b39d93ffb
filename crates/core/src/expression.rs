//! Three-token expression evaluation (`lhs op rhs`).
//!
//! Orchestrates literal parsing, path resolution, the comparability gate,
//! and operator dispatch for a single clause such as
//! `domain_definition.max_z <= domain_definition.min_z`.

use serde_json::Value as JsonValue;

use crate::coercion::{coerce, comparable, has_non_finite_reading};
use crate::config::{ComparisonMode, EngineConfig};
use crate::error::ExpressionError;
use crate::literal::{is_literal, is_symbolic_reference, parse_literal};
use crate::operators::{resolve_operator, values_equal, Operator};
use crate::path;
use crate::value::{Operand, Value};

/// Evaluate `expr` against `payload` under `mode`.
pub fn evaluate(expr: &str, payload: &JsonValue, mode: ComparisonMode) -> Result<bool, ExpressionError> {
    evaluate_with_config(expr, payload, mode, &EngineConfig::default())
}

/// Same as [`evaluate`], honouring `config.debug` for step tracing.
pub fn evaluate_with_config(
    expr: &str,
    payload: &JsonValue,
    mode: ComparisonMode,
    config: &EngineConfig,
) -> Result<bool, ExpressionError> {
    Evaluator {
        payload,
        mode,
        debug: config.debug,
    }
    .run(expr)
}

/// Split an expression into `(lhs, op, rhs)`.
///
/// Tokens are whitespace-delimited; a token that opens with a quote keeps
/// embedded whitespace until that quote closes. `not in` is merged into a
/// single operator token.
pub fn tokenize(expr: &str) -> Result<(String, String, String), ExpressionError> {
    let mut tokens = split_tokens(expr.trim());

    let merged = match tokens.as_slice() {
        [lhs, not, inn, rhs] if not == "not" && inn == "in" => {
            Some(vec![lhs.clone(), "not in".to_string(), rhs.clone()])
        }
        _ => None,
    };
    if let Some(merged) = merged {
        tokens = merged;
    }

    match <[String; 3]>::try_from(tokens) {
        Ok([lhs, op, rhs]) => Ok((lhs, op, rhs)),
        Err(_) => Err(ExpressionError::MalformedExpression(expr.to_string())),
    }
}

fn split_tokens(expr: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_quote = false;

    for c in expr.chars() {
        if current.is_empty() && !in_quote {
            if c.is_whitespace() {
                continue;
            }
            quote = (c == '\'' || c == '"').then_some(c);
        }
        if Some(c) == quote {
            in_quote = !in_quote;
        }
        if c.is_whitespace() && !in_quote {
            tokens.push(std::mem::take(&mut current));
            quote = None;
            continue;
        }
        current.push(c);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

struct Evaluator<'a> {
    payload: &'a JsonValue,
    mode: ComparisonMode,
    debug: bool,
}

impl Evaluator<'_> {
    fn run(&self, expr: &str) -> Result<bool, ExpressionError> {
        let (lhs_token, op_token, rhs_token) = tokenize(expr)?;
        let op = resolve_operator(&op_token)?;

        let lhs = self.resolve_lhs(&lhs_token)?;
        let rhs = self.resolve_rhs(&rhs_token)?;

        if self.debug {
            tracing::debug!(
                expr,
                mode = %self.mode,
                lhs = ?lhs,
                op = %op,
                rhs = ?rhs,
                "Resolved expression operands"
            );
        }

        let result = self.compare(op, &lhs_token, lhs, &rhs_token, rhs)?;

        if self.debug {
            tracing::debug!(expr, result, "Expression evaluated");
        }
        Ok(result)
    }

    /// Literal unless the token is a dotted reference; otherwise a path.
    fn resolve_lhs(&self, token: &str) -> Result<Operand, ExpressionError> {
        if is_literal(token) && !is_symbolic_reference(token) {
            if let Some(value) = parse_literal(token) {
                return Ok(Operand::Scalar(value));
            }
        }
        match path::resolve(self.payload, token) {
            Ok(operand) => Ok(operand),
            Err(err) if self.mode == ComparisonMode::Relaxed && err.is_resolution_error() => {
                self.trace_fallback(token, &err);
                Ok(Operand::Scalar(Value::Null))
            }
            Err(err) => Err(err),
        }
    }

    /// Literal first; paths only when the literal parse fails.
    fn resolve_rhs(&self, token: &str) -> Result<Operand, ExpressionError> {
        if let Some(value) = parse_literal(token) {
            return Ok(Operand::Scalar(value));
        }
        match self.mode {
            ComparisonMode::Strict if is_symbolic_reference(token) => path::resolve(self.payload, token),
            ComparisonMode::Strict => Err(ExpressionError::InvalidOperand {
                token: token.to_string(),
                reason: "not a literal or a dotted payload path".to_string(),
            }),
            ComparisonMode::Relaxed => match path::resolve(self.payload, token) {
                Ok(operand) => Ok(operand),
                Err(err) if !err.is_resolution_error() => Err(err),
                Err(err) => {
                    self.trace_fallback(token, &err);
                    if token.contains('.') {
                        Ok(Operand::Scalar(Value::Null))
                    } else {
                        Ok(Operand::Scalar(Value::String(token.to_string())))
                    }
                }
            },
        }
    }

    fn trace_fallback(&self, token: &str, err: &ExpressionError) {
        if self.debug {
            tracing::debug!(token, error = %err, "Relaxed resolution fallback");
        }
    }

    fn compare(
        &self,
        op: Operator,
        lhs_token: &str,
        lhs: Operand,
        rhs_token: &str,
        rhs: Operand,
    ) -> Result<bool, ExpressionError> {
        if op.is_membership() {
            return self.compare_membership(op, lhs_token, lhs, rhs);
        }

        let lhs = scalar_or_invalid(lhs, lhs_token, op)?;
        let rhs = scalar_or_invalid(rhs, rhs_token, op)?;

        // Null short-circuit: two nulls go straight to the registry, and a
        // single null is simply unequal under `==` / `!=`.
        if lhs.is_null() && rhs.is_null() {
            return op.apply(&Operand::Scalar(lhs), &Operand::Scalar(rhs));
        }
        if (lhs.is_null() || rhs.is_null()) && op.is_equality() {
            return Ok(op == Operator::Ne);
        }

        if op == Operator::Matches {
            return op.apply(&Operand::Scalar(lhs), &Operand::Scalar(rhs));
        }

        let (lhs, rhs) = match self.mode {
            ComparisonMode::Strict => {
                if !comparable(&lhs, &rhs, ComparisonMode::Strict) {
                    return Err(ExpressionError::IncompatibleTypes {
                        lhs: lhs.type_name(),
                        rhs: rhs.type_name(),
                    });
                }
                (lhs, rhs)
            }
            ComparisonMode::Relaxed => match coerce(&lhs, &rhs) {
                Ok(pair) => {
                    if self.debug {
                        tracing::debug!(lhs = ?pair.0, rhs = ?pair.1, "Coerced operands");
                    }
                    pair
                }
                // NaN and infinities are unequal to everything.
                Err(_)
                    if op.is_equality()
                        && (has_non_finite_reading(&lhs) || has_non_finite_reading(&rhs)) =>
                {
                    return Ok(op == Operator::Ne);
                }
                Err(err) => return Err(err),
            },
        };

        op.apply(&Operand::Scalar(lhs), &Operand::Scalar(rhs))
    }

    /// `in` / `not in`: align the container with the needle under the
    /// active mode, then let the registry predicate decide.
    fn compare_membership(
        &self,
        op: Operator,
        lhs_token: &str,
        lhs: Operand,
        rhs: Operand,
    ) -> Result<bool, ExpressionError> {
        let needle = scalar_or_invalid(lhs, lhs_token, op)?;

        let rhs = match (self.mode, rhs) {
            (ComparisonMode::Strict, Operand::List(items)) => Operand::List(
                items
                    .into_iter()
                    .filter(|item| item.same_variant(&needle))
                    .collect(),
            ),
            (ComparisonMode::Relaxed, Operand::List(items)) => Operand::List(
                items
                    .into_iter()
                    .map(|item| match coerce(&needle, &item) {
                        Ok((n, i)) if values_equal(&n, &i) => needle.clone(),
                        _ => item,
                    })
                    .collect(),
            ),
            (_, scalar) => scalar,
        };

        // Relaxed substring checks stringify a non-string needle.
        let stringify = self.mode == ComparisonMode::Relaxed
            && !matches!(needle, Value::String(_))
            && matches!(rhs, Operand::Scalar(Value::String(_)));
        let needle = if stringify {
            Value::String(needle.to_string())
        } else {
            needle
        };

        op.apply(&Operand::Scalar(needle), &rhs)
    }
}

fn scalar_or_invalid(operand: Operand, token: &str, op: Operator) -> Result<Value, ExpressionError> {
    match operand {
        Operand::Scalar(value) => Ok(value),
        Operand::List(_) => Err(ExpressionError::InvalidOperand {
            token: token.to_string(),
            reason: format!("a list cannot be the operand of '{op}' here"),
        }),
    }
}
