//! Rule-expression validation engine.
//!
//! Evaluates declarative validation rules against a nested JSON payload.
//! Each rule carries a single `lhs op rhs` condition; when the condition
//! evaluates to `true` the rule fires and its message is reported.
//!
//! - [`literal`]: recognizes numeric, boolean, null and quoted literals.
//! - [`path`]: resolves dotted paths into the payload.
//! - [`operators`]: the fixed table of comparison operators.
//! - [`coercion`]: strict and relaxed type compatibility.
//! - [`expression`]: evaluates one `lhs op rhs` expression.
//! - [`validation`]: rules, profiles and fail-fast enforcement.

pub mod coercion;
pub mod config;
pub mod error;
pub mod expression;
pub mod literal;
pub mod operators;
pub mod path;
pub mod validation;
pub mod value;

pub use config::{ComparisonMode, EngineConfig, ModeSpec};
pub use error::{ExpressionError, ProfileConfigError, RuleEvaluationError, ValidationProfileError};
pub use expression::{evaluate, evaluate_with_config};
pub use validation::enforcer::{enforce_profile, enforce_profile_with};
pub use validation::evaluator::evaluate_rule;
pub use validation::rules::{Profile, Rule, RuleRecord};
pub use value::{Operand, Value};
