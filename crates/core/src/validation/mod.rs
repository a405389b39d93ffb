//! Rule and profile enforcement.
//!
//! Provides the rule types, a single-rule evaluator, and the fail-fast
//! profile enforcer built on top of the expression engine.

pub mod enforcer;
pub mod evaluator;
pub mod rules;
