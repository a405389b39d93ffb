//! `rulecheck-runner` -- enforce a rule profile against a payload file.
//!
//! # Environment variables
//!
//! | Variable                  | Required | Default  | Description                              |
//! |---------------------------|----------|----------|------------------------------------------|
//! | `RULECHECK_PROFILE_PATH`  | yes      | --       | Rule profile document (JSON or YAML)     |
//! | `RULECHECK_PAYLOAD_PATH`  | yes      | --       | Payload document (JSON or YAML)          |
//! | `RULECHECK_DEFAULT_MODE`  | no       | `strict` | Mode for rules that do not set one       |
//! | `RULECHECK_MODE_OVERRIDE` | no       | --       | Force every rule into `strict`/`relaxed` |
//! | `RULECHECK_DEBUG`         | no       | `false`  | Trace operand resolution and coercion    |
//!
//! Exits `0` when no rule fires, `1` on a violation, `2` on a
//! configuration or load error.

use rulecheck_runner::{run_from_env, RunError, RunOutcome};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rulecheck_runner=info,rulecheck_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let code = match run_from_env() {
        Ok(outcome @ RunOutcome::Passed { rule_count }) => {
            tracing::info!(rule_count, "All validation rules passed");
            outcome.exit_code()
        }
        Ok(RunOutcome::Violated(err)) => {
            if err.is_evaluation_failure() {
                tracing::error!(index = err.index, error = %err, "Validation rule could not be evaluated");
            } else {
                tracing::error!(index = err.index, error = %err, "Validation rule violated");
            }
            RunOutcome::Violated(err).exit_code()
        }
        Err(e @ RunError::Config(_)) => {
            tracing::error!(error = %e, "Invalid configuration");
            RunError::EXIT_CODE
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load validation inputs");
            RunError::EXIT_CODE
        }
    };

    std::process::exit(code);
}
