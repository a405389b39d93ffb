//! `rulecheck-runner` library crate.
//!
//! Loads a rule profile and a payload from disk and enforces one against
//! the other. The binary entrypoint lives in `main.rs`.

pub mod config;
pub mod loader;

use rulecheck_core::ValidationProfileError;

pub use config::{ConfigError, RunnerConfig};
pub use loader::LoadError;

/// Result of a completed enforcement pass.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// No rule fired.
    Passed { rule_count: usize },
    /// A rule fired or could not be evaluated.
    Violated(ValidationProfileError),
}

impl RunOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed { .. })
    }

    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Passed { .. } => 0,
            Self::Violated(_) => 1,
        }
    }
}

/// Failure before enforcement could run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),
}

impl RunError {
    /// Process exit code for configuration and loading failures.
    pub const EXIT_CODE: i32 = 2;
}

/// Load the configured profile and payload and enforce the profile.
pub fn run(config: &RunnerConfig) -> Result<RunOutcome, RunError> {
    let profile = loader::load_profile(&config.profile_path)?;
    let payload = loader::load_payload(&config.payload_path)?;

    tracing::info!(
        profile = %config.profile_path.display(),
        payload = %config.payload_path.display(),
        default_mode = %config.engine.default_mode,
        mode_override = ?config.engine.mode_override,
        "Enforcing rule profile"
    );

    let outcome = match profile.enforce(&payload, &config.engine) {
        Ok(()) => RunOutcome::Passed {
            rule_count: profile.len(),
        },
        Err(err) => RunOutcome::Violated(err),
    };
    Ok(outcome)
}

/// Read [`RunnerConfig`] from the environment, then [`run`].
pub fn run_from_env() -> Result<RunOutcome, RunError> {
    let config = RunnerConfig::from_env()?;
    run(&config)
}
