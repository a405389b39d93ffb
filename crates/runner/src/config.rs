use std::path::PathBuf;

use rulecheck_core::{ComparisonMode, EngineConfig};

/// Environment variable naming the rule profile document.
pub const PROFILE_PATH_VAR: &str = "RULECHECK_PROFILE_PATH";
/// Environment variable naming the payload document.
pub const PAYLOAD_PATH_VAR: &str = "RULECHECK_PAYLOAD_PATH";
pub const DEFAULT_MODE_VAR: &str = "RULECHECK_DEFAULT_MODE";
pub const MODE_OVERRIDE_VAR: &str = "RULECHECK_MODE_OVERRIDE";
pub const DEBUG_VAR: &str = "RULECHECK_DEBUG";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Runner configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub profile_path: PathBuf,
    pub payload_path: PathBuf,
    pub engine: EngineConfig,
}

impl RunnerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                   | Required | Default  |
    /// |---------------------------|----------|----------|
    /// | `RULECHECK_PROFILE_PATH`  | yes      | --       |
    /// | `RULECHECK_PAYLOAD_PATH`  | yes      | --       |
    /// | `RULECHECK_DEFAULT_MODE`  | no       | `strict` |
    /// | `RULECHECK_MODE_OVERRIDE` | no       | none     |
    /// | `RULECHECK_DEBUG`         | no       | `false`  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(var))
        };

        let profile_path = PathBuf::from(required(PROFILE_PATH_VAR)?);
        let payload_path = PathBuf::from(required(PAYLOAD_PATH_VAR)?);

        let mut engine = EngineConfig::default();
        if let Some(mode) = lookup(DEFAULT_MODE_VAR) {
            engine = engine.with_default_mode(parse_mode(DEFAULT_MODE_VAR, &mode)?);
        }
        if let Some(mode) = lookup(MODE_OVERRIDE_VAR).filter(|v| !v.trim().is_empty()) {
            engine = engine.with_mode_override(parse_mode(MODE_OVERRIDE_VAR, &mode)?);
        }
        if let Some(debug) = lookup(DEBUG_VAR) {
            engine = engine.with_debug(parse_flag(DEBUG_VAR, &debug)?);
        }

        Ok(Self {
            profile_path,
            payload_path,
            engine,
        })
    }
}

fn parse_mode(var: &'static str, value: &str) -> Result<ComparisonMode, ConfigError> {
    ComparisonMode::from_str(value).map_err(|e| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
            reason: "expected a boolean flag".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    const PATHS: [(&str, &str); 2] = [
        (PROFILE_PATH_VAR, "profiles/mesh.yaml"),
        (PAYLOAD_PATH_VAR, "payload.json"),
    ];

    #[test]
    fn defaults_are_strict_without_override() {
        let config = RunnerConfig::from_lookup(lookup(&PATHS)).unwrap();
        assert_eq!(config.profile_path, PathBuf::from("profiles/mesh.yaml"));
        assert_eq!(config.payload_path, PathBuf::from("payload.json"));
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn paths_are_required() {
        assert_matches!(
            RunnerConfig::from_lookup(lookup(&[(PAYLOAD_PATH_VAR, "p.json")])),
            Err(ConfigError::Missing(PROFILE_PATH_VAR))
        );
        assert_matches!(
            RunnerConfig::from_lookup(lookup(&[(PROFILE_PATH_VAR, "r.yaml"), (PAYLOAD_PATH_VAR, "  ")])),
            Err(ConfigError::Missing(PAYLOAD_PATH_VAR))
        );
    }

    #[test]
    fn modes_and_debug_are_read() {
        let mut vars = PATHS.to_vec();
        vars.extend([
            (DEFAULT_MODE_VAR, "Relaxed"),
            (MODE_OVERRIDE_VAR, "strict"),
            (DEBUG_VAR, "yes"),
        ]);
        let config = RunnerConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.engine.default_mode, ComparisonMode::Relaxed);
        assert_eq!(config.engine.mode_override, Some(ComparisonMode::Strict));
        assert!(config.engine.debug);
    }

    #[test]
    fn blank_override_is_ignored() {
        let mut vars = PATHS.to_vec();
        vars.push((MODE_OVERRIDE_VAR, ""));
        let config = RunnerConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.engine.mode_override, None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut vars = PATHS.to_vec();
        vars.push((DEFAULT_MODE_VAR, "loose"));
        assert_matches!(
            RunnerConfig::from_lookup(lookup(&vars)),
            Err(ConfigError::Invalid { var: DEFAULT_MODE_VAR, .. })
        );

        let mut vars = PATHS.to_vec();
        vars.push((DEBUG_VAR, "maybe"));
        assert_matches!(
            RunnerConfig::from_lookup(lookup(&vars)),
            Err(ConfigError::Invalid { var: DEBUG_VAR, .. })
        );
    }
}
