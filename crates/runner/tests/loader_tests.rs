//! Integration tests for document loading and end-to-end runs.
//!
//! Fixtures are written to a temporary directory so both the JSON and
//! YAML paths are exercised against real files.

use std::path::{Path, PathBuf};

use assert_matches::assert_matches;
use serde_json::json;
use tempfile::TempDir;

use rulecheck_core::{ComparisonMode, EngineConfig, ExpressionError, ProfileConfigError};
use rulecheck_runner::loader::{load_document, load_payload, load_profile};
use rulecheck_runner::{run, LoadError, RunOutcome, RunnerConfig};

const PROFILE_YAML: &str = "\
rules:
  - if: domain_definition.nx == 0
    raise: nx must be nonzero
  - if: domain_definition.max_z <= domain_definition.min_z
    raise: max_z must exceed min_z
  - if: values.height == 50.0
    type_check_mode: relaxed
    raise: height must not be 50
";

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("fixture should be writable");
    path
}

fn config(profile: &Path, payload: &Path) -> RunnerConfig {
    RunnerConfig {
        profile_path: profile.to_path_buf(),
        payload_path: payload.to_path_buf(),
        engine: EngineConfig::default(),
    }
}

// ---------------------------------------------------------------------------
// Test: load_document / load_profile
// ---------------------------------------------------------------------------

/// A YAML profile loads every rule in document order.
#[test]
fn yaml_profile_loads_in_order() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "profile.yaml", PROFILE_YAML);

    let profile = load_profile(&path).unwrap();
    assert_eq!(profile.len(), 3);
    assert_eq!(profile.rules()[0].message, "nx must be nonzero");
    assert_eq!(
        profile.rules()[2].condition.as_deref(),
        Some("values.height == 50.0")
    );
}

/// A JSON payload loads unchanged as a `serde_json::Value`.
#[test]
fn json_payload_loads_as_value() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "payload.json", r#"{"domain_definition": {"nx": 5}}"#);
    assert_eq!(
        load_payload(&path).unwrap(),
        json!({"domain_definition": {"nx": 5}})
    );
}

/// A path that does not exist is reported as an I/O error.
#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");
    assert_matches!(load_document(&path), Err(LoadError::Io { .. }));
}

/// Files other than `.json`, `.yaml` and `.yml` are rejected before reading.
#[test]
fn unknown_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "profile.toml", "rules = []");
    assert_matches!(load_document(&path), Err(LoadError::UnsupportedFormat { .. }));
}

/// Parse errors are tagged with the format that failed.
#[test]
fn malformed_documents_report_their_format() {
    let dir = TempDir::new().unwrap();
    let json = write(&dir, "bad.json", "{\"rules\": [");
    let yaml = write(&dir, "bad.yml", "rules: [unclosed");
    assert_matches!(load_document(&json), Err(LoadError::Json { .. }));
    assert_matches!(load_document(&yaml), Err(LoadError::Yaml { .. }));
}

/// A `rules` entry that is not a list surfaces as a profile error.
#[test]
fn invalid_profile_structure_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "profile.yaml", "rules: not-a-list\n");
    assert_matches!(
        load_profile(&path),
        Err(LoadError::Profile {
            source: ProfileConfigError::RulesNotAList,
            ..
        })
    );
}

// ---------------------------------------------------------------------------
// Test: run
// ---------------------------------------------------------------------------

/// A payload that fires no rule passes with exit code 0.
#[test]
fn clean_payload_passes() {
    let dir = TempDir::new().unwrap();
    let profile = write(&dir, "profile.yaml", PROFILE_YAML);
    let payload = write(
        &dir,
        "payload.json",
        r#"{"domain_definition": {"nx": 5, "min_z": 0, "max_z": 10}, "values": {"height": "12.5"}}"#,
    );

    let outcome = run(&config(&profile, &payload)).unwrap();
    assert_eq!(outcome, RunOutcome::Passed { rule_count: 3 });
    assert_eq!(outcome.exit_code(), 0);
}

/// A firing rule is a violation with exit code 1 and no evaluation cause.
#[test]
fn violation_reports_rule_and_exit_code() {
    let dir = TempDir::new().unwrap();
    let profile = write(&dir, "profile.yaml", PROFILE_YAML);
    let payload = write(
        &dir,
        "payload.yaml",
        "domain_definition:\n  nx: 5\n  min_z: 0\n  max_z: 10\nvalues:\n  height: '50.0'\n",
    );

    let outcome = run(&config(&profile, &payload)).unwrap();
    assert_eq!(outcome.exit_code(), 1);
    assert_matches!(outcome, RunOutcome::Violated(err) if err.index == 2 && err.cause.is_none());
}

/// A rule that cannot be evaluated carries its `MissingKey` cause.
#[test]
fn unevaluable_rule_is_a_violation_with_cause() {
    let dir = TempDir::new().unwrap();
    let profile = write(&dir, "profile.yaml", PROFILE_YAML);
    let payload = write(&dir, "payload.json", r#"{"domain_definition": {"nx": 5, "min_z": 10}}"#);

    let outcome = run(&config(&profile, &payload)).unwrap();
    assert_matches!(
        outcome,
        RunOutcome::Violated(err)
            if err.index == 1
                && matches!(
                    err.cause.as_ref().map(|c| &c.source),
                    Some(ExpressionError::MissingKey { path }) if path == "domain_definition.max_z"
                )
    );
}

/// Forcing strict mode makes the relaxed numeric-string rule unevaluable.
#[test]
fn mode_override_applies_to_every_rule() {
    let dir = TempDir::new().unwrap();
    let profile = write(&dir, "profile.yaml", PROFILE_YAML);
    let payload = write(
        &dir,
        "payload.json",
        r#"{"domain_definition": {"nx": 5, "min_z": 0, "max_z": 10}, "values": {"height": "50.0"}}"#,
    );

    let mut strict = config(&profile, &payload);
    strict.engine = strict.engine.with_mode_override(ComparisonMode::Strict);
    assert_matches!(
        run(&strict).unwrap(),
        RunOutcome::Violated(err) if err.index == 2 && err.is_evaluation_failure()
    );
}

/// A missing payload file fails the run before enforcement.
#[test]
fn load_failure_is_a_run_error() {
    let dir = TempDir::new().unwrap();
    let profile = write(&dir, "profile.yaml", PROFILE_YAML);
    let payload = dir.path().join("missing.json");
    assert!(run(&config(&profile, &payload)).is_err());
}
