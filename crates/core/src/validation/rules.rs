//! Rule and profile types, and their construction from loaded documents.

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::config::{ComparisonMode, EngineConfig, ModeSpec};
use crate::error::{ProfileConfigError, ValidationProfileError};

use super::enforcer::enforce_profile_with;

/// Key holding the rule list in a profile document.
pub const RULES_KEY: &str = "rules";

/// Message used when a record has no `raise` entry.
pub fn default_message(index: usize) -> String {
    format!("Validation rule {index} failed")
}

// ---------------------------------------------------------------------------
// RuleRecord
// ---------------------------------------------------------------------------

/// A rule exactly as it appears in a profile document.
///
/// `if` is kept as raw JSON so a non-string condition can be treated as
/// absent rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RuleRecord {
    #[serde(rename = "if", default)]
    pub condition: Option<JsonValue>,
    #[serde(rename = "raise", default)]
    pub message: Option<String>,
    #[serde(default)]
    pub type_check_mode: Option<String>,
    /// Legacy flag; wins over `type_check_mode` when present.
    #[serde(default)]
    pub strict_type_check: Option<bool>,
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// One declarative clause: a failure condition and the message to raise
/// when it fires.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// `None` means the rule never fires.
    pub condition: Option<String>,
    pub message: String,
    pub mode: ModeSpec,
}

impl Rule {
    pub fn new(condition: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            condition: Some(condition.into()),
            message: message.into(),
            mode: ModeSpec::Unspecified,
        }
    }

    /// A rule with no condition.
    pub fn inactive(message: impl Into<String>) -> Self {
        Self {
            condition: None,
            message: message.into(),
            mode: ModeSpec::Unspecified,
        }
    }

    pub fn with_mode(mut self, mode: ComparisonMode) -> Self {
        self.mode = mode.into();
        self
    }

    /// Whether the rule has a condition to evaluate.
    pub fn is_active(&self) -> bool {
        self.condition.is_some()
    }

    /// Build a rule from its record, applying defaults for position `index`.
    pub fn from_record(index: usize, record: RuleRecord) -> Result<Self, ProfileConfigError> {
        let condition = record
            .condition
            .as_ref()
            .and_then(JsonValue::as_str)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let mode = match (record.strict_type_check, record.type_check_mode.as_deref()) {
            (Some(true), _) => ModeSpec::Strict,
            (Some(false), _) => ModeSpec::Relaxed,
            (None, Some(mode)) => ComparisonMode::from_str(mode)?.into(),
            (None, None) => ModeSpec::Unspecified,
        };

        Ok(Self {
            condition,
            message: record.message.unwrap_or_else(|| default_message(index)),
            mode,
        })
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// An ordered set of rules evaluated against one payload per pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    rules: Vec<Rule>,
}

impl Profile {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Build a profile from a loaded document.
    ///
    /// Accepts either a mapping with a `rules` list or a bare list. A
    /// mapping without `rules` is an empty profile.
    pub fn from_document(document: &JsonValue) -> Result<Self, ProfileConfigError> {
        match document {
            JsonValue::Object(map) => match map.get(RULES_KEY) {
                None | Some(JsonValue::Null) => Ok(Self::default()),
                Some(JsonValue::Array(records)) => Self::from_records(records),
                Some(_) => Err(ProfileConfigError::RulesNotAList),
            },
            JsonValue::Array(records) => Self::from_records(records),
            _ => Err(ProfileConfigError::RulesNotAList),
        }
    }

    /// Build a profile from raw rule records, preserving their order.
    pub fn from_records(records: &[JsonValue]) -> Result<Self, ProfileConfigError> {
        records
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                if !raw.is_object() {
                    return Err(ProfileConfigError::InvalidRecord {
                        index,
                        reason: "expected a mapping".to_string(),
                    });
                }
                let record: RuleRecord = serde_json::from_value(raw.clone()).map_err(|e| {
                    ProfileConfigError::InvalidRecord {
                        index,
                        reason: e.to_string(),
                    }
                })?;
                Rule::from_record(index, record)
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Enforce every rule against `payload`, stopping at the first one that
    /// fires or cannot be evaluated.
    pub fn enforce(&self, payload: &JsonValue, config: &EngineConfig) -> Result<(), ValidationProfileError> {
        enforce_profile_with(&self.rules, payload, config)
    }
}

impl From<Vec<Rule>> for Profile {
    fn from(rules: Vec<Rule>) -> Self {
        Self::new(rules)
    }
}
