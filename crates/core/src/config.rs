//! Comparison modes and engine configuration.
//!
//! Configuration is an explicit, immutable value threaded through every
//! call; the engine reads no process-wide state.

use crate::error::ProfileConfigError;

// ---------------------------------------------------------------------------
// ComparisonMode
// ---------------------------------------------------------------------------

/// Comparability policy applied before an operator runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ComparisonMode {
    /// Both operands must carry the same variant.
    #[default]
    Strict,
    /// Operands pass through the coercion lattice first.
    Relaxed,
}

impl ComparisonMode {
    /// Return the wire-format string for this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Relaxed => "relaxed",
        }
    }

    /// Parse from a wire-format string.
    pub fn from_str(s: &str) -> Result<Self, ProfileConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "relaxed" => Ok(Self::Relaxed),
            _ => Err(ProfileConfigError::InvalidMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ModeSpec
// ---------------------------------------------------------------------------

/// A rule's own mode setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModeSpec {
    Strict,
    Relaxed,
    /// Defer to the caller-supplied default.
    #[default]
    Unspecified,
}

impl ModeSpec {
    /// Resolve against a fallback mode.
    pub fn or(self, default_mode: ComparisonMode) -> ComparisonMode {
        match self {
            Self::Strict => ComparisonMode::Strict,
            Self::Relaxed => ComparisonMode::Relaxed,
            Self::Unspecified => default_mode,
        }
    }
}

impl From<ComparisonMode> for ModeSpec {
    fn from(mode: ComparisonMode) -> Self {
        match mode {
            ComparisonMode::Strict => Self::Strict,
            ComparisonMode::Relaxed => Self::Relaxed,
        }
    }
}

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Engine-wide settings for rule evaluation.
///
/// Mode precedence when evaluating a rule is
/// `mode_override` > the rule's [`ModeSpec`] > `default_mode`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Mode for rules that do not specify one (default: strict).
    pub default_mode: ComparisonMode,
    /// Caller-forced mode that beats every rule's own setting.
    pub mode_override: Option<ComparisonMode>,
    /// Emit per-step resolution and coercion traces.
    pub debug: bool,
}

impl EngineConfig {
    pub fn with_default_mode(mut self, mode: ComparisonMode) -> Self {
        self.default_mode = mode;
        self
    }

    pub fn with_mode_override(mut self, mode: ComparisonMode) -> Self {
        self.mode_override = Some(mode);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Effective mode for a rule carrying `mode_spec`.
    pub fn effective_mode(&self, mode_spec: ModeSpec) -> ComparisonMode {
        self.mode_override
            .unwrap_or_else(|| mode_spec.or(self.default_mode))
    }
}
