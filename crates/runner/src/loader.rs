//! Profile and payload document loading.
//!
//! Documents are JSON (`.json`) or YAML (`.yaml` / `.yml`) and are always
//! handed to the engine as `serde_json::Value`.

use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;

use rulecheck_core::{Profile, ProfileConfigError};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid YAML in '{}': {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unsupported document extension for '{}': expected .json, .yaml or .yml", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Invalid profile '{}': {source}", path.display())]
    Profile {
        path: PathBuf,
        #[source]
        source: ProfileConfigError,
    },
}

// ---------------------------------------------------------------------------
// DocumentFormat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Parse document text in this format.
    pub fn parse(self, text: &str, path: &Path) -> Result<JsonValue, LoadError> {
        match self {
            Self::Json => serde_json::from_str(text).map_err(|source| LoadError::Json {
                path: path.to_path_buf(),
                source,
            }),
            Self::Yaml => serde_yaml::from_str(text).map_err(|source| LoadError::Yaml {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Read and parse a JSON or YAML document.
pub fn load_document(path: &Path) -> Result<JsonValue, LoadError> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), ?format, "Loaded document");
    format.parse(&text, path)
}

/// Load a rule profile document and build its rules.
pub fn load_profile(path: &Path) -> Result<Profile, LoadError> {
    let document = load_document(path)?;
    let profile = Profile::from_document(&document).map_err(|source| LoadError::Profile {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), rule_count = profile.len(), "Loaded rule profile");
    Ok(profile)
}

/// Load the payload a profile is enforced against.
pub fn load_payload(path: &Path) -> Result<JsonValue, LoadError> {
    load_document(path)
}
