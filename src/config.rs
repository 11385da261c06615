//! Configuration file schema for swallowcheck.
//!
//! Configuration is optional; every field has a default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::engine::Severity;
use crate::frontend;

/// Default config file names to search for.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["swallowcheck.yaml", ".swallowcheck.yaml"];

/// Default config written by `swallowcheck init`.
pub const DEFAULT_CONFIG: &str = r#"# swallowcheck configuration
version: "1"

# Severity attached to every exception hiding diagnostic: error, warning, info
severity: warning

# Minimum severity that makes `swallowcheck lint` exit non-zero
fail_on: warning

# Analyze test sources too
include_test_files: true

# Glob patterns for paths to skip
excluded_paths:
  - "**/generated/**"

# Restrict analysis to these languages (empty means all):
# cpp, java, javascript, python, tsx, typescript
languages: []
"#;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid excluded_paths pattern {pattern:?}: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("unknown language {0:?}, expected one of: {}", frontend::LANGUAGES.join(", "))]
    UnknownLanguage(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub version: String,
    /// Severity for reported diagnostics (default: warning)
    #[serde(default)]
    pub severity: Option<Severity>,
    /// Minimum severity that fails the run (default: warning)
    #[serde(default)]
    pub fail_on: Option<Severity>,
    /// Whether to include test files in analysis (default: true)
    #[serde(default)]
    pub include_test_files: Option<bool>,
    /// Glob patterns for paths to exclude from analysis (e.g., "**/vendor/**")
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    /// Language identifiers to analyze; empty means all
    #[serde(default)]
    pub languages: Vec<String>,
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Severity for diagnostics.
    pub fn severity(&self) -> Severity {
        self.severity.unwrap_or_default()
    }

    /// Minimum severity that fails the run.
    pub fn fail_on(&self) -> Severity {
        self.fail_on.unwrap_or(Severity::Warning)
    }

    /// Returns whether to include test files (defaults to true).
    pub fn should_include_test_files(&self) -> bool {
        self.include_test_files.unwrap_or(true)
    }

    /// Whether a language is selected for analysis.
    pub fn is_language_enabled(&self, language_id: &str) -> bool {
        self.languages.is_empty() || self.languages.iter().any(|l| l == language_id)
    }

    /// Check if a path should be excluded based on excluded_paths patterns.
    /// Uses globset for matching, which supports `**` for recursive directory matching.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();

        for pattern in &self.excluded_paths {
            if let Ok(glob) = globset::Glob::new(pattern) {
                let matcher = glob.compile_matcher();
                if matcher.is_match(&*path_str) {
                    return true;
                }
            }
        }
        false
    }
}

/// Validate a config for correctness.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    for pattern in &config.excluded_paths {
        globset::Glob::new(pattern).map_err(|source| ConfigError::InvalidGlob {
            pattern: pattern.clone(),
            source,
        })?;
    }

    for language in &config.languages {
        if !frontend::LANGUAGES.contains(&language.as_str()) {
            return Err(ConfigError::UnknownLanguage(language.clone()));
        }
    }

    Ok(())
}

/// Find a config file in `dir`, if any.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}
