//! Process-wide, read-only analyzer configuration.
//!
//! Loaded once from a TOML file (or [`AnalyzerConfig::default`]) and stashed
//! behind a [`OnceCell`]. Mirrors the "shared resources" note in the
//! concurrency model: everything here is read-only after [`init`] runs, so
//! handing a `&'static AnalyzerConfig` across analysis threads needs no lock.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigurationError, Result as AnalyzerResult};

static CONFIG: OnceCell<AnalyzerConfig> = OnceCell::new();

/// Git service hosts the resolver is willing to treat as a repository host.
fn default_git_services() -> Vec<String> {
    vec![
        "github.com".to_string(),
        "gitlab.com".to_string(),
        "bitbucket.org".to_string(),
    ]
}

/// Digest algorithms accepted when extracting a commit hash from a SLSA
/// `digestSet`, keyed by SLSA provenance predicate version.
fn default_digest_algorithms() -> DigestAlgorithms {
    DigestAlgorithms {
        v01: vec!["sha1".to_string()],
        v02: vec!["sha1".to_string()],
        v1: vec!["sha1".to_string(), "gitCommit".to_string()],
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DigestAlgorithms {
    #[serde(default)]
    pub v01: Vec<String>,
    #[serde(default)]
    pub v02: Vec<String>,
    #[serde(default)]
    pub v1: Vec<String>,
}

impl Default for DigestAlgorithms {
    fn default() -> Self {
        default_digest_algorithms()
    }
}

/// Top-level analyzer configuration.
///
/// All fields have defaults so an empty TOML file (or no file at all, via
/// [`AnalyzerConfig::default`]) is a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Hosts the repo resolver will accept as a VCS provider.
    pub git_services: Vec<String>,
    /// Per-SLSA-version digest algorithm allowlists used by the provenance extractor.
    pub digest_algorithms: DigestAlgorithms,
    /// Seconds to wait on any single outbound network call made by an external collaborator.
    pub request_timeout_secs: u64,
    /// `shell-glob` patterns selecting which checks run by default, evaluated by the check scheduler.
    pub check_include_patterns: Vec<String>,
    /// `shell-glob` patterns excluded even if matched by `check_include_patterns`.
    pub check_exclude_patterns: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            git_services: default_git_services(),
            digest_algorithms: default_digest_algorithms(),
            request_timeout_secs: 30,
            check_include_patterns: vec!["*".to_string()],
            check_exclude_patterns: vec![],
        }
    }
}

impl AnalyzerConfig {
    pub fn from_toml_str(contents: &str) -> AnalyzerResult<Self> {
        toml::from_str(contents).map_err(|e| ConfigurationError::Parse(e).into())
    }

    pub fn from_file(path: impl AsRef<Path>) -> AnalyzerResult<Self> {
        let path_ref = path.as_ref();
        let contents =
            std::fs::read_to_string(path_ref).map_err(|e| ConfigurationError::Read {
                path: path_ref.display().to_string(),
                source: e,
            })?;
        Self::from_toml_str(&contents)
    }
}

/// Initializes the process-wide configuration. Must be called at most once;
/// subsequent calls return [`ConfigurationError::AlreadyInitialized`].
pub fn init(config: AnalyzerConfig) -> AnalyzerResult<()> {
    CONFIG
        .set(config)
        .map_err(|_| ConfigurationError::AlreadyInitialized.into())
}

/// Returns the process-wide configuration, initializing it to
/// [`AnalyzerConfig::default`] on first access if `init` was never called.
pub fn get() -> &'static AnalyzerConfig {
    CONFIG.get_or_init(AnalyzerConfig::default)
}
