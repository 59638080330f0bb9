//! Typed error taxonomy for the analysis engines.
//!
//! Each subsystem gets its own `thiserror` enum; [`AnalyzerError`] composes
//! them behind `#[from]` so library code can propagate with `?` while the
//! CLI boundary (see `src/bin/bin.rs`) still reports with `anyhow`.

use thiserror::Error;

/// Errors raised while loading or validating [`crate::config::AnalyzerConfig`].
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("configuration already initialized")]
    AlreadyInitialized,
}

/// Errors raised while parsing debug s-expressions.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParseError {
    #[error("unexpected end of input while parsing {0}")]
    UnexpectedEof(&'static str),
    #[error("expected {expected:?} at byte {pos}, found {found:?}")]
    Expected {
        expected: String,
        found: String,
        pos: usize,
    },
    #[error("unknown constructor {0:?}")]
    UnknownConstructor(String),
    #[error("location specifiers cannot round-trip through the s-expression grammar: {0}")]
    LocationNotSerializable(&'static str),
}

/// Errors raised while parsing a CI workflow or Bash script into a dataflow
/// forest.
#[derive(Debug, Error)]
pub enum CiParseError {
    #[error("failed to parse workflow YAML: {0}")]
    Workflow(#[from] serde_yaml::Error),
    #[error("unsupported or malformed Bash construct: {0}")]
    UnsupportedBash(String),
}

/// Errors raised by the dataflow fixpoint engine.
#[derive(Debug, Error)]
pub enum CallGraphError {
    #[error("cycle detected while building control-flow graph")]
    Cycle,
    #[error("node {0} has no parent mapping")]
    MissingParent(String),
    #[error("analysis did not converge within {0} iterations")]
    DidNotConverge(usize),
}

/// Errors raised while extracting repo/commit facts from a provenance payload.
#[derive(Debug, Error)]
pub enum ProvenanceError {
    #[error("unsupported or missing buildType: {0:?}")]
    UnsupportedBuildType(Option<String>),
    #[error("no repository URI found in provenance")]
    NoRepositoryFound,
    #[error("no commit digest found in provenance")]
    NoCommitFound,
    #[error("unrecognized SLSA predicate version")]
    UnknownPredicateVersion,
}

/// Errors raised while validating an in-toto envelope.
#[derive(Debug, Error)]
pub enum ValidateInTotoPayloadError {
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected _type: {0:?}")]
    UnexpectedStatementType(String),
    #[error("unexpected predicateType: {0:?}")]
    UnexpectedPredicateType(String),
}

/// Errors raised while resolving a PURL to a repository.
#[derive(Debug, Error)]
pub enum InvalidPurlError {
    #[error("failed to parse purl {0:?}: {1}")]
    Parse(String, String),
    #[error("unsupported package type: {0}")]
    UnsupportedPackageType(String),
}

/// Errors raised by the check registry / scheduler.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("check id {0:?} does not match the required mcn_<name>_<digits> shape")]
    InvalidIdFormat(String),
    #[error("check {0:?} is already registered")]
    DuplicateCheck(String),
    #[error("check {0:?} declares a parent/child that is not registered: {1:?}")]
    UnknownRelationship(String, String),
    #[error("cycle detected in check dependency graph")]
    Cycle,
}

/// Errors surfaced by (out-of-scope, trait-only) external collaborators.
#[derive(Debug, Error)]
pub enum APIAccessError {
    #[error("request to {0} failed: {1}")]
    RequestFailed(String, String),
    #[error("rate limited, retry after {0:?} seconds")]
    RateLimited(Option<u64>),
}

/// Errors surfaced by (out-of-scope) clone/checkout collaborators.
#[derive(Debug, Error)]
pub enum CloneError {
    #[error("failed to clone {url}: {reason}")]
    Clone { url: String, reason: String },
}

#[derive(Debug, Error)]
pub enum RepoCheckOutError {
    #[error("failed to check out {reference} in {path}: {reason}")]
    CheckOut {
        reference: String,
        path: String,
        reason: String,
    },
}

/// Errors raised by malware/metadata heuristic checks when
/// they are handed a value outside their expected domain.
#[derive(Debug, Error)]
pub enum HeuristicAnalyzerValueError {
    #[error("expected field {0:?} to be present")]
    MissingField(&'static str),
    #[error("field {0:?} had an unexpected shape: {1}")]
    UnexpectedShape(&'static str, String),
}

/// The crate-wide error type. Subsystem errors compose into this via `#[from]`
/// so that library functions can return `crate::error::Result<T>`.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    CiParse(#[from] CiParseError),
    #[error(transparent)]
    CallGraph(#[from] CallGraphError),
    #[error(transparent)]
    Provenance(#[from] ProvenanceError),
    #[error(transparent)]
    ValidateInTotoPayload(#[from] ValidateInTotoPayloadError),
    #[error(transparent)]
    InvalidPurl(#[from] InvalidPurlError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    APIAccess(#[from] APIAccessError),
    #[error(transparent)]
    Clone(#[from] CloneError),
    #[error(transparent)]
    RepoCheckOut(#[from] RepoCheckOutError),
    #[error(transparent)]
    HeuristicAnalyzerValue(#[from] HeuristicAnalyzerValueError),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
