//! Extracts a repository URI and commit digest from an in-toto provenance
//! payload.
//!
//! Extraction runs against the raw predicate JSON rather than a fully typed
//! struct per SLSA dialect: the schemas genuinely vary release to release,
//! and the Witness collection format is a different shape entirely.

use serde_json::Value as Json;

use crate::config::AnalyzerConfig;
use crate::error::ProvenanceError;

/// Predicate type URIs this extractor recognizes.
pub const SLSA_V01_PREDICATE_TYPE: &str = "https://slsa.dev/provenance/v0.1";
pub const SLSA_V02_PREDICATE_TYPE: &str = "https://slsa.dev/provenance/v0.2";
pub const SLSA_V1_PREDICATE_TYPE: &str = "https://slsa.dev/provenance/v1";
pub const WITNESS_V01_PREDICATE_TYPE: &str = "https://witness.testifysec.com/attestation-collection/v0.1";

/// Strips the `git+` scheme prefix and a trailing `@<ref>` SPDX-style
/// download-location suffix from a repository URI, e.g.
/// `git+https://github.com/org/repo@deadbeef` -> `https://github.com/org/repo`.
pub fn clean_spdx(uri: &str) -> String {
    let without_git_plus = uri.strip_prefix("git+").unwrap_or(uri);
    match without_git_plus.rsplit_once('@') {
        Some((repo, _commit)) if repo.contains("://") => repo.to_string(),
        _ => without_git_plus.to_string(),
    }
}

/// Returns the first digest value found in `digest_set` (a JSON object
/// mapping algorithm name to digest string) among `allowed_algorithms`, in
/// allowlist order.
fn extract_commit_from_digest_set(digest_set: &Json, allowed_algorithms: &[String]) -> Option<String> {
    let obj = digest_set.as_object()?;
    for algo in allowed_algorithms {
        if let Some(Json::String(digest)) = obj.get(algo) {
            return Some(digest.clone());
        }
    }
    None
}

/// The recovered (repository URI, commit digest) pair. Either half may be
/// missing if the provenance did not carry it, which the caller (the
/// build-as-code check) treats as a provenance/commit mismatch rather
/// than a hard error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoAndCommit {
    pub repository: Option<String>,
    pub commit: Option<String>,
}

/// SLSA v1 `buildType` dialects with a repo-extraction rule of their own.
/// Every other `buildType` falls through to the
/// `resolvedDependencies` scan.
const GCB_BUILD_TYPE: &str = "https://slsa-framework.github.io/gcb-buildtypes/triggered-build/v1";
const GHA_WORKFLOW_BUILD_TYPE: &str = "https://slsa-framework.github.io/github-actions-buildtypes/workflow/v1";
const GHA_WORKFLOW_BUILD_TYPE_ALT: &str = "https://actions.github.io/buildtypes/workflow/v1";
const OCI_MACARON_BUILD_TYPE: &str =
    "https://github.com/oracle/macaron/tree/main/src/macaron/resources/provenance-buildtypes/oci/v1";

pub(crate) fn json_str<'a>(root: &'a Json, path: &[&str]) -> Option<&'a str> {
    let mut current = root;
    for key in path {
        current = current.get(key)?;
    }
    current.as_str()
}

/// Dispatches on `buildDefinition.buildType` to recover the repository URL,
/// then separately recovers the commit: the OCI/Macaron dialect reads it
/// from `internalParameters.buildEnvVar.BLD_COMMIT_HASH`, every other
/// dialect scans `resolvedDependencies` for the entry whose cleaned URI
/// matches the recovered repo (or, if no repo was recovered, the first
/// entry carrying a usable digest) and takes its digest.
fn extract_from_slsa_v1(predicate: &Json, config: &AnalyzerConfig) -> RepoAndCommit {
    let mut result = RepoAndCommit::default();
    let Some(build_def) = predicate.get("buildDefinition") else {
        return result;
    };
    let Some(build_type) = build_def.get("buildType").and_then(Json::as_str) else {
        return result;
    };

    result.repository = match build_type {
        GCB_BUILD_TYPE => json_str(build_def, &["externalParameters", "sourceToBuild", "repository"])
            .or_else(|| json_str(build_def, &["externalParameters", "configSource", "repository"]))
            .map(str::to_string),
        GHA_WORKFLOW_BUILD_TYPE | GHA_WORKFLOW_BUILD_TYPE_ALT => {
            json_str(build_def, &["externalParameters", "workflow", "repository"]).map(str::to_string)
        }
        OCI_MACARON_BUILD_TYPE => json_str(build_def, &["externalParameters", "source"]).map(str::to_string),
        _ => None,
    };

    if build_type == OCI_MACARON_BUILD_TYPE {
        result.commit = json_str(build_def, &["internalParameters", "buildEnvVar", "BLD_COMMIT_HASH"])
            .map(str::to_string);
        return result;
    }

    if let Some(deps) = build_def.get("resolvedDependencies").and_then(Json::as_array) {
        for dep in deps {
            let Some(uri) = dep.get("uri").and_then(Json::as_str) else {
                continue;
            };
            let cleaned = clean_spdx(uri);
            let matches_repo = match &result.repository {
                Some(repo) => &cleaned == repo,
                // No buildType-specific repo was recovered: any resolved
                // dependency carrying a digest is our best remaining lead.
                None => true,
            };
            if !matches_repo {
                continue;
            }
            if let Some(digest) = dep.get("digest") {
                if let Some(commit) = extract_commit_from_digest_set(digest, &config.digest_algorithms.v1) {
                    result.commit = Some(commit);
                    break;
                }
            }
        }
    }

    result
}

/// The repository URL and commit both live under a single
/// `invocation.configSource` object.
fn extract_from_slsa_v02(predicate: &Json, config: &AnalyzerConfig) -> RepoAndCommit {
    let mut result = RepoAndCommit::default();
    let Some(config_source) = predicate.get("invocation").and_then(|i| i.get("configSource")) else {
        return result;
    };
    if let Some(uri) = config_source.get("uri").and_then(Json::as_str) {
        result.repository = Some(clean_spdx(uri));
    }
    if let Some(digest) = config_source.get("digest") {
        result.commit = extract_commit_from_digest_set(digest, &config.digest_algorithms.v02);
    }
    result
}

/// `recipe.definedInMaterial` names the index into `materials` that holds
/// the source repo + commit; an out-of-range or missing index yields a
/// fully empty result rather than guessing at another entry.
fn extract_from_slsa_v01(predicate: &Json, config: &AnalyzerConfig) -> RepoAndCommit {
    let mut result = RepoAndCommit::default();
    let Some(index) = predicate
        .get("recipe")
        .and_then(|r| r.get("definedInMaterial"))
        .and_then(Json::as_u64)
    else {
        return result;
    };
    let Some(material) = predicate
        .get("materials")
        .and_then(Json::as_array)
        .and_then(|materials| materials.get(index as usize))
    else {
        return result;
    };
    if let Some(uri) = material.get("uri").and_then(Json::as_str) {
        result.repository = Some(clean_spdx(uri));
    }
    if let Some(digest) = material.get("digest") {
        result.commit = extract_commit_from_digest_set(digest, &config.digest_algorithms.v01);
    }
    result
}

const WITNESS_GIT_ATTESTATION_PREFIX: &str = "https://witness.dev/attestations/git/";
const WITNESS_GITHUB_ATTESTATION_PREFIX: &str = "https://witness.dev/attestations/github/";
const WITNESS_GITLAB_ATTESTATION_PREFIX: &str = "https://witness.dev/attestations/gitlab/";

/// The commit comes from the `git` attestation's `commithash`; the
/// repository comes from whichever `github`/`gitlab` attestation is present
/// (its `projecturl`) — two different entries in the same list.
fn extract_from_witness(predicate: &Json, _config: &AnalyzerConfig) -> RepoAndCommit {
    let mut result = RepoAndCommit::default();
    let Some(attestations) = predicate.get("attestations").and_then(Json::as_array) else {
        return result;
    };
    for entry in attestations {
        let Some(entry_type) = entry.get("type").and_then(Json::as_str) else {
            continue;
        };
        if entry_type.starts_with(WITNESS_GIT_ATTESTATION_PREFIX) {
            if let Some(commit) = json_str(entry, &["attestation", "commithash"]) {
                result.commit = Some(commit.to_string());
            }
        } else if entry_type.starts_with(WITNESS_GITHUB_ATTESTATION_PREFIX)
            || entry_type.starts_with(WITNESS_GITLAB_ATTESTATION_PREFIX)
        {
            if let Some(project_url) = json_str(entry, &["attestation", "projecturl"]) {
                result.repository = Some(project_url.to_string());
            }
        }
    }
    result
}

/// Dispatches to the dialect-specific extractor named by `predicate_type`.
pub fn extract_repo_and_commit(
    predicate_type: &str,
    predicate: &Json,
    config: &AnalyzerConfig,
) -> Result<RepoAndCommit, ProvenanceError> {
    let result = match predicate_type {
        SLSA_V1_PREDICATE_TYPE => extract_from_slsa_v1(predicate, config),
        SLSA_V02_PREDICATE_TYPE => extract_from_slsa_v02(predicate, config),
        SLSA_V01_PREDICATE_TYPE => extract_from_slsa_v01(predicate, config),
        WITNESS_V01_PREDICATE_TYPE => extract_from_witness(predicate, config),
        _ => return Err(ProvenanceError::UnknownPredicateVersion),
    };
    // Partial extraction is allowed: either the repository or the commit
    // may be missing from the provenance. The caller (the build-as-code
    // check) is responsible for treating an absent value as a mismatch,
    // not this function.
    Ok(result)
}

/// True if `input_repo` (resolved independently, e.g. from a package
/// registry) conflicts with the repository named in the provenance —
/// i.e. both are present and do not match after normalization.
pub fn check_input_repo_provenance_conflict(input_repo: &str, provenance_repo: &str) -> bool {
    normalize_repo_url(input_repo) != normalize_repo_url(provenance_repo)
}

fn normalize_repo_url(url: &str) -> String {
    url.trim_end_matches('/').trim_end_matches(".git").to_lowercase()
}
