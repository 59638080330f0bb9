//! Build-definition dialects: recover a human-readable build entry point
//! (e.g. workflow path) and an invocation URL/id from a provenance
//! predicate, keyed by `buildType`.

use serde_json::Value as Json;

use super::extractor::{clean_spdx, json_str};

/// `(entry_point, invocation_url)`. Either half may be absent.
pub type BuildInvocation = (Option<String>, Option<String>);

/// Dispatches on `buildType`/`predicate_type` to the matching dialect.
/// The `gcb` and `oci` dialects intentionally return `(None, None)` for
/// every input, mirroring the upstream extractor's own unfinished methods
/// rather than inventing a shape that has never been observed.
pub fn get_build_invocation(build_type: &str, predicate: &Json) -> BuildInvocation {
    match build_type {
        "https://github.com/slsa-framework/slsa-github-generator/generic@v1" => {
            github_generic_v01(predicate)
        }
        "https://slsa-framework.github.io/github-actions-buildtypes/workflow/v1" => {
            github_actions_v1(predicate)
        }
        "https://github.com/npm/cli/gha/v2" => npm_cli_v2(predicate),
        "https://witness.testifysec.com/attestation-collection/v0.1" => witness_gitlab_v01(predicate),
        "https://slsa-framework.github.io/gcb-buildtypes/triggered-build/v1" => (None, None),
        "https://github.com/oracle/macaron/tree/main/src/macaron/resources/provenance-buildtypes/oci/v1" => {
            (None, None)
        }
        _ => (None, None),
    }
}

fn github_generic_v01(predicate: &Json) -> BuildInvocation {
    let workflow = json_str(predicate, &["invocation", "configSource", "entryPoint"]).map(str::to_string);
    let run_id = json_str(predicate, &["invocation", "environment", "github_run_id"]);
    let repo_uri = json_str(predicate, &["invocation", "configSource", "uri"]);
    let repo = repo_uri.map(clean_spdx);
    match (repo, run_id) {
        (Some(repo), Some(run_id)) => (workflow, Some(format!("{repo}/actions/runs/{run_id}"))),
        (Some(repo), None) => (workflow, Some(repo)),
        _ => (workflow, None),
    }
}

fn github_actions_v1(predicate: &Json) -> BuildInvocation {
    let workflow = json_str(
        predicate,
        &["buildDefinition", "externalParameters", "workflow", "path"],
    )
    .map(str::to_string);
    let invocation_id =
        json_str(predicate, &["runDetails", "metadata", "invocationId"]).map(str::to_string);
    (workflow, invocation_id)
}

fn npm_cli_v2(predicate: &Json) -> BuildInvocation {
    let workflow = json_str(predicate, &["invocation", "configSource", "entryPoint"]).map(str::to_string);
    let run_id = json_str(predicate, &["invocation", "environment", "GITHUB_RUN_ID"]);
    let repo_uri = json_str(predicate, &["invocation", "configSource", "uri"]);
    let repo = repo_uri.map(clean_spdx);
    match (repo, run_id) {
        (Some(repo), Some(run_id)) => (workflow, Some(format!("{repo}/actions/runs/{run_id}"))),
        (Some(repo), None) => (workflow, Some(repo)),
        _ => (workflow, None),
    }
}

const WITNESS_GITLAB_ATTESTATION_TYPE: &str = "https://witness.dev/attestations/gitlab/v0.1";

/// A Witness collection's `attestations` field is a list of `{type,
/// attestation}` entries, not a single object — this dialect has to scan it
/// for the GitLab entry rather than indexing straight to `attestation`.
fn witness_gitlab_v01(predicate: &Json) -> BuildInvocation {
    let Some(attestations) = predicate.get("attestations").and_then(Json::as_array) else {
        return (None, None);
    };
    let Some(entry) = attestations
        .iter()
        .find(|a| json_str(a, &["type"]) == Some(WITNESS_GITLAB_ATTESTATION_TYPE))
    else {
        return (None, None);
    };
    let entry_point = json_str(entry, &["attestation", "ciconfigpath"]).map(str::to_string);
    let invocation_url = json_str(entry, &["attestation", "joburl"]).map(str::to_string);
    (entry_point, invocation_url)
}
