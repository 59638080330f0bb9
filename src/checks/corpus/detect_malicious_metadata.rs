//! `mcn_detect_malicious_metadata_1`: heuristic analysis of a PyPI
//! package's own published metadata for signs it is deliberately
//! deceptive, plus a direct OSV lookup for packages that have already
//! disappeared from the registry.
//!
//! Each heuristic contributes a pass/fail result; confidence is scored by
//! *how many* heuristics failed rather than by a fixed table of specific
//! combinations (see DESIGN.md for why).

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as Json;

use crate::error::APIAccessError;
use crate::registry_access::Osv;

use super::super::confidence;
use super::super::facts::{CheckFact, CheckResult, CheckResultType};

pub const CHECK_ID: &str = "mcn_detect_malicious_metadata_1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HeuristicResult {
    Pass,
    Fail,
    Skip,
    Unknown,
}

/// One published release, as needed by the frequency/unchanged-size/
/// join-date heuristics.
#[derive(Debug, Clone)]
pub struct ReleaseInfo {
    pub version: String,
    pub uploaded_at: DateTime<Utc>,
    pub size_bytes: u64,
}

/// Already-fetched PyPI package metadata. Malware heuristics here work over
/// already-fetched JSON — the actual PyPI API call is an external
/// collaborator; this type is its result.
#[derive(Debug, Clone)]
pub struct PyPiPackageMetadata {
    pub project_urls: std::collections::HashMap<String, String>,
    pub releases: Vec<ReleaseInfo>,
    pub account_created_at: Option<DateTime<Utc>>,
    pub has_wheel: bool,
    pub setup_py_source: Option<String>,
    pub version: String,
}

const KNOWN_VCS_HOSTS: &[&str] = &["github.com", "gitlab.com", "bitbucket.org", "sourceforge.net"];
const PLACEHOLDER_VALUES: &[&str] = &["", "unknown", "n/a", "none", "todo"];
const SUSPICIOUS_SETUP_PATTERNS: &[&str] =
    &["os.system(", "subprocess.", "eval(", "exec(", "base64.b64decode", "urllib.request.urlopen", "socket.socket("];

fn empty_project_link(meta: &PyPiPackageMetadata) -> (HeuristicResult, Option<String>) {
    let has_real_link = meta
        .project_urls
        .values()
        .any(|v| !PLACEHOLDER_VALUES.contains(&v.trim().to_lowercase().as_str()));
    if has_real_link {
        (HeuristicResult::Pass, None)
    } else {
        (HeuristicResult::Fail, Some("no project URLs published".to_string()))
    }
}

fn source_code_repo(meta: &PyPiPackageMetadata, empty_links: HeuristicResult) -> (HeuristicResult, Option<String>) {
    if empty_links != HeuristicResult::Pass {
        return (HeuristicResult::Skip, None);
    }
    let has_vcs_link = meta
        .project_urls
        .values()
        .any(|url| KNOWN_VCS_HOSTS.iter().any(|host| url.contains(host)));
    if has_vcs_link {
        (HeuristicResult::Pass, None)
    } else {
        (HeuristicResult::Fail, Some("no recognizable source repository link".to_string()))
    }
}

fn one_release(meta: &PyPiPackageMetadata) -> (HeuristicResult, Option<String>) {
    if meta.releases.len() <= 1 {
        (HeuristicResult::Fail, Some("package has published only one release".to_string()))
    } else {
        (HeuristicResult::Pass, None)
    }
}

const HIGH_FREQUENCY_THRESHOLD_SECS: i64 = 3600;

fn high_release_frequency(meta: &PyPiPackageMetadata, one_release_result: HeuristicResult) -> (HeuristicResult, Option<String>) {
    if one_release_result != HeuristicResult::Pass {
        return (HeuristicResult::Skip, None);
    }
    let mut sorted = meta.releases.clone();
    sorted.sort_by_key(|r| r.uploaded_at);
    let intervals: Vec<i64> = sorted.windows(2).map(|w| (w[1].uploaded_at - w[0].uploaded_at).num_seconds()).collect();
    if intervals.iter().any(|&s| s < HIGH_FREQUENCY_THRESHOLD_SECS) {
        (HeuristicResult::Fail, Some("releases published less than an hour apart".to_string()))
    } else {
        (HeuristicResult::Pass, None)
    }
}

fn unchanged_release(meta: &PyPiPackageMetadata, one_release_result: HeuristicResult) -> (HeuristicResult, Option<String>) {
    if one_release_result != HeuristicResult::Pass {
        return (HeuristicResult::Skip, None);
    }
    let mut sorted = meta.releases.clone();
    sorted.sort_by_key(|r| r.uploaded_at);
    if sorted.windows(2).any(|w| w[0].size_bytes == w[1].size_bytes && w[0].size_bytes > 0) {
        (HeuristicResult::Fail, Some("consecutive releases have identical artifact size".to_string()))
    } else {
        (HeuristicResult::Pass, None)
    }
}

const CLOSER_JOIN_DATE_THRESHOLD_DAYS: i64 = 7;

fn closer_release_join_date(meta: &PyPiPackageMetadata) -> (HeuristicResult, Option<String>) {
    let Some(created_at) = meta.account_created_at else {
        return (HeuristicResult::Skip, None);
    };
    let Some(latest) = meta.releases.iter().map(|r| r.uploaded_at).max() else {
        return (HeuristicResult::Skip, None);
    };
    if (latest - created_at).num_days().abs() <= CLOSER_JOIN_DATE_THRESHOLD_DAYS {
        (HeuristicResult::Fail, Some("publisher account created shortly before this release".to_string()))
    } else {
        (HeuristicResult::Pass, None)
    }
}

fn suspicious_setup(meta: &PyPiPackageMetadata) -> (HeuristicResult, Option<String>) {
    let Some(source) = &meta.setup_py_source else {
        return (HeuristicResult::Skip, None);
    };
    match SUSPICIOUS_SETUP_PATTERNS.iter().find(|pat| source.contains(**pat)) {
        Some(pat) => (HeuristicResult::Fail, Some(format!("setup.py contains suspicious pattern {pat:?}"))),
        None => (HeuristicResult::Pass, None),
    }
}

fn wheel_absence(meta: &PyPiPackageMetadata) -> (HeuristicResult, Option<String>) {
    if meta.has_wheel {
        (HeuristicResult::Pass, None)
    } else {
        (HeuristicResult::Fail, Some("no wheel distribution published, only sdist".to_string()))
    }
}

fn anomalous_version(meta: &PyPiPackageMetadata) -> (HeuristicResult, Option<String>) {
    let looks_normal = meta
        .version
        .split(|c: char| c == '.' || c == '-' || c == '+')
        .take(3)
        .all(|segment| segment.chars().next().is_some_and(|c| c.is_ascii_digit()));
    if looks_normal {
        (HeuristicResult::Pass, None)
    } else {
        (HeuristicResult::Fail, Some(format!("version string {:?} does not look like a normal release", meta.version)))
    }
}

/// Runs all nine heuristics in the original's fixed order (needed so the
/// resulting tuple lines up the same way `SUSPICIOUS_COMBO` keys did),
/// returning `(name, result, detail)` triples plus the flattened detail map.
pub fn run_heuristics(meta: &PyPiPackageMetadata) -> Vec<(&'static str, HeuristicResult, Option<String>)> {
    let (empty_links, empty_links_detail) = empty_project_link(meta);
    let (source_repo, source_repo_detail) = source_code_repo(meta, empty_links);
    let (one_rel, one_rel_detail) = one_release(meta);
    let (high_freq, high_freq_detail) = high_release_frequency(meta, one_rel);
    let (unchanged, unchanged_detail) = unchanged_release(meta, one_rel);
    let (join_date, join_date_detail) = closer_release_join_date(meta);
    let (setup, setup_detail) = suspicious_setup(meta);
    let (wheel, wheel_detail) = wheel_absence(meta);
    let (version, version_detail) = anomalous_version(meta);

    vec![
        ("empty_project_link", empty_links, empty_links_detail),
        ("source_code_repo", source_repo, source_repo_detail),
        ("one_release", one_rel, one_rel_detail),
        ("high_release_frequency", high_freq, high_freq_detail),
        ("unchanged_release", unchanged, unchanged_detail),
        ("closer_release_join_date", join_date, join_date_detail),
        ("suspicious_setup", setup, setup_detail),
        ("wheel_absence", wheel, wheel_detail),
        ("anomalous_version", version, version_detail),
    ]
}

/// Scores a completed heuristic run: `Fail` count of 5 or more is treated as
/// `HIGH`-confidence malicious, 3-4 as `MEDIUM`, fewer as not suspicious
/// (see module-level note on why this replaces the original's exact
/// combination table).
fn score_heuristics(results: &[(&'static str, HeuristicResult, Option<String>)]) -> Option<f64> {
    let fail_count = results.iter().filter(|(_, r, _)| *r == HeuristicResult::Fail).count();
    match fail_count {
        0..=2 => None,
        3..=4 => Some(confidence::MEDIUM),
        _ => Some(confidence::HIGH),
    }
}

#[derive(Debug, Clone, Serialize)]
struct MaliciousMetadataFact {
    known_malware: Option<String>,
    result: std::collections::BTreeMap<String, HeuristicResult>,
    detail_information: std::collections::BTreeMap<String, String>,
}

fn check_result(result_type: CheckResultType, justification: String, fact: Option<(MaliciousMetadataFact, f64)>) -> CheckResult {
    CheckResult {
        check_id: CHECK_ID.to_string(),
        result_type,
        justification: vec![justification],
        facts: fact
            .map(|(f, confidence)| CheckFact { confidence, data: serde_json::to_value(f).unwrap_or(Json::Null) })
            .into_iter()
            .collect(),
    }
}

/// Runs the full check: if `package_exists_in_registry`
/// is false (the package has vanished — a strong signal it was pulled as
/// malware), query OSV directly for the purl and fail on any hit; otherwise
/// run the nine heuristics against `metadata` and score the combination.
pub fn run(
    purl: &str,
    package_exists_in_registry: bool,
    metadata: Option<&PyPiPackageMetadata>,
    osv: &dyn Osv,
) -> Result<CheckResult, APIAccessError> {
    if !package_exists_in_registry {
        let vulns = osv.query(purl)?;
        if let Some(vuln) = vulns.first() {
            let fact = MaliciousMetadataFact {
                known_malware: Some(format!("https://osv.dev/vulnerability/{}", vuln.id)),
                result: Default::default(),
                detail_information: Default::default(),
            };
            return Ok(check_result(
                CheckResultType::Failed,
                format!("package no longer present in registry and matches known malware advisory {}", vuln.id),
                Some((fact, confidence::HIGH)),
            ));
        }
        return Ok(check_result(
            CheckResultType::Unknown,
            "package no longer present in registry and no matching malware advisory found".to_string(),
            None,
        ));
    }

    let Some(metadata) = metadata else {
        return Ok(check_result(CheckResultType::Unknown, "no PyPI metadata available for heuristic analysis".to_string(), None));
    };

    let results = run_heuristics(metadata);
    let result_map: std::collections::BTreeMap<String, HeuristicResult> =
        results.iter().map(|(name, result, _)| (name.to_string(), *result)).collect();
    let detail_map: std::collections::BTreeMap<String, String> = results
        .iter()
        .filter_map(|(name, _, detail)| detail.clone().map(|d| (name.to_string(), d)))
        .collect();

    match score_heuristics(&results) {
        Some(confidence_value) => Ok(check_result(
            CheckResultType::Failed,
            "package metadata matches a suspicious heuristic combination".to_string(),
            Some((
                MaliciousMetadataFact { known_malware: None, result: result_map, detail_information: detail_map },
                confidence_value,
            )),
        )),
        None => Ok(check_result(
            CheckResultType::Passed,
            "package metadata shows no suspicious combination of heuristics".to_string(),
            Some((
                MaliciousMetadataFact { known_malware: None, result: result_map, detail_information: detail_map },
                confidence::HIGH,
            )),
        )),
    }
}
