//! OSV vulnerability records and the version-range affectedness algorithm.
//!
//! Fetching a [`Vulnerability`] from the osv.dev API is external (see
//! [`super::Osv`]); everything in this module is pure, network-free logic
//! over already-fetched records, which is why it lives as free functions
//! rather than trait methods.

use serde::Deserialize;

use crate::error::APIAccessError;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AffectedPackage {
    pub ecosystem: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct RangeEvent {
    #[serde(default)]
    pub introduced: Option<String>,
    #[serde(default)]
    pub fixed: Option<String>,
    #[serde(default)]
    pub last_affected: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AffectedRange {
    #[serde(default)]
    pub events: Vec<RangeEvent>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Affected {
    pub package: AffectedPackage,
    #[serde(default, rename = "ranges")]
    pub ranges: Vec<AffectedRange>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Vulnerability {
    pub id: String,
    #[serde(default)]
    pub affected: Vec<Affected>,
}

/// Maps a repository's tags to the commit each points at, the data
/// `get_tags_via_git_remote` derives from `git ls-remote --tags`. Out of
/// scope to implement here (requires a git/VCS client); callers supply it.
pub trait TagCommitResolver {
    fn tag_commits(&self, repository_url: &str) -> Result<Vec<(String, String)>, APIAccessError>;
}

/// A version string that is itself a (partial) commit hash rather than a
/// release number, the case `is_version_affected` must resolve to a tag
/// before any version-range comparison is possible.
fn looks_like_commit_hash(s: &str) -> bool {
    (7..=40).contains(&s.len()) && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Finds the tag whose commit hash starts with `commit_hash`, mirroring the
/// original's prefix match against a shortened SHA.
pub fn resolve_commit_to_tag(
    resolver: &dyn TagCommitResolver,
    repository_url: &str,
    commit_hash: &str,
) -> Result<Option<String>, APIAccessError> {
    let tags = resolver.tag_commits(repository_url)?;
    Ok(tags
        .into_iter()
        .find(|(_, commit)| commit.starts_with(commit_hash))
        .map(|(tag, _)| tag))
}

/// Parses a loose, ecosystem-agnostic dotted-numeric version into comparable
/// segments (e.g. `"v1.2.3"` -> `[1, 2, 3]`). This is not a full PEP440/semver
/// parser — ecosystems vary too widely for one grammar to cover exactly, and
/// this crate pulls in no version-parsing crate for it — but dotted-numeric
/// comparison is sufficient for the overwhelming majority of OSV range
/// events, which are themselves dotted-numeric release numbers.
fn parse_loose_version(s: &str) -> Option<Vec<u64>> {
    let s = s.trim().trim_start_matches('v');
    if s.is_empty() {
        return None;
    }
    let mut parts = Vec::new();
    for segment in s.split(|c: char| c == '.' || c == '-' || c == '+') {
        let numeric: String = segment.chars().take_while(|c| c.is_ascii_digit()).collect();
        if numeric.is_empty() {
            break;
        }
        parts.push(numeric.parse::<u64>().ok()?);
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts)
    }
}

/// True if `pkg_version` of `pkg_name`/`ecosystem` falls within any affected
/// range of `vuln`: `version >= introduced` and (no `fixed`
/// event, or `version < fixed`). If `pkg_version` is a commit hash,
/// `source_repo` (repository URL plus a [`TagCommitResolver`]) is required
/// to resolve it to a tag first; without one (or if no tag resolves), this
/// returns [`APIAccessError`] rather than guessing, matching the original
/// raising `APIAccessError` on an unresolvable/unparseable version.
pub fn is_version_affected(
    vuln: &Vulnerability,
    pkg_name: &str,
    pkg_version: &str,
    ecosystem: &str,
    source_repo: Option<(&str, &dyn TagCommitResolver)>,
) -> Result<bool, APIAccessError> {
    let resolved_version = if looks_like_commit_hash(pkg_version) {
        let (repo_url, resolver) = source_repo.ok_or_else(|| {
            APIAccessError::RequestFailed(
                pkg_name.to_string(),
                "commit-hash version given without a source repository to resolve it".to_string(),
            )
        })?;
        resolve_commit_to_tag(resolver, repo_url, pkg_version)?.ok_or_else(|| {
            APIAccessError::RequestFailed(repo_url.to_string(), format!("no tag resolves to commit {pkg_version}"))
        })?
    } else {
        pkg_version.to_string()
    };

    let parsed_version = parse_loose_version(&resolved_version).ok_or_else(|| {
        APIAccessError::RequestFailed(pkg_name.to_string(), format!("could not parse version {resolved_version:?}"))
    })?;

    for affected in &vuln.affected {
        if affected.package.name != pkg_name || affected.package.ecosystem != ecosystem {
            continue;
        }
        for range in &affected.ranges {
            let introduced = range.events.iter().find_map(|e| e.introduced.as_ref());
            let Some(introduced) = introduced else {
                continue;
            };
            let Some(parsed_introduced) = parse_loose_version(introduced) else {
                continue;
            };
            if parsed_version < parsed_introduced {
                continue;
            }

            let fixed = range.events.iter().find_map(|e| e.fixed.as_ref());
            if let Some(fixed) = fixed {
                if let Some(parsed_fixed) = parse_loose_version(fixed) {
                    if parsed_version >= parsed_fixed {
                        continue;
                    }
                }
            }
            return Ok(true);
        }
    }
    Ok(false)
}
