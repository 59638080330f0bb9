//! Resolves a PURL to a source repository, dispatching by ecosystem. Each
//! ecosystem adapter (hitting a package registry API) is a trait-only
//! contract here — network access is out of scope for this crate and left
//! to a caller-supplied implementation, matching [`crate::registry_access`].

use packageurl::PackageUrl;

use crate::error::{InvalidPurlError, Result};

use super::purl::{ecosystem_of, Ecosystem};

/// What a repo-finder adapter reports back about where a package's source
/// lives, along with how confident that claim is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoFinderInfo {
    pub repository_url: String,
    pub commit: Option<String>,
    pub source: RepoFinderSource,
}

/// Where a [`RepoFinderInfo`] came from — used by callers (the check corpus) to
/// weigh how much to trust a claimed repository when cross-checking it
/// against provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoFinderSource {
    /// The registry's own metadata named a repository URL directly.
    RegistryMetadata,
    /// Recovered indirectly, e.g. by following a homepage link.
    Heuristic,
}

/// One ecosystem's package-registry lookup. Implementations are expected to
/// be thin HTTP clients; this crate only defines the contract and the
/// ecosystem dispatch — no outbound network calls happen in core logic.
pub trait RepoFinder {
    fn ecosystem(&self) -> Ecosystem;
    fn find_repo(&self, purl: &PackageUrl<'_>) -> Result<Option<RepoFinderInfo>>;
    /// Queries the registry for the package's most recent version, for the
    /// `try_latest_purl` retry. Adapters that cannot
    /// determine a latest version return `Ok(None)`.
    fn latest_version(&self, purl: &PackageUrl<'_>) -> Result<Option<String>>;
}

/// Dispatches `purl` to whichever registered [`RepoFinder`] matches its
/// ecosystem. Returns `Err` if no finder is registered for the purl's type,
/// or if the purl's type isn't one this crate supports at all.
pub fn resolve_repo<'a>(
    purl: &PackageUrl<'_>,
    finders: &'a [Box<dyn RepoFinder>],
) -> Result<Option<&'a dyn RepoFinder>> {
    let ecosystem = ecosystem_of(purl)?;
    Ok(finders
        .iter()
        .find(|f| f.ecosystem() == ecosystem)
        .map(|f| f.as_ref()))
}

/// How a PURL resolution attempt concluded.
/// Persisted alongside the resolved component so a later audit can see why a
/// repository was or wasn't found without re-running the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoFinderOutcome {
    /// A repo was found directly from the requested PURL/version.
    Found,
    /// No finder matched the requested version, but retrying against the
    /// registry's latest version (`try_latest_purl`) succeeded.
    FoundFromParent,
    /// The PURL carries no version and `try_latest_purl` is disabled.
    NoVersionProvided,
    /// The PURL's package type has no registered ecosystem dispatch.
    UnsupportedPackageType,
    /// `try_latest_purl` ran but the registry reported no newer version.
    NoNewerVersion,
    /// The registry's reported "latest version" did not parse as a usable PURL.
    LatestVersionInvalid,
    /// The finder ran and found nothing, and no retry was attempted.
    NotFound,
}

/// Resolves `purl` to a [`RepoFinderInfo`], retrying against the registry's
/// latest version when `purl` carries none and `try_latest_purl` is enabled.
pub fn resolve_repo_with_outcome(
    purl: &PackageUrl<'_>,
    finders: &[Box<dyn RepoFinder>],
    try_latest_purl: bool,
) -> Result<(RepoFinderOutcome, Option<RepoFinderInfo>)> {
    let ecosystem = match ecosystem_of(purl) {
        Ok(ecosystem) => ecosystem,
        Err(InvalidPurlError::UnsupportedPackageType(_)) => {
            return Ok((RepoFinderOutcome::UnsupportedPackageType, None));
        }
        Err(other) => return Err(other.into()),
    };
    let Some(finder) = finders.iter().find(|f| f.ecosystem() == ecosystem) else {
        return Ok((RepoFinderOutcome::UnsupportedPackageType, None));
    };

    if let Some(info) = finder.find_repo(purl)? {
        return Ok((RepoFinderOutcome::Found, Some(info)));
    }

    if purl.version().is_none() && !try_latest_purl {
        return Ok((RepoFinderOutcome::NoVersionProvided, None));
    }
    if !try_latest_purl {
        return Ok((RepoFinderOutcome::NotFound, None));
    }

    let Some(latest) = finder.latest_version(purl)? else {
        return Ok((RepoFinderOutcome::NoNewerVersion, None));
    };
    let latest_purl_str = format!(
        "pkg:{}/{}{}@{}",
        purl.ty(),
        purl.namespace().map(|ns| format!("{ns}/")).unwrap_or_default(),
        purl.name(),
        latest
    );
    let Ok(latest_purl) = super::purl::parse_purl(&latest_purl_str) else {
        return Ok((RepoFinderOutcome::LatestVersionInvalid, None));
    };
    match finder.find_repo(&latest_purl)? {
        Some(info) => Ok((RepoFinderOutcome::FoundFromParent, Some(info))),
        None => Ok((RepoFinderOutcome::NoNewerVersion, None)),
    }
}

/// Resolves a commit hash's tag-name counterpart against a known tag list,
/// by exact version match, a "v"-prefixed match, or substring containment —
/// the common patterns across ecosystem tagging conventions.
pub fn match_tags<'a>(version: &str, tags: &'a [String]) -> Option<&'a str> {
    if let Some(exact) = tags.iter().find(|t| t.as_str() == version) {
        return Some(exact);
    }
    let v_prefixed = format!("v{version}");
    if let Some(tag) = tags.iter().find(|t| t.as_str() == v_prefixed) {
        return Some(tag);
    }
    tags.iter().find(|t| t.contains(version)).map(String::as_str)
}
