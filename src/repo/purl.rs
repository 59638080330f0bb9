//! Package URL parsing and PURL/repo-URL equivalence checks.

use packageurl::PackageUrl;

use crate::error::InvalidPurlError;

/// Package types this resolver can map onto a source repository ecosystem.
/// Anything else is rejected rather
/// than guessed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ecosystem {
    Cargo,
    Npm,
    PyPI,
    Maven,
    Golang,
}

pub fn parse_purl(purl: &str) -> Result<PackageUrl<'_>, InvalidPurlError> {
    PackageUrl::from_str(purl).map_err(|e| InvalidPurlError::Parse(purl.to_string(), e.to_string()))
}

pub fn ecosystem_of(purl: &PackageUrl<'_>) -> Result<Ecosystem, InvalidPurlError> {
    match purl.ty() {
        "cargo" => Ok(Ecosystem::Cargo),
        "npm" => Ok(Ecosystem::Npm),
        "pypi" => Ok(Ecosystem::PyPI),
        "maven" => Ok(Ecosystem::Maven),
        "golang" => Ok(Ecosystem::Golang),
        other => Err(InvalidPurlError::UnsupportedPackageType(other.to_string())),
    }
}

/// Maps a repository-abstract-type PURL type (`github`, `gitlab`,
/// `bitbucket`) onto the domain it represents, mirroring
/// `to_domain_from_known_purl_types`. Anything else is not a repository PURL.
pub fn repo_purl_type_to_domain(purl_type: &str) -> Option<&'static str> {
    match purl_type {
        "github" => Some("github.com"),
        "gitlab" => Some("gitlab.com"),
        "bitbucket" => Some("bitbucket.org"),
        _ => None,
    }
}

/// Compares a repository-type PURL (e.g. `pkg:github/oracle/macaron`)
/// against a URL for equality of hostname (ignoring port) and path,
/// case-insensitively — the repository-abstract-type counterpart to
/// [`purl_matches_repo_url`], which instead handles ecosystem-registry
/// PURLs like `pkg:npm/...`.
pub fn purl_repo_type_matches_url(purl: &PackageUrl<'_>, url: &str) -> bool {
    let Some(expanded_type) = repo_purl_type_to_domain(purl.ty()) else {
        return false;
    };
    let Ok(parsed) = url::Url::parse(url) else {
        return false;
    };
    let Some(hostname) = parsed.host_str() else {
        return false;
    };

    let mut purl_path = purl.name().to_string();
    if let Some(namespace) = purl.namespace() {
        purl_path = format!("{namespace}/{purl_path}");
    }

    // Host is compared case-insensitively, path case-sensitively.
    let actual = format!("{}{}", hostname.to_lowercase(), parsed.path());
    let expected_host = expanded_type.to_lowercase();
    let expected = format!("{expected_host}/{purl_path}");
    actual == expected
}

/// True if `repo_url`'s final two path segments (`org/name`) match the
/// purl's namespace/name (case-insensitively, ignoring a `.git` suffix) —
/// a coarse sanity check, not a guarantee the package actually lives there.
pub fn purl_matches_repo_url(purl: &PackageUrl<'_>, repo_url: &str) -> bool {
    let Some((org, name)) = super::git_url::parse_remote_url(repo_url, &crate::config::get().git_services)
        .map(|p| (p.org, p.name))
    else {
        return false;
    };
    let purl_name = purl.name().to_lowercase();
    let purl_namespace = purl.namespace().map(|s| s.to_lowercase()).unwrap_or_default();

    name.to_lowercase() == purl_name
        && (purl_namespace.is_empty() || purl_namespace == org.to_lowercase())
}
