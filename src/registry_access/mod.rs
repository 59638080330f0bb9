//! Package-registry and OSV access contracts: trait-only,
//! since implementations (an actual HTTP client against a Maven/npm/PyPI
//! registry or the osv.dev API) are external collaborators.
//! [`osv::is_version_affected`] is the one piece implemented directly here
//! rather than behind a trait, since the affectedness algorithm has no
//! network dependency of its own.

pub mod osv;

use crate::error::APIAccessError;

/// One downloadable release asset, as a registry lists it before any bytes
/// are fetched, with per-asset `size_in_bytes` and `sha256`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryAsset {
    pub url: String,
    pub file_name: String,
    pub size_in_bytes: u64,
    pub sha256: Option<String>,
}

/// A package/artifact registry client contract. No
/// implementation lives in this crate: a real client needs an HTTP stack
/// and credentials, both out of scope
pub trait PackageRegistry {
    /// The latest published version of `group:artifact`.
    fn fetch_latest_version(&self, group: &str, artifact: &str) -> Result<String, APIAccessError>;

    /// Assets published for `group:artifact@version` whose file name ends in
    /// one of `exts` (e.g. `.jar`, `.tar.gz`).
    fn fetch_assets(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
        exts: &[&str],
    ) -> Result<Vec<RegistryAsset>, APIAccessError>;

    /// Downloads `asset` to `dest`. Implementations must enforce
    /// `max_size_bytes` against the asset's already-known `size_in_bytes`
    /// *before* making the request, rather than aborting mid-stream.
    fn download_asset(
        &self,
        asset: &RegistryAsset,
        dest: &std::path::Path,
        max_size_bytes: u64,
    ) -> Result<(), APIAccessError>;
}

/// A package identity as OSV's batch-query endpoint expects it, for use
/// with `osv.querybatch([{ecosystem,name}])`-style calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageQuery {
    pub ecosystem: String,
    pub name: String,
}

/// An OSV vulnerability-database client contract.
pub trait Osv {
    /// Vulnerabilities affecting the package identified by `purl`.
    fn query(&self, purl: &str) -> Result<Vec<osv::Vulnerability>, APIAccessError>;

    /// Batch form of [`Osv::query`] by `(ecosystem, name)` pairs.
    /// Implementations must preserve `packages`' input order in the
    /// returned `Vec` so callers can
    /// zip results back against their request list positionally.
    fn querybatch(&self, packages: &[PackageQuery]) -> Result<Vec<Vec<osv::Vulnerability>>, APIAccessError>;
}
