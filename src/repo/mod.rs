//! Repository/commit resolution: PURL parsing, git remote-URL
//! canonicalization, and the ecosystem-dispatched repo/commit finders.

pub mod commit_finder;
pub mod git_url;
pub mod purl;
pub mod resolver;

pub use purl::{ecosystem_of, parse_purl, purl_repo_type_matches_url, Ecosystem};
pub use resolver::{
    match_tags, resolve_repo, resolve_repo_with_outcome, RepoFinder, RepoFinderInfo, RepoFinderOutcome,
    RepoFinderSource,
};
