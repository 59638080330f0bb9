//! Resolves a package version to a commit in its source repository once the
//! repository itself is known — the tag-matching fallback used when
//! provenance does not name a commit directly.

use crate::error::Result;

use super::resolver::match_tags;

/// A thin contract over "list the tags of this repository" — the actual
/// git/VCS API client is out of scope for this crate;
/// callers supply an implementation backed by a real clone or API client.
pub trait TagLister {
    fn list_tags(&self, repository_url: &str) -> Result<Vec<String>>;
}

/// Resolves `version` to a commit-ish (the matched tag name) by listing
/// `repository_url`'s tags and applying [`match_tags`]. Returns `Ok(None)`
/// rather than an error when no tag matches, since "no commit could be
/// found" is an expected outcome, not a failure of the lister.
pub fn find_commit_for_version(
    lister: &dyn TagLister,
    repository_url: &str,
    version: &str,
) -> Result<Option<String>> {
    let tags = lister.list_tags(repository_url)?;
    Ok(match_tags(version, &tags).map(str::to_string))
}
