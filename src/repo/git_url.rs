//! Remote-URL parsing and canonicalization: recovering a `(host, org, name)`
//! triple from the handful of shapes a git remote URL can take (`https://`,
//! `git@host:org/name.git`, bare `host/org/name`).

use once_cell::sync::Lazy;
use regex::Regex;

/// A canonicalized remote repository reference: always `https://<host>/<org>/<name>`,
/// with any port, `.git` suffix, or trailing slash already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRemoteUrl {
    pub host: String,
    pub org: String,
    pub name: String,
}

impl ParsedRemoteUrl {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.org, self.name)
    }

    pub fn complete_name(&self) -> String {
        format!("{}/{}/{}", self.host, self.org, self.name)
    }

    pub fn to_https_url(&self) -> String {
        format!("https://{}/{}/{}", self.host, self.org, self.name)
    }
}

static SCHEME_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)(git\+http|http|ftp|ssh\+git|ssh|git@)").unwrap());
static SCP_LIKE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(?P<user>[^@/]+)@)?(?P<host>[^:/]+):(?P<rest>.+)$").unwrap());

fn strip_git_suffix(path: &str) -> &str {
    path.strip_suffix(".git").unwrap_or(path)
}

fn last_two_path_segments(path: &str) -> Option<(String, String)> {
    let segments: Vec<&str> = path.trim_matches('/').split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() < 2 {
        return None;
    }
    let name = strip_git_suffix(segments[segments.len() - 1]).to_string();
    let org = segments[segments.len() - 2].to_string();
    Some((org, name))
}

/// Canonicalizes `url` into an `https://host/org/repo` form, accepting
/// `http(s)`/`ftp(s)`/`ssh`/`git+ssh` URLs, scp-like `user@host:org/repo`
/// syntax, and bare `host/org/repo`. Returns `None` if the URL's host is
/// not in `allowed_hosts`, or the path does not resolve to at least two
/// segments.
pub fn parse_remote_url(url: &str, allowed_hosts: &[String]) -> Option<ParsedRemoteUrl> {
    let url = url.trim();

    // Maven POM <scm> blocks use the `scm:<provider>:<url>` convention, e.g.
    // `scm:git:https://github.com/org/repo` or `scm:git:git@github.com:org/repo.git`.
    // Strip the `scm:` and provider tag, then parse the remainder normally.
    if let Some(rest) = url.strip_prefix("scm:") {
        let rest = rest.strip_prefix("git:").unwrap_or(rest);
        return parse_remote_url(rest, allowed_hosts);
    }

    if let Some(caps) = SCHEME_PREFIX_RE.captures(url) {
        let prefix = &caps[1];
        let scheme = &caps[2];
        let cleaned = &url[prefix.len()..];

        match scheme {
            "http" | "https" | "ftp" | "git+http" => {
                let without_scheme = cleaned.splitn(2, "://").nth(1).unwrap_or(cleaned);
                let (host, path) = without_scheme.split_once('/')?;
                let host = host.split(':').next().unwrap_or(host);
                if !allowed_hosts.iter().any(|h| h == host) {
                    return None;
                }
                let (org, name) = last_two_path_segments(path)?;
                return Some(ParsedRemoteUrl {
                    host: host.to_string(),
                    org,
                    name,
                });
            }
            "ssh" | "ssh+git" => {
                let without_scheme = cleaned.splitn(2, "://").nth(1).unwrap_or(cleaned);
                let (user_host, path) = without_scheme.split_once('/')?;
                let (user, host_port) = user_host.rsplit_once('@')?;
                if user.is_empty() {
                    return None;
                }
                let host = host_port.split(':').next().unwrap_or(host_port);
                if !allowed_hosts.iter().any(|h| h == host) {
                    return None;
                }
                let (org, name) = last_two_path_segments(path)?;
                return Some(ParsedRemoteUrl {
                    host: host.to_string(),
                    org,
                    name,
                });
            }
            "git@" => {
                // git@host:org/repo.git -- handled by the scp-like fallback below.
            }
            _ => {}
        }
    }

    // scp-like syntax: user@host:org/repo(.git) with no scheme at all.
    if let Some(caps) = SCP_LIKE_RE.captures(url) {
        if caps.name("user").is_some() {
            let host = &caps["host"];
            if !allowed_hosts.iter().any(|h| h == host) {
                return None;
            }
            let (org, name) = last_two_path_segments(&caps["rest"])?;
            return Some(ParsedRemoteUrl {
                host: host.to_string(),
                org,
                name,
            });
        }
    }

    None
}

/// Strips surrounding whitespace and a trailing `/` or `.git`.
pub fn clean_up_repo_path(repo_path: &str) -> String {
    let trimmed = repo_path.trim().trim_end_matches('/');
    strip_git_suffix(trimmed).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts() -> Vec<String> {
        vec!["github.com".to_string(), "gitlab.com".to_string()]
    }

    #[test]
    fn parses_https_url() {
        let parsed = parse_remote_url("https://github.com/owner/repo.git", &hosts()).unwrap();
        assert_eq!(parsed.host, "github.com");
        assert_eq!(parsed.full_name(), "owner/repo");
    }

    #[test]
    fn parses_ssh_url_with_port() {
        let parsed = parse_remote_url("ssh://git@github.com:7999/owner/org.git", &hosts()).unwrap();
        assert_eq!(parsed.to_https_url(), "https://github.com/owner/org");
    }

    #[test]
    fn parses_scp_like_syntax() {
        let parsed = parse_remote_url("git@github.com:owner/project.git", &hosts()).unwrap();
        assert_eq!(parsed.full_name(), "owner/project");
    }

    #[test]
    fn rejects_disallowed_host() {
        assert!(parse_remote_url("https://evil.example.com/owner/repo", &hosts()).is_none());
    }

    #[test]
    fn parses_scm_prefixed_maven_url() {
        let parsed = parse_remote_url("scm:git:https://github.com/owner/repo.git", &hosts()).unwrap();
        assert_eq!(parsed.to_https_url(), "https://github.com/owner/repo");
    }

    #[test]
    fn parses_scm_prefixed_scp_like_url() {
        let parsed = parse_remote_url("scm:git:git@github.com:owner/repo.git", &hosts()).unwrap();
        assert_eq!(parsed.full_name(), "owner/repo");
    }

    #[test]
    fn clean_up_strips_trailing_slash_and_git() {
        assert_eq!(clean_up_repo_path(" https://github.com/owner/repo.git/ "), "https://github.com/owner/repo");
    }
}
