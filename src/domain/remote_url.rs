//! Parsing of git remote URLs into GitHub repository names.

use super::types::RepositoryName;
use once_cell::sync::Lazy;
use regex::Regex;

static SSH_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:ssh://)?git@github\.com:(?P<org>[^/]+)/(?P<repo>[^/]+?)(?:\.git)?$")
        .expect("valid ssh remote pattern")
});

static HTTP_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://github\.com/(?P<org>[^/]+)/(?P<repo>[^/]+?)(?:\.git)?$")
        .expect("valid http remote pattern")
});

/// Parse a remote URL into its GitHub organization and repository.
///
/// Returns `None` for a missing URL or any URL that is not a GitHub SSH or
/// HTTP(S) remote.
pub fn parse_remote_url(url: Option<&str>) -> Option<RepositoryName> {
    let url = url?;
    match_pattern(&SSH_URL, url).or_else(|| match_pattern(&HTTP_URL, url))
}

fn match_pattern(pattern: &Regex, url: &str) -> Option<RepositoryName> {
    let caps = pattern.captures(url)?;
    Some(RepositoryName::new(&caps["org"], &caps["repo"]))
}
