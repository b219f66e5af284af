//! Permalink resolution: repository state + selection in, GitHub URL out.
//! No I/O of its own; repository state comes through the lookup port.

use super::error::PermalinkError;
use super::remote_url::parse_remote_url;
use super::types::{Remote, RepositoryInfo, RepositoryName, Selection};
use crate::ports::RepositoryLookup;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::fmt;
use std::path::Path;
use tracing::debug;
use url::Url;

static GITHUB_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse("https://github.com/").expect("valid GitHub base URL"));

/// A resolved link to a line range at a fixed commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permalink {
    pub name: RepositoryName,
    pub commit: String,
    /// Repository-relative path, one entry per path component.
    pub segments: Vec<String>,
    pub selection: Selection,
}

impl Permalink {
    /// The link, with each path segment percent-encoded.
    pub fn url(&self) -> String {
        let mut url = GITHUB_BASE.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.clear()
                .push(&self.name.organization)
                .push(&self.name.repository)
                .push("blob")
                .push(&self.commit)
                .extend(&self.segments);
        }
        url.set_fragment(Some(&self.selection.fragment()));
        url.to_string()
    }

    pub fn to_json(&self) -> Value {
        json!({
            "url": self.url(),
            "organization": self.name.organization,
            "repository": self.name.repository,
            "commit": self.commit,
            "path": self.segments.join("/"),
            "start_line": self.selection.first_line(),
            "end_line": self.selection.last_line(),
        })
    }
}

impl fmt::Display for Permalink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

/// Find the repository owning `file` and name it after its first GitHub remote.
pub fn resolve_repository(
    lookup: &dyn RepositoryLookup,
    file: &Path,
) -> Result<RepositoryInfo, PermalinkError> {
    let snapshot = lookup
        .repository_for(file)?
        .ok_or_else(|| PermalinkError::NoRepositoryFound {
            path: file.to_path_buf(),
        })?;

    let (remote, name) = github_remote(&snapshot.state.remotes).ok_or_else(|| {
        PermalinkError::NoGitHubRemote {
            root: snapshot.root.clone(),
        }
    })?;
    debug!(remote = %remote.name, repository = %name, "using GitHub remote");

    Ok(RepositoryInfo {
        name,
        root: snapshot.root,
        state: snapshot.state,
    })
}

/// First remote, in the order given, whose URL parses as GitHub.
pub fn github_remote(remotes: &[Remote]) -> Option<(&Remote, RepositoryName)> {
    remotes
        .iter()
        .find_map(|remote| parse_remote_url(remote.url()).map(|name| (remote, name)))
}

/// Resolve the permalink for `selection`.
///
/// Checks run in order and stop at the first failure: repository, GitHub
/// remote, uncommitted changes to the file, HEAD commit.
pub fn resolve_permalink(
    lookup: &dyn RepositoryLookup,
    selection: &Selection,
) -> Result<Permalink, PermalinkError> {
    let repo = resolve_repository(lookup, &selection.file)?;

    if repo
        .state
        .working_tree_changes
        .iter()
        .any(|change| change.path == selection.file)
    {
        return Err(PermalinkError::FileModified {
            path: selection.file.clone(),
        });
    }

    let head = repo.state.head.as_ref().ok_or(PermalinkError::NoCommitHash)?;
    let commit = head.commit.clone().ok_or(PermalinkError::NoCommitHash)?;
    debug!(branch = head.name.as_deref().unwrap_or("(detached)"), %commit, "resolved HEAD");

    let relative = selection.file.strip_prefix(&repo.root).map_err(|_| {
        PermalinkError::NoRepositoryFound {
            path: selection.file.clone(),
        }
    })?;

    Ok(Permalink {
        name: repo.name,
        commit,
        segments: path_segments(relative),
        selection: selection.clone(),
    })
}

/// Split a relative path into URL segments.
///
/// Both `/` and `\` separate segments so the URL uses forward slashes
/// whatever convention the path was written in.
pub fn path_segments(relative: &Path) -> Vec<String> {
    relative
        .to_string_lossy()
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .map(String::from)
        .collect()
}
