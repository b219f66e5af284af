//! Git2 implementation of the RepositoryLookup port.

use super::paths::path_from_bytes;
use crate::domain::{Head, Remote, RepositorySnapshot, RepositoryState, WorkingTreeChange};
use crate::ports::RepositoryLookup;
use anyhow::{Context, Result};
use git2::{ErrorCode, Repository, Status, StatusOptions};
use std::path::Path;
use tracing::debug;

pub struct Git2Lookup;

impl Git2Lookup {
    pub fn new() -> Self {
        Self
    }

    fn discover(file: &Path) -> Result<Option<Repository>> {
        let start = file.parent().unwrap_or(file);
        match Repository::discover(start) {
            Ok(repo) => Ok(Some(repo)),
            Err(e) if e.code() == ErrorCode::NotFound => {
                debug!(path = %start.display(), "no git repository found");
                Ok(None)
            }
            Err(e) => Err(e).context("Failed to open git repository"),
        }
    }
}

impl Default for Git2Lookup {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryLookup for Git2Lookup {
    fn repository_for(&self, file: &Path) -> Result<Option<RepositorySnapshot>> {
        let Some(repo) = Self::discover(file)? else {
            return Ok(None);
        };

        let Some(workdir) = repo.workdir() else {
            debug!(path = %repo.path().display(), "skipping bare repository");
            return Ok(None);
        };
        let root = std::fs::canonicalize(workdir).unwrap_or_else(|_| workdir.to_path_buf());

        let state = RepositoryState {
            remotes: read_remotes(&repo)?,
            working_tree_changes: read_changes(&repo, &root)?,
            head: read_head(&repo)?,
        };

        debug!(
            root = %root.display(),
            remotes = state.remotes.len(),
            changes = state.working_tree_changes.len(),
            "snapshotted repository"
        );

        Ok(Some(RepositorySnapshot { root, state }))
    }
}

fn read_remotes(repo: &Repository) -> Result<Vec<Remote>> {
    let names = repo.remotes().context("Failed to list remotes")?;

    let mut remotes = Vec::new();
    for name in names.iter().flatten() {
        let remote = repo
            .find_remote(name)
            .with_context(|| format!("Failed to read remote '{}'", name))?;
        remotes.push(Remote {
            name: name.to_string(),
            fetch_url: remote.url().map(String::from),
            push_url: remote.pushurl().map(String::from),
        });
    }

    Ok(remotes)
}

fn read_changes(repo: &Repository, root: &Path) -> Result<Vec<WorkingTreeChange>> {
    let mut opts = StatusOptions::new();
    opts.include_untracked(true)
        .recurse_untracked_dirs(true)
        .include_ignored(false);

    let statuses = repo
        .statuses(Some(&mut opts))
        .context("Failed to read working tree status")?;

    Ok(statuses
        .iter()
        .filter(|entry| !entry.status().is_empty() && !entry.status().contains(Status::IGNORED))
        .map(|entry| WorkingTreeChange {
            path: root.join(path_from_bytes(entry.path_bytes())),
        })
        .collect())
}

fn read_head(repo: &Repository) -> Result<Option<Head>> {
    let head = match repo.head() {
        Ok(head) => head,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            debug!("HEAD is unborn");
            return Ok(None);
        }
        Err(e) => return Err(e).context("Failed to get HEAD"),
    };

    let name = if head.is_branch() {
        head.shorthand().map(String::from)
    } else {
        None
    };

    Ok(Some(Head {
        name,
        commit: head.target().map(|oid| oid.to_string()),
    }))
}
