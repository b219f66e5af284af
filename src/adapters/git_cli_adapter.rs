//! `git` executable implementation of the RepositoryLookup port.

use super::paths::path_from_bytes;
use crate::domain::{Head, Remote, RepositorySnapshot, RepositoryState, WorkingTreeChange};
use crate::ports::RepositoryLookup;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

pub struct GitCliLookup {
    program: PathBuf,
}

impl GitCliLookup {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("git"),
        }
    }

    fn output(&self, dir: &Path, args: &[&str]) -> Result<Output> {
        Command::new(&self.program)
            .arg("-C")
            .arg(dir)
            .args(args)
            .output()
            .context("Failed to execute git")
    }

    /// Run git and return raw stdout, failing on a non-zero exit.
    fn run_git(&self, dir: &Path, args: &[&str]) -> Result<Vec<u8>> {
        let output = self.output(dir, args)?;

        if !output.status.success() {
            return Err(anyhow!(
                "git {:?} failed: {}",
                args,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        Ok(output.stdout)
    }

    /// Run git for a value that may legitimately be absent (non-zero exit).
    fn query_git(&self, dir: &Path, args: &[&str]) -> Result<Option<String>> {
        let output = self.output(dir, args)?;
        if !output.status.success() {
            return Ok(None);
        }
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(if value.is_empty() { None } else { Some(value) })
    }

    fn toplevel(&self, file: &Path) -> Result<Option<PathBuf>> {
        let dir = file.parent().unwrap_or(file);
        let output = self.output(dir, &["rev-parse", "--show-toplevel"])?;
        let stdout = output.stdout.strip_suffix(b"\n").unwrap_or(&output.stdout);
        if !output.status.success() || stdout.is_empty() {
            debug!(path = %dir.display(), "git rev-parse found no working tree");
            return Ok(None);
        }

        let root = path_from_bytes(stdout);
        Ok(Some(std::fs::canonicalize(&root).unwrap_or(root)))
    }

    fn remotes(&self, root: &Path) -> Result<Vec<Remote>> {
        let names = String::from_utf8_lossy(&self.run_git(root, &["remote"])?).into_owned();

        let mut remotes = Vec::new();
        for name in names.lines().map(str::trim).filter(|n| !n.is_empty()) {
            let fetch_key = format!("remote.{}.url", name);
            let push_key = format!("remote.{}.pushurl", name);
            remotes.push(Remote {
                name: name.to_string(),
                fetch_url: self.query_git(root, &["config", "--get", &fetch_key])?,
                push_url: self.query_git(root, &["config", "--get", &push_key])?,
            });
        }

        Ok(remotes)
    }

    fn changes(&self, root: &Path) -> Result<Vec<WorkingTreeChange>> {
        let status = self.run_git(
            root,
            &["status", "--porcelain=v1", "-z", "--untracked-files=all"],
        )?;
        Ok(parse_porcelain_status(&status)
            .into_iter()
            .map(|path| WorkingTreeChange {
                path: root.join(path),
            })
            .collect())
    }

    fn head(&self, root: &Path) -> Result<Option<Head>> {
        let Some(commit) =
            self.query_git(root, &["rev-parse", "--verify", "--quiet", "HEAD^{commit}"])?
        else {
            debug!("HEAD is unborn");
            return Ok(None);
        };
        let name = self.query_git(root, &["symbolic-ref", "--short", "-q", "HEAD"])?;

        Ok(Some(Head {
            name,
            commit: Some(commit),
        }))
    }
}

impl Default for GitCliLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryLookup for GitCliLookup {
    fn repository_for(&self, file: &Path) -> Result<Option<RepositorySnapshot>> {
        let Some(root) = self.toplevel(file)? else {
            return Ok(None);
        };

        let state = RepositoryState {
            remotes: self.remotes(&root)?,
            working_tree_changes: self.changes(&root)?,
            head: self.head(&root)?,
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

/// Paths listed by `git status --porcelain=v1 -z`, relative to the repository root.
///
/// Entries are `XY <path>` separated by NUL. Renames and copies are followed by
/// an extra NUL-terminated source path, which is skipped.
/// Paths are kept as raw bytes so names that are not UTF-8 still match.
pub fn parse_porcelain_status(output: &[u8]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut entries = output.split(|&b| b == 0);

    while let Some(entry) = entries.next() {
        if entry.len() < 4 {
            continue;
        }
        let (xy, path) = entry.split_at(3);
        if xy[0] == b'!' {
            continue;
        }
        paths.push(path_from_bytes(path));
        if xy[0] == b'R' || xy[0] == b'C' {
            entries.next();
        }
    }

    paths
}
