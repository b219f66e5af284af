//! Failures of permalink resolution.

use std::path::PathBuf;

/// Every way a permalink request can fail.
///
/// All variants except [`PermalinkError::Backend`] are preconditions the user
/// has to fix (open a tracked file, add a GitHub remote, commit changes).
#[derive(Debug, thiserror::Error)]
pub enum PermalinkError {
    #[error("No such file: {}", path.display())]
    NoActiveFile { path: PathBuf },

    #[error("File {} is not inside a git repository", path.display())]
    NoRepositoryFound { path: PathBuf },

    #[error("No GitHub remote found for repository at {}", root.display())]
    NoGitHubRemote { root: PathBuf },

    #[error("File {} has uncommitted changes, commit them before creating a permalink", path.display())]
    FileModified { path: PathBuf },

    #[error("Could not determine the current commit hash, HEAD has no commit")]
    NoCommitHash,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl PermalinkError {
    /// Whether this is an expected condition to report, rather than a fault.
    pub fn is_precondition(&self) -> bool {
        !matches!(self, PermalinkError::Backend(_))
    }
}
