//! Repository lookup port (trait).
//! Defines how repository state is obtained without coupling to any git implementation.

use crate::domain::RepositorySnapshot;
use anyhow::Result;
use std::path::Path;

/// Port for finding the repository that owns a file.
/// Implementations may use git2, shell commands, or test fakes.
pub trait RepositoryLookup {
    /// Snapshot the repository containing `file`, or `None` if the file is not
    /// inside a (non-bare) repository.
    ///
    /// `file` is absolute and canonical. Paths in the returned snapshot must be
    /// in the same form so they compare equal.
    fn repository_for(&self, file: &Path) -> Result<Option<RepositorySnapshot>>;
}
