//! Pure data types for the permalink domain.
//! No I/O, no dependencies on external crates beyond std.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// GitHub organization and repository, as extracted from a remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName {
    pub organization: String,
    pub repository: String,
}

impl RepositoryName {
    pub fn new(organization: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            repository: repository.into(),
        }
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.organization, self.repository)
    }
}

/// A configured remote. At least one of the URLs is normally present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub fetch_url: Option<String>,
    pub push_url: Option<String>,
}

impl Remote {
    /// The URL used to identify the remote: fetch URL, falling back to push URL.
    pub fn url(&self) -> Option<&str> {
        self.fetch_url.as_deref().or(self.push_url.as_deref())
    }
}

/// A file with uncommitted changes, by absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingTreeChange {
    pub path: PathBuf,
}

/// The checked-out reference.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Head {
    /// Branch shorthand, `None` when detached.
    pub name: Option<String>,
    /// Full hex SHA of the commit HEAD points at.
    pub commit: Option<String>,
}

/// Read-only snapshot of repository state, materialized per request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepositoryState {
    pub remotes: Vec<Remote>,
    pub working_tree_changes: Vec<WorkingTreeChange>,
    pub head: Option<Head>,
}

/// A repository as handed over by a lookup backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySnapshot {
    pub root: PathBuf,
    pub state: RepositoryState,
}

/// A repository whose GitHub name has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub name: RepositoryName,
    pub root: PathBuf,
    pub state: RepositoryState,
}

/// One-indexed, inclusive line range as typed on the command line.
///
/// Accepts `5`, `5-9`, `L5` and `L5-L9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl Default for LineRange {
    fn default() -> Self {
        Self { start: 1, end: 1 }
    }
}

impl FromStr for LineRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_line = |part: &str| -> Result<u32, String> {
            let part = part.trim();
            let digits = part
                .strip_prefix('L')
                .or_else(|| part.strip_prefix('l'))
                .unwrap_or(part);
            let invalid = || format!("Invalid line number '{}'", part);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            let line = digits.parse::<u32>().map_err(|_| invalid())?;
            if line == 0 {
                return Err("Line numbers start at 1".to_string());
            }
            Ok(line)
        };

        let (start, end) = match s.split_once('-') {
            Some((start, end)) => (parse_line(start)?, parse_line(end)?),
            None => {
                let line = parse_line(s)?;
                (line, line)
            }
        };

        if end < start {
            return Err(format!("Line range {}-{} ends before it starts", start, end));
        }

        Ok(Self { start, end })
    }
}

/// The lines a permalink points at. Line numbers are zero-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub file: PathBuf,
    pub start_line: u32,
    pub end_line: u32,
}

impl Selection {
    pub fn new(file: impl Into<PathBuf>, lines: LineRange) -> Self {
        Self {
            file: file.into(),
            start_line: lines.start.saturating_sub(1),
            end_line: lines.end.saturating_sub(1),
        }
    }

    pub fn is_single_line(&self) -> bool {
        self.start_line == self.end_line
    }

    /// One-indexed first line.
    pub fn first_line(&self) -> u32 {
        self.start_line.saturating_add(1)
    }

    /// One-indexed last line.
    pub fn last_line(&self) -> u32 {
        self.end_line.saturating_add(1)
    }

    /// GitHub line anchor, one-indexed: `L5` or `L5-L9`.
    pub fn fragment(&self) -> String {
        if self.is_single_line() {
            format!("L{}", self.first_line())
        } else {
            format!("L{}-L{}", self.first_line(), self.last_line())
        }
    }
}
