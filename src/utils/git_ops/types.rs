use serde::{Deserialize, Serialize};
use std::fmt;

/// per-file status code as printed by `git diff-tree`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeType {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    TypeChanged,
    Unmerged,
    Unknown(String),
}

impl ChangeType {
    /// parse a status token such as `M`, `A` or `R100`
    ///
    /// only the first letter is significant, rename and copy tokens carry a
    /// similarity score after it
    pub fn from_status(token: &str) -> Self {
        match token.chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('A') => ChangeType::Added,
            Some('M') => ChangeType::Modified,
            Some('D') => ChangeType::Deleted,
            Some('R') => ChangeType::Renamed,
            Some('C') => ChangeType::Copied,
            Some('T') => ChangeType::TypeChanged,
            Some('U') => ChangeType::Unmerged,
            _ => ChangeType::Unknown(token.to_string()),
        }
    }

    pub fn is_added_or_modified(&self) -> bool {
        matches!(self, ChangeType::Added | ChangeType::Modified)
    }
}

/// one line of diff-tree output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStatus {
    pub change_type: ChangeType,
    pub path: String,
    /// original path for renames and copies
    pub source_path: Option<String>,
}

impl FileStatus {
    pub fn new(change_type: ChangeType, path: impl Into<String>) -> Self {
        Self {
            change_type,
            path: path.into(),
            source_path: None,
        }
    }

    pub fn with_source(mut self, source_path: impl Into<String>) -> Self {
        self.source_path = Some(source_path.into());
        self
    }
}

/// lower bound of a `<base>..` revision range; the upper bound is always the
/// working revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRange {
    pub base: String,
}

impl RevisionRange {
    pub fn from_base(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

impl fmt::Display for RevisionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..", self.base)
    }
}

/// captured result of one diff-tree invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl DiffOutput {
    pub fn new(stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code: Some(0),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.stderr.is_empty()
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}
