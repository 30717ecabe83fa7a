use super::types::{ChangeType, DiffOutput, FileStatus, RevisionRange};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// anything that can list the changed files of a revision range
///
/// stdout must be in `git diff-tree --name-status` form, one
/// `<status><whitespace><path>` line per file
pub trait DiffTreeSource {
    fn diff_tree(&self, range: &RevisionRange) -> Result<DiffOutput>;
}

/// runs the `git` command line tool inside a repository
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_path: PathBuf,
    program: String,
}

impl GitCli {
    pub fn new(repo_path: impl Into<PathBuf>, program: impl Into<String>) -> Self {
        Self {
            repo_path: repo_path.into(),
            program: program.into(),
        }
    }

    /// locate the repository containing `path` and run git from its root
    pub fn discover<P: AsRef<Path>>(path: P, program: impl Into<String>) -> Result<Self> {
        let root = Self::detect_repository_root(path)?;
        Ok(Self::new(root, program))
    }

    /// detect root of the repository (path as a result)
    pub fn detect_repository_root<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
        let path = path.as_ref();

        // if it's a file, use its parent directory for discovery
        let check_path = if path.is_file() {
            match path.parent() {
                Some(parent) => parent,
                None => {
                    return Err(Error::RepositoryNotFound {
                        path: path.to_path_buf(),
                    });
                }
            }
        } else {
            path
        };

        let repo = gix::discover(check_path)?;

        // bare repositories have no work tree, git runs from the git dir
        let root_path = match repo.work_dir() {
            Some(work_dir) => work_dir.to_path_buf(),
            None => repo.git_dir().to_path_buf(),
        };

        Ok(root_path)
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl DiffTreeSource for GitCli {
    fn diff_tree(&self, range: &RevisionRange) -> Result<DiffOutput> {
        let range_arg = range.to_string();
        log::debug!(
            "running {} diff-tree over {} in {}",
            self.program,
            range_arg,
            self.repo_path.display()
        );

        // output() waits for the child, stdout and stderr stay separate
        let output = Command::new(&self.program)
            .args([
                "diff-tree",
                "--no-commit-id",
                "-r",
                "--name-status",
                &range_arg,
                "--",
            ])
            .current_dir(&self.repo_path)
            .output()
            .map_err(Error::IoError)?;

        Ok(DiffOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code: output.status.code(),
        })
    }
}

/// parse diff-tree output into file statuses
///
/// expects `--name-status` lines, `<status><whitespace><path>`; blank lines
/// are skipped. Any other shape keeps its first token as an unknown status
pub fn parse_diff_tree(stdout: &[u8]) -> Vec<FileStatus> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter_map(parse_status_line)
        .collect()
}

fn parse_status_line(line: &str) -> Option<FileStatus> {
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() {
        return None;
    }

    let status_end = line.find(char::is_whitespace)?;
    let (status, paths) = (&line[..status_end], line[status_end..].trim_start());

    if paths.is_empty() {
        return None;
    }

    let change_type = ChangeType::from_status(status);
    let has_source = matches!(change_type, ChangeType::Renamed | ChangeType::Copied);
    let file_status = match paths.split_once('\t') {
        Some((source, target)) if has_source => {
            FileStatus::new(change_type, target).with_source(source)
        }
        _ => FileStatus::new(change_type, paths),
    };

    Some(file_status)
}
