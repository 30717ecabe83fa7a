use super::git_ops::FileStatus;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

pub const SKIPPED_MESSAGE: &str = "Changelog skipped.";
pub const PASS_MESSAGE: &str = "Changelog has been updated as expected.";
pub const FAIL_MESSAGE: &str =
    "Please update the Changelog. Use \"skip-changelog\" in the commit message to skip this check.";

/// terminal state of one gate run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GateOutcome {
    /// commit message asked to skip the check
    Skipped,
    /// the diff query could not be completed
    InfraError { error: String },
    PolicyPass,
    PolicyFail,
}

impl GateOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GateOutcome::Skipped | GateOutcome::PolicyPass)
    }

    pub fn exit_code(&self) -> u8 {
        if self.is_success() { 0 } else { 1 }
    }

    pub fn message(&self) -> String {
        match self {
            GateOutcome::Skipped => SKIPPED_MESSAGE.to_string(),
            GateOutcome::InfraError { error } => format!("An error occurred: {}", error),
            GateOutcome::PolicyPass => PASS_MESSAGE.to_string(),
            GateOutcome::PolicyFail => FAIL_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateReport {
    pub outcome: GateOutcome,
    /// range that was diffed, `None` when no query ran
    pub range: Option<String>,
    pub changed_files: Vec<FileStatus>,
    /// diff-tree stdout as printed by git
    #[serde(skip)]
    pub raw_files: String,
}

impl GateReport {
    pub fn skipped() -> Self {
        Self {
            outcome: GateOutcome::Skipped,
            range: None,
            changed_files: Vec::new(),
            raw_files: String::new(),
        }
    }

    pub fn infra_error(range: Option<String>, error: impl Into<String>) -> Self {
        Self {
            outcome: GateOutcome::InfraError {
                error: error.into(),
            },
            range,
            changed_files: Vec::new(),
            raw_files: String::new(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.outcome.exit_code()
    }

    /// plain text report, the format CI logs show
    pub fn render_human<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if let (Some(range), GateOutcome::PolicyPass | GateOutcome::PolicyFail) =
            (&self.range, &self.outcome)
        {
            writeln!(out, "Files in {}:", range)?;
            write!(out, "{}", self.raw_files)?;
            if !self.raw_files.is_empty() && !self.raw_files.ends_with('\n') {
                writeln!(out)?;
            }
        }

        writeln!(out, "{}", self.outcome.message())
    }

    pub fn render_json<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let output = serde_json::json!({
            "outcome": self.outcome,
            "success": self.outcome.is_success(),
            "range": self.range,
            "changed_files": self.changed_files,
            "message": self.outcome.message(),
        });
        serde_json::to_writer_pretty(&mut *out, &output)?;
        writeln!(out)
    }
}
