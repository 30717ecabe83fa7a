use super::config::GateConfig;
use super::context::{PipelineSource, TriggerContext};
use super::git_ops::{DiffTreeSource, FileStatus, RevisionRange, parse_diff_tree};
use super::report::{GateOutcome, GateReport};
use regex::Regex;
use std::sync::LazyLock;

// "skip", then any run of separators, then "changelog"
static SKIP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)skip[\W_]*changelog").expect("skip pattern is a valid regex")
});

const CHANGELOG_MARKER: &str = "changelog";

/// gate that fails a pipeline whose commits leave the changelog untouched
pub struct ChangelogGateChecker {
    config: GateConfig,
}

impl ChangelogGateChecker {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// check the commit message for a skip marker
    pub fn is_skip_requested(message: &str) -> bool {
        SKIP_PATTERN.is_match(message)
    }

    /// pick the lower bound of the range to inspect
    ///
    /// pushes to the main branch are diffed against the pre-push commit,
    /// merge requests against their diff base, everything else against the
    /// main branch tip
    pub fn select_range(&self, context: &TriggerContext) -> RevisionRange {
        match context.pipeline_source {
            PipelineSource::MergeRequestEvent => {
                RevisionRange::from_base(&context.merge_request_diff_base_sha)
            }
            PipelineSource::Push if context.ref_name == self.config.main_branch => {
                RevisionRange::from_base(&context.before_sha)
            }
            _ => RevisionRange::from_base(&self.config.main_branch),
        }
    }

    /// true if any added or modified path mentions the changelog
    pub fn changelog_updated(files: &[FileStatus]) -> bool {
        files.iter().any(|file| {
            file.change_type.is_added_or_modified()
                && file.path.to_lowercase().contains(CHANGELOG_MARKER)
        })
    }

    /// run the whole gate once
    pub fn check<S>(&self, context: &TriggerContext, source: &S) -> GateReport
    where
        S: DiffTreeSource + ?Sized,
    {
        if Self::is_skip_requested(&context.commit_message) {
            log::info!("skip marker found in commit message");
            return GateReport::skipped();
        }

        let range = self.select_range(context);
        log::info!(
            "checking range {} (source: {}, ref: {})",
            range,
            context.pipeline_source,
            context.ref_name
        );

        let output = match source.diff_tree(&range) {
            Ok(output) => output,
            Err(e) => {
                log::error!("diff query could not run: {}", e);
                return GateReport::infra_error(Some(range.to_string()), e.to_string());
            }
        };

        if output.has_errors() {
            return GateReport::infra_error(Some(range.to_string()), output.stderr_lossy());
        }

        if output.exit_code != Some(0) {
            log::warn!(
                "diff query exited with {:?} but reported no error",
                output.exit_code
            );
        }

        let changed_files = parse_diff_tree(&output.stdout);
        log::debug!("{} changed file(s) in {}", changed_files.len(), range);

        let outcome = if Self::changelog_updated(&changed_files) {
            GateOutcome::PolicyPass
        } else {
            GateOutcome::PolicyFail
        };

        GateReport {
            outcome,
            range: Some(range.to_string()),
            changed_files,
            raw_files: output.stdout_lossy(),
        }
    }
}
