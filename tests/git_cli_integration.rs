use changelog_gate::{
    ChangeType, ChangelogGateChecker, DiffTreeSource, GateConfig, GateOutcome, GitCli,
    PipelineSource, RevisionRange, TriggerContext,
};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git must be installed to run these tests");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn commit_file(dir: &Path, file_path: &str, content: &str, message: &str) -> String {
    let full_path = dir.join(file_path);
    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full_path, content).unwrap();

    git(dir, &["add", "."]);
    git(dir, &["commit", "-q", "-m", message]);
    git(dir, &["rev-parse", "HEAD"])
}

/// repository with a single commit on `main`
fn init_repo(dir: &Path) -> String {
    git(dir, &["init", "-q"]);
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(dir, &["config", "user.name", "Test User"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "commit.gpgsign", "false"]);

    fs::write(dir.join("CHANGELOG.md"), "# Changelog\n").unwrap();
    commit_file(dir, "src/lib.rs", "pub fn answer() -> u32 { 42 }\n", "initial")
}

fn context(source: PipelineSource, ref_name: &str, before_sha: &str) -> TriggerContext {
    TriggerContext {
        commit_message: "fix bug".to_string(),
        pipeline_source: source,
        ref_name: ref_name.to_string(),
        before_sha: before_sha.to_string(),
        merge_request_diff_base_sha: before_sha.to_string(),
    }
}

#[test]
fn test_integration_feature_branch_with_changelog_passes() {
    let temp_dir = TempDir::new().unwrap();
    init_repo(temp_dir.path());
    git(temp_dir.path(), &["checkout", "-q", "-b", "feature"]);
    commit_file(temp_dir.path(), "src/lib.rs", "pub fn answer() -> u32 { 43 }\n", "fix");
    commit_file(
        temp_dir.path(),
        "CHANGELOG.md",
        "# Changelog\n\n- fixed the answer\n",
        "changelog",
    );

    let cli = GitCli::discover(temp_dir.path(), "git").unwrap();
    let checker = ChangelogGateChecker::new(GateConfig::default());
    let report = checker.check(&context(PipelineSource::Push, "feature", "0000"), &cli);

    assert_eq!(report.outcome, GateOutcome::PolicyPass);
    assert_eq!(report.range.as_deref(), Some("main.."));
    assert!(
        report
            .changed_files
            .iter()
            .any(|f| f.path == "CHANGELOG.md" && f.change_type == ChangeType::Modified)
    );
}

#[test]
fn test_integration_feature_branch_without_changelog_fails() {
    let temp_dir = TempDir::new().unwrap();
    init_repo(temp_dir.path());
    git(temp_dir.path(), &["checkout", "-q", "-b", "feature"]);
    commit_file(temp_dir.path(), "src/main.py", "print('hi')\n", "add script");

    let cli = GitCli::discover(temp_dir.path(), "git").unwrap();
    let checker = ChangelogGateChecker::new(GateConfig::default());
    let report = checker.check(&context(PipelineSource::Push, "feature", "0000"), &cli);

    assert_eq!(report.outcome, GateOutcome::PolicyFail);
    assert_eq!(report.changed_files.len(), 1);
    assert_eq!(report.changed_files[0].path, "src/main.py");
    assert_eq!(report.changed_files[0].change_type, ChangeType::Added);
}

#[test]
fn test_integration_push_to_main_uses_before_sha() {
    let temp_dir = TempDir::new().unwrap();
    let before = init_repo(temp_dir.path());
    commit_file(
        temp_dir.path(),
        "docs/changelog/unreleased.md",
        "- new entry\n",
        "add entry",
    );

    let cli = GitCli::discover(temp_dir.path(), "git").unwrap();
    let checker = ChangelogGateChecker::new(GateConfig::default());
    let report = checker.check(&context(PipelineSource::Push, "main", &before), &cli);

    assert_eq!(report.range, Some(format!("{}..", before)));
    assert_eq!(report.outcome, GateOutcome::PolicyPass);
}

#[test]
fn test_integration_deleted_changelog_does_not_count() {
    let temp_dir = TempDir::new().unwrap();
    let before = init_repo(temp_dir.path());
    git(temp_dir.path(), &["rm", "-q", "CHANGELOG.md"]);
    git(temp_dir.path(), &["commit", "-q", "-m", "drop changelog"]);

    let cli = GitCli::discover(temp_dir.path(), "git").unwrap();
    let checker = ChangelogGateChecker::new(GateConfig::default());
    let report = checker.check(
        &context(PipelineSource::MergeRequestEvent, "feature", &before),
        &cli,
    );

    assert_eq!(report.outcome, GateOutcome::PolicyFail);
    assert_eq!(report.changed_files[0].change_type, ChangeType::Deleted);
}

#[test]
fn test_integration_bad_range_reports_stderr() {
    let temp_dir = TempDir::new().unwrap();
    init_repo(temp_dir.path());

    let cli = GitCli::discover(temp_dir.path(), "git").unwrap();
    let output = cli
        .diff_tree(&RevisionRange::from_base("no-such-branch"))
        .unwrap();
    assert!(output.has_errors());

    let checker = ChangelogGateChecker::new(GateConfig::new().main_branch("no-such-branch"));
    let report = checker.check(&context(PipelineSource::Push, "feature", "0000"), &cli);

    match report.outcome {
        GateOutcome::InfraError { error } => assert!(error.contains("fatal")),
        other => panic!("expected infra error, got {:?}", other),
    }
}
