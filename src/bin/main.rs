use anyhow::{Context, Result};
use changelog_gate::{ChangelogGateChecker, GateConfig, GateReport, GitCli, TriggerContext};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "changelog-gate")]
#[command(version, about = "fail a CI pipeline when the changelog was not updated")]
#[command(
    after_help = "Reads CI_COMMIT_MESSAGE, CI_PIPELINE_SOURCE, CI_COMMIT_REF_NAME, \
CI_COMMIT_BEFORE_SHA and CI_MERGE_REQUEST_DIFF_BASE_SHA. Only CI_COMMIT_MESSAGE is \
needed when it contains a skip-changelog marker; otherwise all five must be set."
)]
struct Cli {
    /// path inside the repository (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    path: PathBuf,

    /// configuration file (defaults to changelog-gate.toml in the repository root)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// name of the main branch
    #[arg(long)]
    main_branch: Option<String>,

    /// git executable used for the diff query
    #[arg(long)]
    git: Option<String>,

    /// output format (json or human)
    #[arg(short, long, default_value = "human")]
    format: OutputFormat,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Json,
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" => Ok(OutputFormat::Human),
            _ => Err(format!(
                "invalid output format: {}, use 'json' or 'human'",
                s
            )),
        }
    }
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();

    // a skipped check needs nothing but the commit message
    let message =
        TriggerContext::commit_message_from_env().context("failed to read CI trigger context")?;
    if ChangelogGateChecker::is_skip_requested(&message) {
        return emit(&GateReport::skipped(), &cli.format);
    }

    let context = TriggerContext::from_env().context("failed to read CI trigger context")?;

    let repo_root = GitCli::detect_repository_root(&cli.path)
        .with_context(|| format!("failed to open git repository at {}", cli.path.display()))?;
    let config = load_config(&cli, &repo_root)?;
    log::debug!("using configuration {:?}", config);

    let git = GitCli::new(&repo_root, config.git_program.clone());
    let checker = ChangelogGateChecker::new(config);
    let report = checker.check(&context, &git);

    emit(&report, &cli.format)
}

fn load_config(cli: &Cli, repo_root: &Path) -> Result<GateConfig> {
    let mut config = match &cli.config {
        Some(path) => GateConfig::load_from_file(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => GateConfig::load_or_default(repo_root).context("failed to load configuration")?,
    };

    if let Some(main_branch) = &cli.main_branch {
        config.main_branch = main_branch.clone();
    }
    if let Some(git) = &cli.git {
        config.git_program = git.clone();
    }

    Ok(config)
}

fn emit(report: &GateReport, format: &OutputFormat) -> Result<ExitCode> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Json => report.render_json(&mut out)?,
        OutputFormat::Human => report.render_human(&mut out)?,
    }
    out.flush()?;

    log::info!("gate finished: {:?}", report.outcome);
    Ok(ExitCode::from(report.exit_code()))
}
