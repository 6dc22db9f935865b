use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ccf_compare::{ChangedCodeFileLister, ListOutcome};
use ccf_core::{CcfConfig, CcfError, ReferencePair, SuffixMatching, DEFAULT_CONFIG_FILE};
use clap::Parser;
use miette::{IntoDiagnostic, Result};

const LONG_ABOUT: &str = "\
List the code files changed between two commits.

Reads GITHUB_BASE_SHA and GITHUB_HEAD_SHA, asks the GitHub compare API
which files changed, drops CI config, docs, Helm charts and Markdown/
reStructuredText files, and prints the rest one per line.

Exits with status 1 when a commit is missing or nothing changed.

Environment:
  GITHUB_BASE_SHA    Base commit (required)
  GITHUB_HEAD_SHA    Head commit (required)
  GITHUB_REPOSITORY  Repository to compare; overrides the config file.
                     GitHub Actions always sets this to the repository
                     running the job. --repository overrides it.
  GITHUB_API_URL     API root; overrides the config file
  GITHUB_TOKEN       Bearer token, sent when set

Examples:
  GITHUB_BASE_SHA=abc GITHUB_HEAD_SHA=def changed-code-files
  changed-code-files --repository octocat/hello-world --anchored-suffixes";

#[derive(Parser)]
#[command(
    name = "changed-code-files",
    version,
    about = "List the code files changed between two commits",
    long_about = LONG_ABOUT
)]
struct Cli {
    /// Path to configuration file (default: .changed-code-files.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Repository to compare in owner/repo form (overrides GITHUB_REPOSITORY)
    #[arg(long)]
    repository: Option<String>,

    /// Only exclude .md/.rst when the extension ends the path
    #[arg(long)]
    anchored_suffixes: bool,

    /// Only log warnings and errors
    #[arg(long, short)]
    quiet: bool,
}

fn load_config(cli: &Cli) -> Result<CcfConfig> {
    let mut config = match &cli.config {
        Some(path) => CcfConfig::from_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                CcfConfig::from_file(default_path)?
            } else {
                CcfConfig::default()
            }
        }
    };

    config.apply_env(|key| std::env::var(key).ok())?;

    if let Some(repository) = &cli.repository {
        config.github.repository = repository.clone();
        config.github.validate()?;
    }
    if cli.anchored_suffixes {
        config.filter.suffix_matching = SuffixMatching::Anchored;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let log_level = if cli.quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::DEBUG
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let refs = match ReferencePair::from_env() {
        Ok(refs) => refs,
        Err(err @ CcfError::MissingReference { .. }) => {
            tracing::warn!("{err}");
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err.into()),
    };

    let config = load_config(&cli)?;
    let lister = ChangedCodeFileLister::from_config(&config)?;

    match lister.list(&refs).await? {
        ListOutcome::CodeFiles(result) => {
            let mut stdout = std::io::stdout().lock();
            for path in &result.kept {
                writeln!(stdout, "{path}").into_diagnostic()?;
            }
            stdout.flush().into_diagnostic()?;
            Ok(ExitCode::SUCCESS)
        }
        ListOutcome::NoChangedFiles | ListOutcome::FetchFailed(_) => {
            tracing::warn!("could not find any commit files");
            Ok(ExitCode::FAILURE)
        }
    }
}
