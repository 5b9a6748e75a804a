//! claude-commit - CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use claude_commit::agent::generate_commit_message;
use claude_commit::config::{DEFAULT_MAX_DIFF_LINES, RunConfig};
use claude_commit::git::resolve_workdir;
use claude_commit::{ClaudeCliSession, Reporter, Spinner, SystemEffects, dispatch};

/// Exit status after an operator interrupt.
const EXIT_INTERRUPTED: u8 = 130;

const EXAMPLES: &str = "\
Examples:
  # Generate commit message for staged changes
  claude-commit

  # Generate message for all changes (staged + unstaged)
  claude-commit --all

  # Show verbose output with analysis details
  claude-commit --verbose

  # Generate message and copy to clipboard (requires pbcopy/xclip)
  claude-commit --copy

  # Commit with the generated message after confirmation
  claude-commit --commit

  # Preview without any action
  claude-commit --preview";

/// Generate AI-powered git commit messages using Claude.
#[derive(Parser, Debug)]
#[command(name = "claude-commit")]
#[command(about = "Generate AI-powered git commit messages using Claude")]
#[command(version)]
#[command(after_help = EXAMPLES)]
struct Cli {
    /// Analyze all changes, not just staged ones
    #[arg(short, long)]
    all: bool,

    /// Show detailed analysis and processing information
    #[arg(short, long)]
    verbose: bool,

    /// Path to git repository (defaults to current directory)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Maximum number of diff lines to analyze
    #[arg(long, default_value_t = DEFAULT_MAX_DIFF_LINES)]
    max_diff_lines: usize,

    /// Commit with the generated message (asks for confirmation)
    #[arg(short, long)]
    commit: bool,

    /// Copy the generated message to clipboard
    #[arg(long)]
    copy: bool,

    /// Just preview the message without any action
    #[arg(long)]
    preview: bool,
}

impl Cli {
    fn into_run_config(self) -> RunConfig {
        RunConfig {
            repository_path: self.path.unwrap_or_else(|| PathBuf::from(".")),
            staged_only: !self.all,
            verbose: self.verbose,
            max_diff_lines: self.max_diff_lines,
            commit: self.commit,
            copy: self.copy,
            preview: self.preview,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let reporter = Reporter::new(cli.verbose);
    match run(cli.into_run_config(), &reporter).await {
        Ok(code) => code,
        Err(e) => {
            reporter.error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(config: RunConfig, reporter: &Reporter) -> Result<ExitCode> {
    // Step 1: Locate the repository
    let config = with_resolved_repository(config)?;

    // Step 2: Let Claude analyze the changes, unless interrupted
    let agent = ClaudeCliSession::new();
    let mut spinner = (!config.verbose).then(|| Spinner::new("Analyzing changes with Claude..."));

    let generation = generate_commit_message(&agent, &config, reporter, spinner.as_mut());
    let generated = tokio::select! {
        message = generation => Some(message),
        _ = interrupted() => None,
    };

    if let Some(spinner) = spinner.as_mut() {
        spinner.stop();
    }

    let Some(message) = generated else {
        reporter.warn("Interrupted by user");
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    };

    let Some(message) = message else {
        reporter.error("Failed to generate commit message");
        return Ok(ExitCode::FAILURE);
    };

    // Step 3: Act on the message
    let effects = SystemEffects::new(config.repository_path.clone());
    dispatch(&message, &config, &effects, reporter).context("Failed to commit")?;

    Ok(ExitCode::SUCCESS)
}

/// The run configuration pointed at the working tree containing its path.
fn with_resolved_repository(config: RunConfig) -> Result<RunConfig> {
    let workdir = resolve_workdir(&config.repository_path).context(
        "Not a git repository. Run claude-commit from within a git repository or pass --path.",
    )?;
    Ok(RunConfig {
        repository_path: workdir,
        ..config
    })
}

/// Resolves on Ctrl-C. Never resolves if the handler can't be installed.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "warn,claude_commit=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
