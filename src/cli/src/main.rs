//! CLI for the Renovate configuration test harness.
//!
//! Runs declarative scenarios against the shared test repository, resets it,
//! or prints its current state in snapshot form.

use clap::{Parser, Subcommand};
use renovate_harness::{
    CleanupReport, InspectReport, RunSummary, Runner, RunnerConfig, RunnerError, ScenarioOutcome,
    Token,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Renovate Harness - Run Renovate against a scratch repository and check what it opens.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a harness.toml; built-in defaults apply without one.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// GitHub token with write access to the test repository.
    /// Falls back to `gh auth token` when unset.
    #[arg(long, env = "TEST_GITHUB_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run scenarios and compare their snapshots.
    Run {
        /// Path to scenarios folder.
        #[arg(long, default_value = "scenarios/")]
        scenarios_path: PathBuf,

        /// Only run scenarios whose id or name contains this text.
        #[arg(long)]
        filter: Option<String>,

        /// Stop after the first failing scenario.
        #[arg(long)]
        fail_fast: bool,
    },

    /// Delete every non-default branch of the test repository.
    Cleanup,

    /// Print the open pull requests and default branch history as snapshots.
    Inspect,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    match dispatch(args).await {
        Ok(Report::Run(summary)) => {
            print_summary(&summary);

            if !summary.all_success() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Ok(Report::Cleanup(report)) => {
            print_cleanup(&report);
            ExitCode::from(0)
        }
        Ok(Report::Inspect(report)) => {
            print_inspect(&report);
            ExitCode::from(0)
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Compact single-line output; `RUST_LOG` overrides the default "info" level.
/// Renovate's own output is forwarded line by line at info level.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

enum Report {
    Run(RunSummary),
    Cleanup(CleanupReport),
    Inspect(InspectReport),
}

async fn dispatch(args: Args) -> Result<Report, RunnerError> {
    let scenarios_path = match &args.command {
        Command::Run { scenarios_path, .. } => scenarios_path.clone(),
        Command::Cleanup | Command::Inspect => PathBuf::from("scenarios/"),
    };

    let mut config = RunnerConfig::new(scenarios_path);
    if let Some(path) = args.config {
        config = config.with_config_path(path);
    }
    if let Some(token) = args.token.filter(|t| !t.trim().is_empty()) {
        config = config.with_token(Token::new(token.trim()));
    }
    if let Command::Run {
        filter, fail_fast, ..
    } = &args.command
    {
        if let Some(filter) = filter {
            config = config.with_filter(filter.as_str());
        }
        config = config.with_fail_fast(*fail_fast);
    }

    let runner = Runner::connect(config).await?;

    match args.command {
        Command::Run { .. } => runner.run().await.map(Report::Run),
        Command::Cleanup => runner.cleanup().await.map(Report::Cleanup),
        Command::Inspect => runner.inspect().await.map(Report::Inspect),
    }
}

/// Prints the final run summary, followed by any recorded snapshots.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!("  Scenarios selected: {}", summary.scenarios_selected);
    println!("  Passed: {}", summary.passed);
    println!("  Recorded: {}", summary.recorded);
    println!("  Failed: {}", summary.failed);
    println!("  Skipped: {}", summary.skipped);

    for outcome in &summary.outcomes {
        match outcome {
            ScenarioOutcome::Passed { .. } => {}
            ScenarioOutcome::Failed { id, error } => {
                println!("\n[FAILED] {id}\n{error}");
            }
            ScenarioOutcome::Recorded { id, snapshots } => {
                println!("\n[RECORDED] {id}");
                for snapshot in snapshots {
                    println!("{} = '''\n{}\n'''", snapshot.kind.as_str(), snapshot.text);
                }
            }
        }
    }
}

fn print_cleanup(report: &CleanupReport) {
    println!("\nCleanup:");
    println!("  Branches deleted: {}", report.deleted.len());
    for branch in &report.deleted {
        println!("    {branch}");
    }
    println!("  Already gone: {}", report.already_gone.len());
}

fn print_inspect(report: &InspectReport) {
    println!("expected-pull-requests = '''\n{}\n'''", report.pull_requests);
    println!("expected-commits = '''\n{}\n'''", report.commits);
}
