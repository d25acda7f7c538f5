mod cli;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use unireap_core::SiteOutcome;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose, cli.global.quiet);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, quiet: bool) {
    let filter = match (quiet, verbosity) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command.unwrap_or(Command::Run) {
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "unireap", &mut std::io::stdout());
            Ok(())
        }

        Command::Run => reap(&cli.global).await,
    }
}

/// Run every configured site, print the report, and surface the first failure.
async fn reap(global: &GlobalOpts) -> Result<(), CliError> {
    let config = config::resolve_run_config(global)?;
    tracing::info!(
        sites = config.sites.len(),
        dry_run = config.options.dry_run,
        policy = ?config.failure_policy,
        "configuration loaded"
    );

    let report = unireap_core::run_all(&config).await;

    let rendered = output::render_report(
        global.output,
        &report,
        output::should_color(global.color),
    )?;
    output::print_output(&rendered, global.quiet);

    let failures = report.failures().count();
    if failures > 1 {
        tracing::warn!(failures, "more than one site failed; reporting the first");
    }

    let first_failure = report.outcomes.into_iter().find_map(|outcome| match outcome {
        SiteOutcome::Failed(err) => Some(err),
        SiteOutcome::Completed(_) => None,
    });
    first_failure.map_or(Ok(()), |err| Err(err.into()))
}
