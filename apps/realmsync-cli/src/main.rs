//! realmsync - load roles, groups and users from a spreadsheet into an
//! identity realm
//!
//! With no flags the Roles, Groups and Users sheets are loaded in that order.
//! `--groups`, `--users` and `--delete` select individual passes.

use clap::Parser;
use tracing::info;

use realmsync_cli::cli::Cli;
use realmsync_cli::config::LoaderConfig;
use realmsync_cli::error::{LoaderError, LoaderResult};
use realmsync_cli::logging::init_logging;
use realmsync_cli::pipeline;
use realmsync_cli::reconcile::{ReconcileReport, Reconciler};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> LoaderResult<()> {
    init_logging(&cli.log_file, cli.verbose)?;

    let config = LoaderConfig::from_env()?;
    info!(realm = %config.realm, host = %config.host, file = %cli.file.display(), "starting");

    let reconciler = Reconciler::connect(&config).await?;
    let reports = pipeline::run(&reconciler, &cli.file, cli.passes()).await?;

    print_reports(&reports, cli.json)?;

    let failed: usize = reports.iter().map(|r| r.failed).sum();
    info!(failed, "finished");

    if cli.strict && failed > 0 {
        return Err(LoaderError::RowsFailed { failed });
    }
    Ok(())
}

fn print_reports(reports: &[ReconcileReport], json: bool) -> LoaderResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
        return Ok(());
    }

    for report in reports {
        report.print();
    }
    Ok(())
}
