use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use waylapse_runner::{run_analyze, run_fetch, Cli, Command, RunnerError};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), RunnerError> {
    match cli.command {
        Command::Fetch(args) => {
            let stats = run_fetch(&args)?;
            info!(
                unique = stats.unique,
                duplicates = stats.duplicates,
                points = stats.points,
                releases = stats.releases,
                "done"
            );
        }
        Command::Analyze(args) => {
            let summary = run_analyze(&args)?;
            info!(
                analyzed = summary.analyzed,
                min = summary.stats.min,
                max = summary.stats.max,
                avg = summary.stats.avg,
                "done"
            );
        }
    }
    Ok(())
}
