use clap::Parser;
use elbmon::cli::Cli;
use elbmon::{app, logging, report};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let outcome = app::run(&cli).await;
    report::print_status(&outcome);
    std::process::exit(outcome.status.exit_code());
}
