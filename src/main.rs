use std::process::ExitCode;

use btc_balance::{
    cli::{args::Cli, cli_adapter::CliAdapter},
    config::{ConfigStore, StdinPrompter},
    prettyprint::prettyprint::PrettyFormatter,
};
use clap::Parser;
use tracing::{error, info};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    info!("Starting btc-balance");

    let cli_adapter = CliAdapter::new(ConfigStore::new(cli.config.clone()));
    let mut prompter = StdinPrompter::new();

    match cli_adapter.handle(cli.command(), &mut prompter).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(report) => {
            error!("Command failed: {:?}", report);
            ExitCode::FAILURE
        }
    }
}

fn setup_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("btc_balance={level}")));

    let indicatif_layer = IndicatifLayer::new();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(PrettyFormatter::new(true))
        .with_writer(indicatif_layer.get_stderr_writer());

    Registry::default()
        .with(filter)
        .with(indicatif_layer)
        .with(stderr_layer)
        .init();
}
