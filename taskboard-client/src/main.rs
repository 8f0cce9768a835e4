use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

use taskboard_client::cli::Cli;
use taskboard_client::{commands, config, init_logging, HttpStore};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let mut config = config::load_config(&config_path);
    if let Some(url) = cli.url.clone() {
        config.base_url = url;
    }
    if let Err(e) = config.validate() {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    let store = match HttpStore::new(&config.base_url, config.token.clone(), config.timeout()) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    log::debug!(target: "taskboard.client", "Using backend {}", store.base_url());

    let report = commands::execute(store, cli.command).await;
    print!("{}", report.text);
    if report.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
