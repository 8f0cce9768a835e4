use clap::Parser;
use std::path::PathBuf;
use taskboard_backend::{config, log_bridge};

/// REST backend serving boards, columns, tasks and users from memory.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (default: ~/.config/taskboard/backend.json)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Port to listen on (0 picks a free port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,

    /// Seed file with initial users and boards
    #[arg(long, value_name = "FILE")]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = log_bridge::init() {
        eprintln!("failed to initialize logger: {}", e);
    }

    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(config::default_config_path);
    let mut config = config::load_config(&config_path);
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let (_state, port) = taskboard_backend::start(&config).await?;
    println!("taskboard backend on http://{}:{}", config.bind_address, port);

    tokio::signal::ctrl_c().await?;
    log::info!(target: "taskboard.backend", "Shutting down");
    Ok(())
}
