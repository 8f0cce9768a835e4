pub mod cli;
pub mod commands;
pub mod config;
pub mod http;
pub mod render;

pub use http::HttpStore;

/// Install env_logger on stderr. RUST_LOG wins over the default filter.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .try_init();
}
