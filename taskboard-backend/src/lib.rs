pub mod api;
/// taskboard backend: config loading, store setup, HTTP server.
pub mod config;
pub mod log_bridge;
pub mod server;
pub mod state;

use crate::config::BackendConfig;
use crate::state::AppState;
use taskboard_core::{MemoryStore, Seed, SeedError};

#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("Could not load seed: {0}")]
    Seed(#[from] SeedError),

    #[error("Could not bind HTTP server: {0}")]
    Bind(#[from] std::io::Error),
}

/// Build the store described by `config` (seeded or empty).
pub fn build_store(config: &BackendConfig) -> Result<MemoryStore, SeedError> {
    match &config.seed {
        Some(path) => {
            let seed = Seed::from_file(path)?;
            log::info!(
                target: "taskboard.backend",
                "Seeding {} board(s) and {} user(s) from {}",
                seed.boards.len(),
                seed.users.len(),
                path.display()
            );
            Ok(MemoryStore::from_seed(seed))
        }
        None => Ok(MemoryStore::new()),
    }
}

/// Build the store, bind and serve in the background.
/// Returns the shared state and the bound port.
pub async fn start(config: &BackendConfig) -> Result<(AppState, u16), StartError> {
    let store = build_store(config)?;
    let state = AppState::new(store, config.port, config.bind_address.clone());
    let port = server::spawn_server(state.clone()).await?;
    Ok((state, port))
}
