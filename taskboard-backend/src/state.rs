//! Shared application state passed to axum handlers.

use std::sync::{Arc, Mutex};

use taskboard_core::{MemoryStore, StoreEvent};
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub event_tx: broadcast::Sender<StoreEvent>,
    pub port: u16,
    pub bind_address: String,
    /// Port actually bound (differs from `port` when 0 was requested).
    pub live_port: Arc<Mutex<u16>>,
}

impl AppState {
    /// Wrap a store, wiring its change events into a fresh channel.
    pub fn new(store: MemoryStore, port: u16, bind_address: impl Into<String>) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            store: Arc::new(store.with_events(event_tx.clone())),
            event_tx,
            port,
            bind_address: bind_address.into(),
            live_port: Arc::new(Mutex::new(port)),
        }
    }
}
