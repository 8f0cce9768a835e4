//! Process logger: env_logger output on stderr plus an in-memory ring of the
//! most recent entries, served by `/logs` and `/logs/stream`.

use env_logger::Logger;
use log::{Log, Metadata, Record, SetLoggerError};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{LazyLock, Mutex};
use tokio::sync::broadcast;

const MAX_LOG_ENTRIES: usize = 2000;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp_ms: u64,
    pub level: String,
    pub target: String,
    pub message: String,
}

struct LogRing {
    capacity: usize,
    entries: Mutex<VecDeque<LogEntry>>,
    tx: broadcast::Sender<LogEntry>,
}

impl LogRing {
    fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(512);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            tx,
        }
    }

    fn push(&self, entry: LogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push_back(entry.clone());
            while entries.len() > self.capacity {
                entries.pop_front();
            }
        }
        let _ = self.tx.send(entry);
    }

    fn snapshot(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }
}

static LOG_RING: LazyLock<LogRing> = LazyLock::new(|| LogRing::with_capacity(MAX_LOG_ENTRIES));

struct BroadcastLogger {
    inner: Logger,
}

impl Log for BroadcastLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.inner.log(record);
        LOG_RING.push(LogEntry {
            timestamp_ms: now_ms(),
            level: record.level().to_string().to_lowercase(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        });
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Install the logger. Filter comes from RUST_LOG, default `warn`.
pub fn init() -> Result<(), SetLoggerError> {
    let builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .build();
    let max_level = builder.filter();
    let logger = Box::leak(Box::new(BroadcastLogger { inner: builder }));
    log::set_logger(logger)?;
    log::set_max_level(max_level);
    Ok(())
}

pub fn recent_entries() -> Vec<LogEntry> {
    LOG_RING.snapshot()
}

pub fn subscribe() -> broadcast::Receiver<LogEntry> {
    LOG_RING.tx.subscribe()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize) -> LogEntry {
        LogEntry {
            timestamp_ms: n as u64,
            level: "info".to_string(),
            target: "test".to_string(),
            message: format!("entry {}", n),
        }
    }

    #[test]
    fn test_ring_keeps_newest_entries() {
        let ring = LogRing::with_capacity(3);
        for n in 0..5 {
            ring.push(entry(n));
        }
        let messages: Vec<String> = ring.snapshot().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["entry 2", "entry 3", "entry 4"]);
    }

    #[test]
    fn test_ring_broadcasts_pushes() {
        let ring = LogRing::with_capacity(3);
        let mut rx = ring.tx.subscribe();
        ring.push(entry(7));
        assert_eq!(rx.try_recv().unwrap().timestamp_ms, 7);
    }
}
