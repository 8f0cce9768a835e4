pub mod cache;
pub mod controller;
pub mod directory;
pub mod drag;
pub mod engine;
pub mod notify;
pub mod ordering;
pub mod store;
pub mod types;
pub mod wire;

pub use cache::{BoardCache, CacheUpdate};
pub use controller::{BoardController, CommittedDrop, DropOutcome};
pub use directory::BoardDirectory;
pub use drag::{DragSession, DragTarget, TaskOrigin};
pub use engine::{DropKind, DropPlan, PendingWrite};
pub use notify::{Notice, NoticeLevel, Notifier};
pub use store::memory::{MemoryStore, Seed, SeedError};
pub use store::{BoardStore, StoreError, StoreEvent};
