pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::*;
use crate::wire::MoveTaskBody;

/// The remote authority for boards, columns, tasks and users.
/// Implementations: MemoryStore (in process), HttpStore (REST, in taskboard-client).
#[async_trait]
pub trait BoardStore: Send + Sync {
    async fn list_boards(&self) -> Result<Vec<Board>, StoreError>;

    async fn get_board(&self, board_id: BoardId) -> Result<Board, StoreError>;

    async fn create_board(&self, name: &str, position: i64) -> Result<Board, StoreError>;

    async fn rename_board(&self, board_id: BoardId, name: &str) -> Result<Board, StoreError>;

    /// Delete a board together with its columns and their tasks.
    async fn delete_board(&self, board_id: BoardId) -> Result<(), StoreError>;

    /// Persist a board order; index in `board_ids` becomes the position.
    async fn reorder_boards(&self, board_ids: &[BoardId]) -> Result<(), StoreError>;

    async fn list_columns(&self, board_id: BoardId) -> Result<Vec<BoardColumn>, StoreError>;

    async fn create_column(
        &self,
        board_id: BoardId,
        name: &str,
        position: i64,
    ) -> Result<BoardColumn, StoreError>;

    /// Apply a full `{id, position}` set in one call.
    async fn reorder_columns(&self, items: &[PositionItem]) -> Result<(), StoreError>;

    async fn list_tasks(&self, column_id: ColumnId) -> Result<Vec<Task>, StoreError>;

    async fn create_task(
        &self,
        column_id: ColumnId,
        task: &NewTask,
        position: i64,
    ) -> Result<Task, StoreError>;

    async fn update_task(&self, task_id: TaskId, update: &TaskUpdate) -> Result<Task, StoreError>;

    async fn assign_task(&self, task_id: TaskId, user_id: Option<UserId>)
        -> Result<Task, StoreError>;

    /// Move a task into `board_column_id` at `position` (same column = reorder).
    async fn move_task(&self, task_id: TaskId, target: MoveTaskBody) -> Result<(), StoreError>;

    async fn delete_task(&self, task_id: TaskId) -> Result<(), StoreError>;

    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: i64 },

    #[error("Invalid request: {0}")]
    Invalid(String),

    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Could not decode response: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn board(id: BoardId) -> Self {
        StoreError::NotFound { kind: "Board", id }
    }

    pub fn column(id: ColumnId) -> Self {
        StoreError::NotFound { kind: "Column", id }
    }

    pub fn task(id: TaskId) -> Self {
        StoreError::NotFound { kind: "Task", id }
    }

    pub fn user(id: UserId) -> Self {
        StoreError::NotFound { kind: "User", id }
    }
}

/// Change notifications emitted by an authoritative store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StoreEvent {
    BoardListChanged { version: u64 },
    BoardChanged { board_id: BoardId, version: u64 },
}
