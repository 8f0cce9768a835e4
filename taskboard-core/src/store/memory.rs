//! In-process authoritative board store.
//!
//! Holds boards, columns, tasks and users behind one RwLock with:
//! - ids allocated from a single monotonic counter
//! - dense positions re-established on every structural change
//! - a monotonic version bumped on every mutation
//! - optional change broadcast for SSE consumers

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::broadcast;

use super::{BoardStore, StoreError, StoreEvent};
use crate::types::*;
use crate::wire::MoveTaskBody;

#[derive(Debug, Default)]
struct StoreState {
    boards: Vec<Board>,
    /// column_id -> (owning board, column)
    columns: HashMap<ColumnId, (BoardId, BoardColumn)>,
    tasks: HashMap<TaskId, Task>,
    users: Vec<User>,
}

impl StoreState {
    fn board_exists(&self, board_id: BoardId) -> bool {
        self.boards.iter().any(|b| b.id == board_id)
    }

    fn board_of_column(&self, column_id: ColumnId) -> Option<BoardId> {
        self.columns.get(&column_id).map(|(board_id, _)| *board_id)
    }

    /// Column ids of a board ordered by (position, id).
    fn ordered_columns(&self, board_id: BoardId) -> Vec<ColumnId> {
        let mut cols: Vec<&BoardColumn> = self
            .columns
            .values()
            .filter(|(owner, _)| *owner == board_id)
            .map(|(_, col)| col)
            .collect();
        cols.sort_by_key(|c| (c.position, c.id));
        cols.into_iter().map(|c| c.id).collect()
    }

    /// Task ids of a column ordered by (position, id).
    fn ordered_tasks(&self, column_id: ColumnId) -> Vec<TaskId> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .values()
            .filter(|t| t.board_column_id == column_id)
            .collect();
        tasks.sort_by_key(|t| (t.position, t.id));
        tasks.into_iter().map(|t| t.id).collect()
    }

    fn renumber_columns(&mut self, order: &[ColumnId]) {
        for (index, id) in order.iter().enumerate() {
            if let Some((_, col)) = self.columns.get_mut(id) {
                col.position = index as i64;
            }
        }
    }

    fn renumber_tasks(&mut self, column_id: ColumnId, order: &[TaskId]) {
        for (index, id) in order.iter().enumerate() {
            if let Some(task) = self.tasks.get_mut(id) {
                task.board_column_id = column_id;
                task.position = index as i64;
            }
        }
    }

    fn renumber_boards(&mut self) {
        for (index, board) in self.boards.iter_mut().enumerate() {
            board.position = Some(index as i64);
        }
    }

    fn user_exists(&self, user_id: UserId) -> bool {
        self.users.iter().any(|u| u.id == user_id)
    }
}

fn clamp_index(position: i64, len: usize) -> usize {
    position.clamp(0, len as i64) as usize
}

pub struct MemoryStore {
    state: RwLock<StoreState>,
    next_id: AtomicI64,
    next_version: AtomicU64,
    events: Option<broadcast::Sender<StoreEvent>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            next_id: AtomicI64::new(1),
            next_version: AtomicU64::new(1),
            events: None,
        }
    }

    /// Broadcast a StoreEvent after every successful mutation.
    pub fn with_events(mut self, tx: broadcast::Sender<StoreEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    /// Build a store pre-populated from a seed document.
    pub fn from_seed(seed: Seed) -> Self {
        let store = Self::new();
        {
            let mut state = store.write();
            state.users = seed.users;
            for (board_index, seed_board) in seed.boards.into_iter().enumerate() {
                let board_id = store.allocate_id();
                state.boards.push(Board {
                    id: board_id,
                    name: seed_board.name,
                    position: Some(board_index as i64),
                    created_at: Some(chrono::Utc::now().to_rfc3339()),
                });
                for (col_index, seed_col) in seed_board.columns.into_iter().enumerate() {
                    let column_id = store.allocate_id();
                    state.columns.insert(
                        column_id,
                        (
                            board_id,
                            BoardColumn {
                                id: column_id,
                                name: seed_col.name,
                                position: col_index as i64,
                            },
                        ),
                    );
                    for (task_index, seed_task) in seed_col.tasks.into_iter().enumerate() {
                        let task_id = store.allocate_id();
                        state.tasks.insert(
                            task_id,
                            Task {
                                id: task_id,
                                name: seed_task.name,
                                description: seed_task.description,
                                position: task_index as i64,
                                board_column_id: column_id,
                                assigned_user_id: seed_task.assigned_user_id,
                            },
                        );
                    }
                }
            }
        }
        store
    }

    /// Current version (the version of the last mutation, 0 if none).
    pub fn version(&self) -> u64 {
        self.next_version.load(Ordering::Relaxed) - 1
    }

    /// Register an assignable user. Replaces a user with the same id.
    pub fn upsert_user(&self, user: User) {
        let mut state = self.write();
        state.users.retain(|u| u.id != user.id);
        state.users.push(user);
        state.users.sort_by_key(|u| u.id);
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn board_changed(&self, board_id: BoardId) {
        let version = self.next_version.fetch_add(1, Ordering::Relaxed);
        log::debug!(target: "taskboard.store", "Board {} changed (v{})", board_id, version);
        if let Some(tx) = &self.events {
            let _ = tx.send(StoreEvent::BoardChanged { board_id, version });
        }
    }

    fn board_list_changed(&self) {
        let version = self.next_version.fetch_add(1, Ordering::Relaxed);
        log::debug!(target: "taskboard.store", "Board list changed (v{})", version);
        if let Some(tx) = &self.events {
            let _ = tx.send(StoreEvent::BoardListChanged { version });
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn list_boards(&self) -> Result<Vec<Board>, StoreError> {
        Ok(self.read().boards.clone())
    }

    async fn get_board(&self, board_id: BoardId) -> Result<Board, StoreError> {
        self.read()
            .boards
            .iter()
            .find(|b| b.id == board_id)
            .cloned()
            .ok_or(StoreError::board(board_id))
    }

    async fn create_board(&self, name: &str, position: i64) -> Result<Board, StoreError> {
        if is_blank(name) {
            return Err(StoreError::Invalid("Board name is required".to_string()));
        }
        let board = {
            let mut state = self.write();
            let board = Board {
                id: self.allocate_id(),
                name: name.trim().to_string(),
                position: None,
                created_at: Some(chrono::Utc::now().to_rfc3339()),
            };
            let index = clamp_index(position, state.boards.len());
            state.boards.insert(index, board);
            state.renumber_boards();
            state.boards[index].clone()
        };
        self.board_list_changed();
        Ok(board)
    }

    async fn rename_board(&self, board_id: BoardId, name: &str) -> Result<Board, StoreError> {
        if is_blank(name) {
            return Err(StoreError::Invalid("Board name is required".to_string()));
        }
        let board = {
            let mut state = self.write();
            let board = state
                .boards
                .iter_mut()
                .find(|b| b.id == board_id)
                .ok_or(StoreError::board(board_id))?;
            board.name = name.trim().to_string();
            board.clone()
        };
        self.board_list_changed();
        Ok(board)
    }

    async fn delete_board(&self, board_id: BoardId) -> Result<(), StoreError> {
        {
            let mut state = self.write();
            if !state.board_exists(board_id) {
                return Err(StoreError::board(board_id));
            }
            state.boards.retain(|b| b.id != board_id);
            state.renumber_boards();
            let doomed: Vec<ColumnId> = state
                .columns
                .iter()
                .filter(|(_, (owner, _))| *owner == board_id)
                .map(|(id, _)| *id)
                .collect();
            for column_id in &doomed {
                state.columns.remove(column_id);
            }
            state
                .tasks
                .retain(|_, task| !doomed.contains(&task.board_column_id));
        }
        self.board_list_changed();
        Ok(())
    }

    async fn reorder_boards(&self, board_ids: &[BoardId]) -> Result<(), StoreError> {
        {
            let mut state = self.write();
            if let Some(missing) = board_ids.iter().find(|id| !state.board_exists(**id)) {
                return Err(StoreError::board(*missing));
            }
            let mut reordered: Vec<Board> = board_ids
                .iter()
                .filter_map(|id| state.boards.iter().find(|b| b.id == *id).cloned())
                .collect();
            let rest: Vec<Board> = state
                .boards
                .iter()
                .filter(|b| !board_ids.contains(&b.id))
                .cloned()
                .collect();
            reordered.extend(rest);
            state.boards = reordered;
            state.renumber_boards();
        }
        self.board_list_changed();
        Ok(())
    }

    async fn list_columns(&self, board_id: BoardId) -> Result<Vec<BoardColumn>, StoreError> {
        let state = self.read();
        if !state.board_exists(board_id) {
            return Err(StoreError::board(board_id));
        }
        Ok(state
            .ordered_columns(board_id)
            .iter()
            .filter_map(|id| state.columns.get(id).map(|(_, col)| col.clone()))
            .collect())
    }

    async fn create_column(
        &self,
        board_id: BoardId,
        name: &str,
        position: i64,
    ) -> Result<BoardColumn, StoreError> {
        if is_blank(name) {
            return Err(StoreError::Invalid("Column name is required".to_string()));
        }
        let column = {
            let mut state = self.write();
            if !state.board_exists(board_id) {
                return Err(StoreError::board(board_id));
            }
            let column_id = self.allocate_id();
            let mut order = state.ordered_columns(board_id);
            let index = clamp_index(position, order.len());
            order.insert(index, column_id);
            state.columns.insert(
                column_id,
                (
                    board_id,
                    BoardColumn {
                        id: column_id,
                        name: name.trim().to_string(),
                        position: index as i64,
                    },
                ),
            );
            state.renumber_columns(&order);
            state
                .columns
                .get(&column_id)
                .map(|(_, col)| col.clone())
                .ok_or(StoreError::column(column_id))?
        };
        self.board_changed(board_id);
        Ok(column)
    }

    async fn reorder_columns(&self, items: &[PositionItem]) -> Result<(), StoreError> {
        let touched = {
            let mut state = self.write();
            if let Some(missing) = items.iter().find(|i| !state.columns.contains_key(&i.id)) {
                return Err(StoreError::column(missing.id));
            }
            let mut touched: Vec<BoardId> = Vec::new();
            for item in items {
                if let Some((owner, col)) = state.columns.get_mut(&item.id) {
                    col.position = item.position;
                    if !touched.contains(owner) {
                        touched.push(*owner);
                    }
                }
            }
            // Collisions from a partial item set are settled by id.
            for board_id in &touched {
                let order = state.ordered_columns(*board_id);
                state.renumber_columns(&order);
            }
            touched
        };
        for board_id in touched {
            self.board_changed(board_id);
        }
        Ok(())
    }

    async fn list_tasks(&self, column_id: ColumnId) -> Result<Vec<Task>, StoreError> {
        let state = self.read();
        if !state.columns.contains_key(&column_id) {
            return Err(StoreError::column(column_id));
        }
        Ok(state
            .ordered_tasks(column_id)
            .iter()
            .filter_map(|id| state.tasks.get(id).cloned())
            .collect())
    }

    async fn create_task(
        &self,
        column_id: ColumnId,
        task: &NewTask,
        position: i64,
    ) -> Result<Task, StoreError> {
        if is_blank(&task.name) {
            return Err(StoreError::Invalid("Task name is required".to_string()));
        }
        let (board_id, created) = {
            let mut state = self.write();
            let board_id = state
                .board_of_column(column_id)
                .ok_or(StoreError::column(column_id))?;
            if let Some(user_id) = task.assigned_user_id {
                if !state.user_exists(user_id) {
                    return Err(StoreError::user(user_id));
                }
            }
            let task_id = self.allocate_id();
            let mut order = state.ordered_tasks(column_id);
            let index = clamp_index(position, order.len());
            order.insert(index, task_id);
            state.tasks.insert(
                task_id,
                Task {
                    id: task_id,
                    name: task.name.trim().to_string(),
                    description: Some(task.description.clone()).filter(|d| !d.is_empty()),
                    position: index as i64,
                    board_column_id: column_id,
                    assigned_user_id: task.assigned_user_id,
                },
            );
            state.renumber_tasks(column_id, &order);
            let created = state
                .tasks
                .get(&task_id)
                .cloned()
                .ok_or(StoreError::task(task_id))?;
            (board_id, created)
        };
        self.board_changed(board_id);
        Ok(created)
    }

    async fn update_task(&self, task_id: TaskId, update: &TaskUpdate) -> Result<Task, StoreError> {
        if is_blank(&update.name) {
            return Err(StoreError::Invalid("Task name is required".to_string()));
        }
        let (board_id, updated) = {
            let mut state = self.write();
            if let Some(user_id) = update.assigned_user_id {
                if !state.user_exists(user_id) {
                    return Err(StoreError::user(user_id));
                }
            }
            let column_id = state
                .tasks
                .get(&task_id)
                .map(|t| t.board_column_id)
                .ok_or(StoreError::task(task_id))?;
            let board_id = state
                .board_of_column(column_id)
                .ok_or(StoreError::column(column_id))?;
            let task = state
                .tasks
                .get_mut(&task_id)
                .ok_or(StoreError::task(task_id))?;
            task.name = update.name.trim().to_string();
            task.description = Some(update.description.clone()).filter(|d| !d.is_empty());
            task.assigned_user_id = update.assigned_user_id;
            (board_id, task.clone())
        };
        self.board_changed(board_id);
        Ok(updated)
    }

    async fn assign_task(
        &self,
        task_id: TaskId,
        user_id: Option<UserId>,
    ) -> Result<Task, StoreError> {
        let (board_id, updated) = {
            let mut state = self.write();
            if let Some(user_id) = user_id {
                if !state.user_exists(user_id) {
                    return Err(StoreError::user(user_id));
                }
            }
            let column_id = state
                .tasks
                .get(&task_id)
                .map(|t| t.board_column_id)
                .ok_or(StoreError::task(task_id))?;
            let board_id = state
                .board_of_column(column_id)
                .ok_or(StoreError::column(column_id))?;
            let task = state
                .tasks
                .get_mut(&task_id)
                .ok_or(StoreError::task(task_id))?;
            task.assigned_user_id = user_id;
            (board_id, task.clone())
        };
        self.board_changed(board_id);
        Ok(updated)
    }

    async fn move_task(&self, task_id: TaskId, target: MoveTaskBody) -> Result<(), StoreError> {
        let touched = {
            let mut state = self.write();
            let source = state
                .tasks
                .get(&task_id)
                .map(|t| t.board_column_id)
                .ok_or(StoreError::task(task_id))?;
            let destination = target.board_column_id;
            let dest_board = state
                .board_of_column(destination)
                .ok_or(StoreError::column(destination))?;
            let source_board = state.board_of_column(source).unwrap_or(dest_board);

            let mut source_order = state.ordered_tasks(source);
            source_order.retain(|id| *id != task_id);
            if source != destination {
                state.renumber_tasks(source, &source_order);
            }

            let mut dest_order = if source == destination {
                source_order
            } else {
                state.ordered_tasks(destination)
            };
            let index = clamp_index(target.position, dest_order.len());
            dest_order.insert(index, task_id);
            state.renumber_tasks(destination, &dest_order);

            if source_board == dest_board {
                vec![dest_board]
            } else {
                vec![source_board, dest_board]
            }
        };
        for board_id in touched {
            self.board_changed(board_id);
        }
        Ok(())
    }

    async fn delete_task(&self, task_id: TaskId) -> Result<(), StoreError> {
        let board_id = {
            let mut state = self.write();
            let task = state
                .tasks
                .remove(&task_id)
                .ok_or(StoreError::task(task_id))?;
            let order = state.ordered_tasks(task.board_column_id);
            state.renumber_tasks(task.board_column_id, &order);
            state.board_of_column(task.board_column_id)
        };
        if let Some(board_id) = board_id {
            self.board_changed(board_id);
        }
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.read().users.clone())
    }
}

/// Initial content for a MemoryStore.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub boards: Vec<SeedBoard>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedBoard {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<SeedColumn>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedColumn {
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<SeedTask>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedTask {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assigned_user_id: Option<UserId>,
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid seed file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Seed {
    pub fn from_file(path: &Path) -> Result<Self, SeedError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
