//! Board controller: owns the board cache, the drag session and a handle to
//! the remote store, and turns gestures and dialog actions into optimistic
//! cache updates plus remote writes.
//!
//! Failure policy:
//! - load failure: error notice, previous state kept
//! - rejected gesture write: error notice, full reload (no partial rollback)
//! - invalid gesture: ignored without a notice
//! - rejected create/update/delete: error notice, cache untouched

use std::sync::Arc;

use crate::cache::BoardCache;
use crate::drag::{resolve_over_column, DragSession, DragTarget, TaskOrigin};
use crate::engine::{self, DropKind, PendingWrite};
use crate::notify::Notifier;
use crate::store::{BoardStore, StoreError};
use crate::types::*;

/// A drop that was applied locally and still has to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedDrop {
    pub kind: DropKind,
    pub write: PendingWrite,
}

#[derive(Debug)]
pub enum DropOutcome {
    /// Nothing changed and nothing was sent.
    Ignored,
    /// The write was accepted.
    Persisted(CommittedDrop),
    /// The write was rejected and the board was reloaded from the store.
    Reloaded { drop: CommittedDrop, error: StoreError },
}

impl DropOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, DropOutcome::Ignored)
    }
}

pub struct BoardController {
    store: Arc<dyn BoardStore>,
    board_id: BoardId,
    cache: BoardCache,
    session: DragSession,
    notifier: Notifier,
    loading: bool,
}

impl BoardController {
    pub fn new(store: Arc<dyn BoardStore>, board_id: BoardId, notifier: Notifier) -> Self {
        Self {
            store,
            board_id,
            cache: BoardCache::new(),
            session: DragSession::new(),
            notifier,
            loading: false,
        }
    }

    pub fn board_id(&self) -> BoardId {
        self.board_id
    }

    pub fn cache(&self) -> &BoardCache {
        &self.cache
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn sorted_columns(&self) -> Vec<&BoardColumn> {
        self.cache.sorted_columns()
    }

    pub fn tasks(&self, column_id: ColumnId) -> &[Task] {
        self.cache.tasks(column_id)
    }

    pub fn users(&self) -> &[User] {
        self.cache.users()
    }

    /// (Re)load board, columns, tasks and users from the store.
    pub async fn load(&mut self) -> Result<(), StoreError> {
        self.loading = true;
        let result = self.cache.load(self.store.as_ref(), self.board_id).await;
        self.loading = false;
        if let Err(e) = &result {
            log::error!(target: "taskboard.controller", "Failed to load board {}: {}", self.board_id, e);
            self.notifier.error("Could not load board");
        }
        result
    }

    // ── Drag and drop ───────────────────────────────────────────────────

    pub fn on_drag_start(&mut self, dragged: DragTarget) {
        let origin = dragged
            .task_id()
            .and_then(|task_id| self.cache.locate(task_id))
            .map(|(column_id, index)| TaskOrigin { column_id, index });
        self.session.start(dragged, origin);
    }

    /// Track the hovered column and preview cross-column task moves.
    pub fn on_drag_over(&mut self, dragged: DragTarget, candidate: Option<DragTarget>) {
        let Some(candidate) = candidate else {
            return;
        };
        let DragTarget::Task(task_id) = dragged else {
            return;
        };
        self.session
            .set_over_column(resolve_over_column(&self.cache, candidate));

        if let DragTarget::Task(over_id) = candidate {
            if let Some(update) = engine::plan_preview(&self.cache, task_id, over_id) {
                self.cache.apply(update);
                self.session.mark_previewed();
            }
        }
    }

    /// End the gesture and apply its optimistic update. Returns the write
    /// still to be persisted, or `None` for a no-op.
    pub fn finish_drag(
        &mut self,
        dragged: DragTarget,
        over: Option<DragTarget>,
    ) -> Option<CommittedDrop> {
        // Present only when a hover preview rearranged the cache.
        let origin = self.session.finish();
        let task_id = dragged.task_id();
        let displaced = match (task_id, origin) {
            (Some(task_id), Some(origin)) if self.cache.column_of(task_id) != Some(origin.column_id) => {
                Some(origin)
            }
            _ => None,
        };

        let plan = match (over, task_id, origin) {
            (None, _, _) => None,
            (Some(over), Some(task_id), Some(origin)) if over == dragged => {
                engine::plan_commit_preview(&self.cache, task_id, origin)
            }
            (Some(over), _, _) => engine::plan_drop(&self.cache, dragged, over, displaced),
        };

        let Some(plan) = plan else {
            if let (Some(task_id), Some(origin)) = (task_id, origin) {
                if let Some(update) = engine::plan_rollback(&self.cache, task_id, origin) {
                    log::debug!(target: "taskboard.engine", "Rolled back preview of task {}", task_id);
                    self.cache.apply(update);
                }
            }
            return None;
        };

        log::debug!(target: "taskboard.engine", "{:?}: {:?}", plan.kind, plan.write);
        self.cache.apply(plan.update);
        Some(CommittedDrop {
            kind: plan.kind,
            write: plan.write,
        })
    }

    /// Send a committed drop. On rejection the whole board is reloaded.
    pub async fn persist(&mut self, drop: CommittedDrop) -> DropOutcome {
        match drop.write.send(self.store.as_ref()).await {
            Ok(()) => {
                if let Some(message) = drop.kind.success_message() {
                    self.notifier.success(message);
                }
                DropOutcome::Persisted(drop)
            }
            Err(error) => {
                log::error!(target: "taskboard.engine", "{}: {}", drop.kind.failure_message(), error);
                self.notifier.error(drop.kind.failure_message());
                // A failed reload has already raised its own notice.
                let _ = self.load().await;
                DropOutcome::Reloaded { drop, error }
            }
        }
    }

    pub async fn on_drag_end(&mut self, dragged: DragTarget, over: Option<DragTarget>) -> DropOutcome {
        match self.finish_drag(dragged, over) {
            Some(drop) => self.persist(drop).await,
            None => DropOutcome::Ignored,
        }
    }

    // ── Columns ─────────────────────────────────────────────────────────

    pub async fn create_column(&mut self, name: &str) -> Result<BoardColumn, StoreError> {
        if is_blank(name) {
            self.notifier.warning("Column name is required");
            return Err(StoreError::Invalid("Column name is required".to_string()));
        }
        let position = self.cache.column_count() as i64;
        match self.store.create_column(self.board_id, name, position).await {
            Ok(column) => {
                self.cache.push_column(column.clone());
                self.notifier.success("Column created");
                Ok(column)
            }
            Err(e) => {
                log::error!(target: "taskboard.controller", "Failed to create column: {}", e);
                self.notifier.error("Could not create column");
                Err(e)
            }
        }
    }

    /// Create several columns at consecutive positions after the last one.
    /// Columns created before a failure are kept.
    pub async fn create_columns(&mut self, names: &[String]) -> Result<Vec<BoardColumn>, StoreError> {
        let names: Vec<&str> = names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            self.notifier.warning("At least one column name is required");
            return Err(StoreError::Invalid("No column names given".to_string()));
        }

        let start = self.cache.column_count() as i64;
        let mut created = Vec::with_capacity(names.len());
        let mut failure = None;
        for (offset, name) in names.iter().enumerate() {
            match self
                .store
                .create_column(self.board_id, name, start + offset as i64)
                .await
            {
                Ok(column) => created.push(column),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        for column in &created {
            self.cache.push_column(column.clone());
        }
        match failure {
            None => {
                self.notifier
                    .success(format!("{} column(s) created", created.len()));
                Ok(created)
            }
            Some(e) => {
                log::error!(
                    target: "taskboard.controller",
                    "Bulk column creation stopped after {}: {}",
                    created.len(),
                    e
                );
                self.notifier.error("Could not create columns");
                Err(e)
            }
        }
    }

    // ── Tasks ───────────────────────────────────────────────────────────

    pub async fn create_task(&mut self, column_id: ColumnId, task: NewTask) -> Result<Task, StoreError> {
        if is_blank(&task.name) {
            self.notifier.warning("Task name is required");
            return Err(StoreError::Invalid("Task name is required".to_string()));
        }
        if !self.cache.has_column(column_id) {
            return Err(StoreError::column(column_id));
        }
        let position = self.cache.tasks(column_id).len() as i64;
        match self.store.create_task(column_id, &task, position).await {
            Ok(created) => {
                self.cache.push_task(created.clone());
                self.notifier.success("Task created");
                Ok(created)
            }
            Err(e) => {
                log::error!(target: "taskboard.controller", "Failed to create task: {}", e);
                self.notifier.error("Could not create task");
                Err(e)
            }
        }
    }

    pub async fn update_task(&mut self, task_id: TaskId, update: TaskUpdate) -> Result<Task, StoreError> {
        if is_blank(&update.name) {
            self.notifier.warning("Task name is required");
            return Err(StoreError::Invalid("Task name is required".to_string()));
        }
        match self.store.update_task(task_id, &update).await {
            Ok(task) => {
                self.cache.replace_task(task.clone());
                self.notifier.success("Task updated");
                Ok(task)
            }
            Err(e) => {
                log::error!(target: "taskboard.controller", "Failed to update task {}: {}", task_id, e);
                self.notifier.error("Could not update task");
                Err(e)
            }
        }
    }

    pub async fn assign_task(&mut self, task_id: TaskId, user_id: Option<UserId>) -> Result<Task, StoreError> {
        match self.store.assign_task(task_id, user_id).await {
            Ok(task) => {
                self.cache.replace_task(task.clone());
                self.notifier.success("Assignment updated");
                Ok(task)
            }
            Err(e) => {
                log::error!(target: "taskboard.controller", "Failed to assign task {}: {}", task_id, e);
                self.notifier.error("Could not assign task");
                Err(e)
            }
        }
    }

    pub async fn delete_task(&mut self, task_id: TaskId) -> Result<(), StoreError> {
        match self.store.delete_task(task_id).await {
            Ok(()) => {
                self.cache.remove_task(task_id);
                self.notifier.success("Task deleted");
                Ok(())
            }
            Err(e) => {
                log::error!(target: "taskboard.controller", "Failed to delete task {}: {}", task_id, e);
                self.notifier.error("Could not delete task");
                Err(e)
            }
        }
    }
}
