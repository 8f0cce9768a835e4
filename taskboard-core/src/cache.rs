//! In-memory state of the board currently being viewed.
//!
//! Holds the columns, the position-sorted task list of every column and a
//! reverse index task_id -> column_id kept in step with the lists. All
//! mutation goes through `apply` (one update per gesture) or the CRUD
//! helpers used after a confirmed create/update/delete.

use std::collections::HashMap;

use futures_util::future::try_join_all;

use crate::store::{BoardStore, StoreError};
use crate::types::*;

/// One atomic replacement of cached lists.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheUpdate {
    /// Replace the whole column list.
    Columns(Vec<BoardColumn>),
    /// Replace the task lists of one or two columns.
    Tasks(Vec<(ColumnId, Vec<Task>)>),
}

#[derive(Debug, Clone, Default)]
pub struct BoardCache {
    board: Option<Board>,
    columns: Vec<BoardColumn>,
    tasks_by_column: HashMap<ColumnId, Vec<Task>>,
    task_index: HashMap<TaskId, ColumnId>,
    users: Vec<User>,
}

impl BoardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch board, columns, every column's tasks (concurrently) and users.
    /// Only a failure of the user list is tolerated.
    pub async fn fetch(store: &dyn BoardStore, board_id: BoardId) -> Result<Self, StoreError> {
        let board = store.get_board(board_id).await?;
        let columns = store.list_columns(board_id).await?;

        let entries = try_join_all(columns.iter().map(|column| async move {
            store
                .list_tasks(column.id)
                .await
                .map(|tasks| (column.id, tasks))
        }))
        .await?;

        let users = match store.list_users().await {
            Ok(users) => users,
            Err(e) => {
                log::warn!(target: "taskboard.cache", "Could not load users: {}", e);
                Vec::new()
            }
        };

        let mut cache = BoardCache {
            board: Some(board),
            columns,
            users,
            ..Default::default()
        };
        for (column_id, mut tasks) in entries {
            tasks.sort_by_key(|t| (t.position, t.id));
            cache.insert_list(column_id, tasks);
        }
        Ok(cache)
    }

    /// Replace this cache with a fresh copy of `board_id`. On error the
    /// current state is left as it was.
    pub async fn load(&mut self, store: &dyn BoardStore, board_id: BoardId) -> Result<(), StoreError> {
        *self = Self::fetch(store, board_id).await?;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.board.is_some()
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, user_id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    /// Columns ordered by position, recomputed on every call.
    pub fn sorted_columns(&self) -> Vec<&BoardColumn> {
        let mut cols: Vec<&BoardColumn> = self.columns.iter().collect();
        cols.sort_by_key(|c| (c.position, c.id));
        cols
    }

    pub fn has_column(&self, column_id: ColumnId) -> bool {
        self.columns.iter().any(|c| c.id == column_id)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn tasks(&self, column_id: ColumnId) -> &[Task] {
        self.tasks_by_column
            .get(&column_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn column_of(&self, task_id: TaskId) -> Option<ColumnId> {
        self.task_index.get(&task_id).copied()
    }

    /// Owning column and index within it.
    pub fn locate(&self, task_id: TaskId) -> Option<(ColumnId, usize)> {
        let column_id = self.column_of(task_id)?;
        let index = self.tasks(column_id).iter().position(|t| t.id == task_id)?;
        Some((column_id, index))
    }

    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        let (column_id, index) = self.locate(task_id)?;
        self.tasks(column_id).get(index)
    }

    pub fn total_tasks(&self) -> usize {
        self.tasks_by_column.values().map(Vec::len).sum()
    }

    pub fn apply(&mut self, update: CacheUpdate) {
        match update {
            CacheUpdate::Columns(columns) => self.columns = columns,
            CacheUpdate::Tasks(lists) => {
                for (column_id, _) in &lists {
                    self.remove_list(*column_id);
                }
                for (column_id, tasks) in lists {
                    self.insert_list(column_id, tasks);
                }
            }
        }
    }

    pub fn push_column(&mut self, column: BoardColumn) {
        self.tasks_by_column.entry(column.id).or_default();
        self.columns.push(column);
    }

    pub fn push_task(&mut self, task: Task) {
        self.task_index.insert(task.id, task.board_column_id);
        self.tasks_by_column
            .entry(task.board_column_id)
            .or_default()
            .push(task);
    }

    /// Swap in a server copy of a task, keeping it where the cache holds it.
    pub fn replace_task(&mut self, task: Task) -> bool {
        let Some((column_id, index)) = self.locate(task.id) else {
            return false;
        };
        if let Some(slot) = self
            .tasks_by_column
            .get_mut(&column_id)
            .and_then(|tasks| tasks.get_mut(index))
        {
            *slot = Task {
                board_column_id: column_id,
                position: slot.position,
                ..task
            };
            return true;
        }
        false
    }

    /// Remove a task from whichever column holds it. Positions of the
    /// remaining tasks are left as they are.
    pub fn remove_task(&mut self, task_id: TaskId) -> Option<Task> {
        let column_id = self.task_index.remove(&task_id)?;
        let tasks = self.tasks_by_column.get_mut(&column_id)?;
        let index = tasks.iter().position(|t| t.id == task_id)?;
        Some(tasks.remove(index))
    }

    fn remove_list(&mut self, column_id: ColumnId) {
        if let Some(old) = self.tasks_by_column.remove(&column_id) {
            for task in old {
                if self.task_index.get(&task.id) == Some(&column_id) {
                    self.task_index.remove(&task.id);
                }
            }
        }
    }

    fn insert_list(&mut self, column_id: ColumnId, mut tasks: Vec<Task>) {
        for task in tasks.iter_mut() {
            task.board_column_id = column_id;
            self.task_index.insert(task.id, column_id);
        }
        self.tasks_by_column.insert(column_id, tasks);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::store::memory::{MemoryStore, Seed};
    use crate::ordering::is_dense;

    /// Board "Sprint": Todo=[t1,t2], Doing=[t3], Done=[].
    pub(crate) const SPRINT: &str = r#"{
        "users": [{"id": 100, "name": "Ana", "email": "ana@example.com"}],
        "boards": [{
            "name": "Sprint",
            "columns": [
                {"name": "Todo", "tasks": [{"name": "t1"}, {"name": "t2"}]},
                {"name": "Doing", "tasks": [{"name": "t3"}]},
                {"name": "Done"}
            ]
        }]
    }"#;

    pub(crate) fn sprint_store() -> MemoryStore {
        let seed: Seed = serde_json::from_str(SPRINT).unwrap();
        MemoryStore::from_seed(seed)
    }

    /// Every cached task is indexed under the column whose list holds it.
    pub(crate) fn assert_index_consistent(cache: &BoardCache) {
        let mut seen = 0;
        for (column_id, tasks) in &cache.tasks_by_column {
            for task in tasks {
                assert_eq!(cache.column_of(task.id), Some(*column_id));
                assert_eq!(task.board_column_id, *column_id);
                seen += 1;
            }
        }
        assert_eq!(seen, cache.task_index.len());
    }

    fn task(id: TaskId, column: ColumnId, position: i64) -> Task {
        Task {
            id,
            name: format!("t{}", id),
            description: None,
            position,
            board_column_id: column,
            assigned_user_id: None,
        }
    }

    #[tokio::test]
    async fn test_fetch_loads_everything_sorted() {
        let store = sprint_store();
        let board_id = store.list_boards().await.unwrap()[0].id;
        let cache = BoardCache::fetch(&store, board_id).await.unwrap();

        assert!(cache.is_loaded());
        assert_eq!(cache.board().unwrap().name, "Sprint");
        let names: Vec<&str> = cache.sorted_columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Todo", "Doing", "Done"]);
        assert_eq!(cache.total_tasks(), 3);
        assert_eq!(cache.users().len(), 1);
        for col in cache.sorted_columns() {
            assert!(is_dense(cache.tasks(col.id)));
        }
        assert_index_consistent(&cache);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_state() {
        let store = sprint_store();
        let board_id = store.list_boards().await.unwrap()[0].id;
        let mut cache = BoardCache::new();
        cache.load(&store, board_id).await.unwrap();

        let err = cache.load(&store, 9999).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert_eq!(cache.board().unwrap().id, board_id);
        assert_eq!(cache.total_tasks(), 3);
    }

    #[test]
    fn test_sorted_columns_is_a_projection() {
        let mut cache = BoardCache::new();
        cache.apply(CacheUpdate::Columns(vec![
            BoardColumn { id: 1, name: "b".into(), position: 1 },
            BoardColumn { id: 2, name: "a".into(), position: 0 },
        ]));
        let ids: Vec<ColumnId> = cache.sorted_columns().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(cache.columns[0].id, 1);
    }

    #[test]
    fn test_apply_two_lists_moves_index_entry() {
        let mut cache = BoardCache::new();
        cache.apply(CacheUpdate::Tasks(vec![
            (1, vec![task(10, 1, 0), task(11, 1, 1)]),
            (2, vec![task(20, 2, 0)]),
        ]));
        assert_eq!(cache.column_of(10), Some(1));

        cache.apply(CacheUpdate::Tasks(vec![
            (1, vec![task(11, 1, 0)]),
            (2, vec![task(10, 1, 0), task(20, 2, 1)]),
        ]));
        assert_eq!(cache.column_of(10), Some(2));
        assert_eq!(cache.tasks(2)[0].board_column_id, 2);
        assert_eq!(cache.locate(20), Some((2, 1)));
        assert_eq!(cache.total_tasks(), 3);
        assert_index_consistent(&cache);

        // Destination listed first must give the same result.
        cache.apply(CacheUpdate::Tasks(vec![
            (1, vec![task(10, 2, 0), task(11, 1, 1)]),
            (2, vec![task(20, 2, 0)]),
        ]));
        assert_eq!(cache.column_of(10), Some(1));
        assert_index_consistent(&cache);
    }

    #[test]
    fn test_crud_helpers() {
        let mut cache = BoardCache::new();
        cache.push_column(BoardColumn { id: 1, name: "Todo".into(), position: 0 });
        assert!(cache.has_column(1));
        assert!(cache.tasks(1).is_empty());

        cache.push_task(task(10, 1, 0));
        cache.push_task(task(11, 1, 1));

        let mut renamed = task(10, 99, 42);
        renamed.name = "renamed".into();
        assert!(cache.replace_task(renamed));
        let stored = cache.task(10).unwrap();
        assert_eq!(stored.name, "renamed");
        assert_eq!(stored.board_column_id, 1);
        assert_eq!(stored.position, 0);

        assert!(cache.remove_task(10).is_some());
        assert!(cache.remove_task(10).is_none());
        assert_eq!(cache.tasks(1)[0].position, 1);
        assert!(!cache.replace_task(task(10, 1, 0)));
        assert_index_consistent(&cache);
    }
}
