//! The list of boards: load, drag-reorder, create, rename and delete.

use std::sync::Arc;

use crate::controller::{CommittedDrop, DropOutcome};
use crate::engine::{DropKind, PendingWrite};
use crate::notify::Notifier;
use crate::ordering::{array_move, reindex, Positioned};
use crate::store::{BoardStore, StoreError};
use crate::types::*;

pub struct BoardDirectory {
    store: Arc<dyn BoardStore>,
    boards: Vec<Board>,
    notifier: Notifier,
}

impl BoardDirectory {
    pub fn new(store: Arc<dyn BoardStore>, notifier: Notifier) -> Self {
        Self {
            store,
            boards: Vec::new(),
            notifier,
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Boards in display order.
    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn find(&self, board_id: BoardId) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == board_id)
    }

    pub async fn load(&mut self) -> Result<(), StoreError> {
        match self.store.list_boards().await {
            Ok(mut boards) => {
                boards.sort_by_key(|b| (b.position(), b.id));
                self.boards = boards;
                Ok(())
            }
            Err(e) => {
                log::error!(target: "taskboard.directory", "Failed to load boards: {}", e);
                self.notifier.error("Could not load boards");
                Err(e)
            }
        }
    }

    /// Drop board `active` onto board `over`. Applies the new order
    /// locally, persists it, and reloads the list if the write fails.
    pub async fn reorder(&mut self, active: BoardId, over: BoardId) -> DropOutcome {
        let Some(drop) = self.plan_reorder(active, over) else {
            return DropOutcome::Ignored;
        };
        match drop.write.send(self.store.as_ref()).await {
            Ok(()) => {
                if let Some(message) = drop.kind.success_message() {
                    self.notifier.success(message);
                }
                DropOutcome::Persisted(drop)
            }
            Err(error) => {
                log::error!(target: "taskboard.directory", "Board reorder rejected: {}", error);
                self.notifier.error(drop.kind.failure_message());
                let _ = self.load().await;
                DropOutcome::Reloaded { drop, error }
            }
        }
    }

    fn plan_reorder(&mut self, active: BoardId, over: BoardId) -> Option<CommittedDrop> {
        if active == over {
            return None;
        }
        let old_index = self.boards.iter().position(|b| b.id == active)?;
        let new_index = self.boards.iter().position(|b| b.id == over)?;
        array_move(&mut self.boards, old_index, new_index);
        reindex(&mut self.boards);
        Some(CommittedDrop {
            kind: DropKind::BoardReorder,
            write: PendingWrite::ReorderBoards {
                board_ids: self.boards.iter().map(|b| b.id).collect(),
            },
        })
    }

    /// Create a board at the end of the list.
    pub async fn create(&mut self, name: &str) -> Result<Board, StoreError> {
        if is_blank(name) {
            self.notifier.warning("Board name is required");
            return Err(StoreError::Invalid("Board name is required".to_string()));
        }
        let position = self.boards.len() as i64;
        match self.store.create_board(name, position).await {
            Ok(board) => {
                self.boards.push(board.clone());
                self.notifier.success("Board created");
                Ok(board)
            }
            Err(e) => {
                log::error!(target: "taskboard.directory", "Failed to create board: {}", e);
                self.notifier.error("Could not create board");
                Err(e)
            }
        }
    }

    pub async fn rename(&mut self, board_id: BoardId, name: &str) -> Result<Board, StoreError> {
        if is_blank(name) {
            self.notifier.warning("Board name is required");
            return Err(StoreError::Invalid("Board name is required".to_string()));
        }
        match self.store.rename_board(board_id, name).await {
            Ok(board) => {
                if let Some(slot) = self.boards.iter_mut().find(|b| b.id == board_id) {
                    slot.name = board.name.clone();
                }
                self.notifier.success("Board renamed");
                Ok(board)
            }
            Err(e) => {
                log::error!(target: "taskboard.directory", "Failed to rename board {}: {}", board_id, e);
                self.notifier.error("Could not rename board");
                Err(e)
            }
        }
    }

    pub async fn delete(&mut self, board_id: BoardId) -> Result<(), StoreError> {
        match self.store.delete_board(board_id).await {
            Ok(()) => {
                self.boards.retain(|b| b.id != board_id);
                reindex(&mut self.boards);
                self.notifier.success("Board deleted");
                Ok(())
            }
            Err(e) => {
                log::error!(target: "taskboard.directory", "Failed to delete board {}: {}", board_id, e);
                self.notifier.error("Could not delete board");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::drain;
    use crate::store::memory::MemoryStore;

    async fn directory_with(names: &[&str]) -> (Arc<MemoryStore>, BoardDirectory) {
        let store = Arc::new(MemoryStore::new());
        for (i, name) in names.iter().enumerate() {
            store.create_board(name, i as i64).await.unwrap();
        }
        let mut dir = BoardDirectory::new(store.clone(), Notifier::default());
        dir.load().await.unwrap();
        (store, dir)
    }

    fn names(boards: &[Board]) -> Vec<&str> {
        boards.iter().map(|b| b.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_reorder_persists_full_order() {
        let (store, mut dir) = directory_with(&["Alpha", "Beta", "Gamma"]).await;
        let mut rx = dir.notifier().subscribe();
        let alpha = dir.boards()[0].id;
        let gamma = dir.boards()[2].id;

        let outcome = dir.reorder(alpha, gamma).await;
        assert!(matches!(outcome, DropOutcome::Persisted(_)));
        assert_eq!(names(dir.boards()), vec!["Beta", "Gamma", "Alpha"]);
        assert_eq!(dir.boards()[2].position, Some(2));

        let server = store.list_boards().await.unwrap();
        assert_eq!(names(&server), vec!["Beta", "Gamma", "Alpha"]);
        assert_eq!(drain(&mut rx)[0].message, "Boards reordered");

        assert!(dir.reorder(alpha, alpha).await.is_ignored());
        assert!(dir.reorder(alpha, 9999).await.is_ignored());
    }

    #[tokio::test]
    async fn test_create_rename_delete() {
        let (store, mut dir) = directory_with(&["Alpha"]).await;
        let mut rx = dir.notifier().subscribe();

        assert!(dir.create("  ").await.is_err());
        let beta = dir.create("Beta").await.unwrap();
        assert_eq!(beta.position, Some(1));
        assert!(beta.created_at.is_some());

        dir.rename(beta.id, "Beta 2").await.unwrap();
        assert_eq!(dir.find(beta.id).unwrap().name, "Beta 2");

        let alpha = dir.boards()[0].id;
        dir.delete(alpha).await.unwrap();
        assert_eq!(names(dir.boards()), vec!["Beta 2"]);
        assert_eq!(dir.boards()[0].position, Some(0));
        assert_eq!(store.list_boards().await.unwrap().len(), 1);
        assert!(dir.delete(alpha).await.is_err());

        let messages: Vec<String> = drain(&mut rx).into_iter().map(|n| n.message).collect();
        assert_eq!(
            messages,
            vec![
                "Board name is required",
                "Board created",
                "Board renamed",
                "Board deleted",
                "Could not delete board"
            ]
        );
    }
}
