//! Reorder/move planning for drag-and-drop gestures.
//!
//! Every function here is pure: it reads a [`BoardCache`] and returns the
//! cache update to apply optimistically plus the single write that persists
//! it. The controller applies the update, sends the write and reloads the
//! board if the write is rejected.
//!
//! Drop cases, in precedence order:
//! 1. column onto column: array-move, reindex every column, one batched reorder;
//! 2. task onto task in the same column: array-move, reindex, one move call;
//! 3. task onto task in another column: remove, insert at the target's index,
//!    reindex both lists, one move call;
//! 4. task onto another column's drop zone: append, close the source gap,
//!    one move call.

use crate::cache::{BoardCache, CacheUpdate};
use crate::drag::{DragTarget, TaskOrigin};
use crate::ordering::{array_move, reindex};
use crate::store::{BoardStore, StoreError};
use crate::types::*;
use crate::wire::MoveTaskBody;

/// A persistence request produced by a gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingWrite {
    ReorderColumns { items: Vec<PositionItem> },
    MoveTask { task_id: TaskId, target: MoveTaskBody },
    ReorderBoards { board_ids: Vec<BoardId> },
}

impl PendingWrite {
    pub async fn send(&self, store: &dyn BoardStore) -> Result<(), StoreError> {
        match self {
            PendingWrite::ReorderColumns { items } => store.reorder_columns(items).await,
            PendingWrite::MoveTask { task_id, target } => store.move_task(*task_id, *target).await,
            PendingWrite::ReorderBoards { board_ids } => store.reorder_boards(board_ids).await,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    ColumnReorder,
    TaskReorder,
    TaskMove,
    BoardReorder,
}

impl DropKind {
    /// Notice shown once the write is confirmed.
    pub fn success_message(&self) -> Option<&'static str> {
        match self {
            DropKind::ColumnReorder => Some("Columns reordered"),
            DropKind::TaskReorder => None,
            DropKind::TaskMove => Some("Task moved"),
            DropKind::BoardReorder => Some("Boards reordered"),
        }
    }

    /// Notice shown when the write is rejected.
    pub fn failure_message(&self) -> &'static str {
        match self {
            DropKind::ColumnReorder => "Could not reorder columns",
            DropKind::TaskReorder => "Could not reorder task",
            DropKind::TaskMove => "Could not move task",
            DropKind::BoardReorder => "Could not reorder boards",
        }
    }
}

/// Optimistic change plus the write that persists it.
#[derive(Debug, Clone, PartialEq)]
pub struct DropPlan {
    pub kind: DropKind,
    pub update: CacheUpdate,
    pub write: PendingWrite,
}

/// Plan a completed drop of `active` onto `over`. `None` means the gesture
/// is a no-op (self-drop, unknown ids, unchanged index, unsupported pair).
///
/// `origin` is the task's column at drag start when a hover preview has
/// since moved it elsewhere; its list is re-densified with the drop.
pub fn plan_drop(
    cache: &BoardCache,
    active: DragTarget,
    over: DragTarget,
    origin: Option<TaskOrigin>,
) -> Option<DropPlan> {
    if active == over {
        return None;
    }
    let plan = match (active, over) {
        (DragTarget::Column(dragged), DragTarget::Column(target)) => {
            return plan_column_reorder(cache, dragged, target);
        }
        (DragTarget::Task(task_id), DragTarget::Task(over_id)) => {
            plan_task_onto_task(cache, task_id, over_id)
        }
        (DragTarget::Task(task_id), DragTarget::ColumnDropZone(column_id)) => {
            plan_task_onto_column(cache, task_id, column_id)
        }
        _ => None,
    }?;
    Some(match origin {
        Some(origin) => close_origin_gap(cache, plan, origin),
        None => plan,
    })
}

fn plan_column_reorder(
    cache: &BoardCache,
    dragged: ColumnId,
    target: ColumnId,
) -> Option<DropPlan> {
    let mut columns: Vec<BoardColumn> = cache.sorted_columns().into_iter().cloned().collect();
    let old_index = columns.iter().position(|c| c.id == dragged)?;
    let new_index = columns.iter().position(|c| c.id == target)?;
    if old_index == new_index {
        return None;
    }

    array_move(&mut columns, old_index, new_index);
    reindex(&mut columns);

    let items = columns
        .iter()
        .map(|c| PositionItem {
            id: c.id,
            position: c.position,
        })
        .collect();
    Some(DropPlan {
        kind: DropKind::ColumnReorder,
        update: CacheUpdate::Columns(columns),
        write: PendingWrite::ReorderColumns { items },
    })
}

fn plan_task_onto_task(cache: &BoardCache, task_id: TaskId, over_id: TaskId) -> Option<DropPlan> {
    let source = cache.column_of(task_id)?;
    let target = cache.column_of(over_id)?;

    if source == target {
        let mut tasks = cache.tasks(source).to_vec();
        let old_index = tasks.iter().position(|t| t.id == task_id)?;
        let new_index = tasks.iter().position(|t| t.id == over_id)?;
        if old_index == new_index {
            return None;
        }
        array_move(&mut tasks, old_index, new_index);
        reindex(&mut tasks);
        return Some(DropPlan {
            kind: DropKind::TaskReorder,
            update: CacheUpdate::Tasks(vec![(source, tasks)]),
            write: move_write(task_id, source, new_index),
        });
    }

    let (mut source_tasks, moved) = take_task(cache, source, task_id)?;
    let mut target_tasks = cache.tasks(target).to_vec();
    let over_index = target_tasks.iter().position(|t| t.id == over_id)?;
    target_tasks.insert(over_index, moved);

    reindex(&mut source_tasks);
    reindex(&mut target_tasks);
    Some(DropPlan {
        kind: DropKind::TaskMove,
        update: CacheUpdate::Tasks(vec![(source, source_tasks), (target, target_tasks)]),
        write: move_write(task_id, target, over_index),
    })
}

fn plan_task_onto_column(
    cache: &BoardCache,
    task_id: TaskId,
    column_id: ColumnId,
) -> Option<DropPlan> {
    let source = cache.column_of(task_id)?;
    if source == column_id || !cache.has_column(column_id) {
        return None;
    }

    let (mut source_tasks, moved) = take_task(cache, source, task_id)?;
    let mut target_tasks = cache.tasks(column_id).to_vec();
    let new_position = target_tasks.len();
    target_tasks.push(moved);

    reindex(&mut source_tasks);
    reindex(&mut target_tasks);
    Some(DropPlan {
        kind: DropKind::TaskMove,
        update: CacheUpdate::Tasks(vec![(source, source_tasks), (column_id, target_tasks)]),
        write: move_write(task_id, column_id, new_position),
    })
}

/// Hover feedback: while a task is over a task of another column, show it
/// in that column at the hovered index. Positions are not reassigned and
/// nothing is persisted.
pub fn plan_preview(cache: &BoardCache, task_id: TaskId, over_id: TaskId) -> Option<CacheUpdate> {
    if task_id == over_id {
        return None;
    }
    let source = cache.column_of(task_id)?;
    let target = cache.column_of(over_id)?;
    if source == target {
        return None;
    }

    let (source_tasks, mut moved) = take_task(cache, source, task_id)?;
    moved.board_column_id = target;
    let mut target_tasks = cache.tasks(target).to_vec();
    let over_index = target_tasks.iter().position(|t| t.id == over_id)?;
    target_tasks.insert(over_index, moved);

    Some(CacheUpdate::Tasks(vec![
        (source, source_tasks),
        (target, target_tasks),
    ]))
}

/// A previewed task released on itself: persist the previewed placement.
/// Back in its own column there is nothing to commit and the caller rolls
/// the preview back instead.
pub fn plan_commit_preview(
    cache: &BoardCache,
    task_id: TaskId,
    origin: TaskOrigin,
) -> Option<DropPlan> {
    let (column_id, index) = cache.locate(task_id)?;
    if column_id == origin.column_id {
        return None;
    }
    let mut tasks = cache.tasks(column_id).to_vec();
    reindex(&mut tasks);
    let plan = DropPlan {
        kind: DropKind::TaskMove,
        update: CacheUpdate::Tasks(vec![(column_id, tasks)]),
        write: move_write(task_id, column_id, index),
    };
    Some(close_origin_gap(cache, plan, origin))
}

/// Undo a hover preview: put the task back at its drag-start column and
/// index. Previews never reassign positions, so this restores the lists
/// exactly, including when the task was hovered back into its own column.
pub fn plan_rollback(cache: &BoardCache, task_id: TaskId, origin: TaskOrigin) -> Option<CacheUpdate> {
    let (current, index) = cache.locate(task_id)?;
    if (current, index) == (origin.column_id, origin.index) || !cache.has_column(origin.column_id) {
        return None;
    }
    let (mut current_tasks, mut moved) = take_task(cache, current, task_id)?;
    moved.board_column_id = origin.column_id;

    if current == origin.column_id {
        let at = origin.index.min(current_tasks.len());
        current_tasks.insert(at, moved);
        return Some(CacheUpdate::Tasks(vec![(current, current_tasks)]));
    }

    let mut origin_tasks = cache.tasks(origin.column_id).to_vec();
    let at = origin.index.min(origin_tasks.len());
    origin_tasks.insert(at, moved);
    Some(CacheUpdate::Tasks(vec![
        (current, current_tasks),
        (origin.column_id, origin_tasks),
    ]))
}

/// After a preview the drag-start column no longer holds the task; fold a
/// re-densified copy of it into the plan and report the gesture as a move.
fn close_origin_gap(cache: &BoardCache, mut plan: DropPlan, origin: TaskOrigin) -> DropPlan {
    if let CacheUpdate::Tasks(lists) = &mut plan.update {
        if !lists.iter().any(|(column_id, _)| *column_id == origin.column_id)
            && cache.has_column(origin.column_id)
        {
            let mut origin_tasks = cache.tasks(origin.column_id).to_vec();
            reindex(&mut origin_tasks);
            lists.push((origin.column_id, origin_tasks));
        }
    }
    if plan.kind == DropKind::TaskReorder {
        if let PendingWrite::MoveTask { target, .. } = &plan.write {
            if target.board_column_id != origin.column_id {
                plan.kind = DropKind::TaskMove;
            }
        }
    }
    plan
}

/// Copy of a column's list without `task_id`, plus the removed task.
fn take_task(cache: &BoardCache, column_id: ColumnId, task_id: TaskId) -> Option<(Vec<Task>, Task)> {
    let mut tasks = cache.tasks(column_id).to_vec();
    let index = tasks.iter().position(|t| t.id == task_id)?;
    let task = tasks.remove(index);
    Some((tasks, task))
}

fn move_write(task_id: TaskId, column_id: ColumnId, index: usize) -> PendingWrite {
    PendingWrite::MoveTask {
        task_id,
        target: MoveTaskBody {
            board_column_id: column_id,
            position: index as i64,
        },
    }
}
