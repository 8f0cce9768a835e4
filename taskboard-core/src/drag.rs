//! Drag-and-drop identifiers and the transient state of one drag gesture.
//!
//! Textual tags used by sortable UI layers:
//!   column-{id}             the column itself (sortable header)
//!   column-{id}-droppable   the empty area of a column
//!   task-{id}               a task card

use std::fmt;
use std::str::FromStr;

use crate::cache::BoardCache;
use crate::types::{ColumnId, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragTarget {
    Column(ColumnId),
    Task(TaskId),
    ColumnDropZone(ColumnId),
}

impl DragTarget {
    pub fn task_id(&self) -> Option<TaskId> {
        match self {
            DragTarget::Task(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_task(&self) -> bool {
        matches!(self, DragTarget::Task(_))
    }
}

impl fmt::Display for DragTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DragTarget::Column(id) => write!(f, "column-{}", id),
            DragTarget::Task(id) => write!(f, "task-{}", id),
            DragTarget::ColumnDropZone(id) => write!(f, "column-{}-droppable", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized drag id: {0}")]
pub struct ParseDragTargetError(pub String);

impl FromStr for DragTarget {
    type Err = ParseDragTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseDragTargetError(s.to_string());
        if let Some(rest) = s.strip_prefix("task-") {
            return rest.parse().map(DragTarget::Task).map_err(|_| invalid());
        }
        if let Some(rest) = s.strip_prefix("column-") {
            return match rest.strip_suffix("-droppable") {
                Some(id) => id.parse().map(DragTarget::ColumnDropZone),
                None => rest.parse().map(DragTarget::Column),
            }
            .map_err(|_| invalid());
        }
        Err(invalid())
    }
}

/// Where a dragged task sat when the gesture began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskOrigin {
    pub column_id: ColumnId,
    pub index: usize,
}

#[derive(Debug, Clone, Default)]
pub struct DragSession {
    active: Option<DragTarget>,
    over_column: Option<ColumnId>,
    origin: Option<TaskOrigin>,
    previewed: bool,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, active: DragTarget, origin: Option<TaskOrigin>) {
        self.active = Some(active);
        self.over_column = None;
        self.origin = origin;
        self.previewed = false;
    }

    pub fn active(&self) -> Option<DragTarget> {
        self.active
    }

    pub fn over_column(&self) -> Option<ColumnId> {
        self.over_column
    }

    pub fn origin(&self) -> Option<TaskOrigin> {
        self.origin
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn set_over_column(&mut self, column_id: Option<ColumnId>) {
        self.over_column = column_id;
    }

    /// Whether a hover preview has rearranged the cache during this drag.
    pub fn previewed(&self) -> bool {
        self.previewed
    }

    pub fn mark_previewed(&mut self) {
        self.previewed = true;
    }

    /// Clear the session and hand back the task origin, but only when a
    /// preview happened: without one the cache still matches the drag start.
    pub fn finish(&mut self) -> Option<TaskOrigin> {
        self.active = None;
        self.over_column = None;
        let origin = self.origin.take();
        if std::mem::take(&mut self.previewed) {
            origin
        } else {
            None
        }
    }
}

/// Column a hovered target belongs to: the owner of a hovered task, or the
/// column of a hovered drop zone. Column headers resolve to nothing.
pub fn resolve_over_column(cache: &BoardCache, target: DragTarget) -> Option<ColumnId> {
    match target {
        DragTarget::Task(task_id) => cache.column_of(task_id),
        DragTarget::ColumnDropZone(column_id) => {
            cache.has_column(column_id).then_some(column_id)
        }
        DragTarget::Column(_) => None,
    }
}
