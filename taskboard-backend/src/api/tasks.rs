use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use taskboard_core::types::{ColumnId, Task, TaskId, TaskUpdate};
use taskboard_core::wire::{AssignTaskBody, CreateTaskBody, MoveTaskBody};
use taskboard_core::BoardStore;

use super::{store_error, ApiResult, JsonBody};
use crate::state::AppState;

pub async fn list_tasks(
    State(state): State<AppState>,
    Path(column_id): Path<ColumnId>,
) -> ApiResult<Json<Vec<Task>>> {
    state
        .store
        .list_tasks(column_id)
        .await
        .map(Json)
        .map_err(|e| store_error("taskboard.api.list_tasks", e))
}

pub async fn create_task(
    State(state): State<AppState>,
    Path(column_id): Path<ColumnId>,
    JsonBody(body): JsonBody<CreateTaskBody>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = state
        .store
        .create_task(column_id, &body.task, body.position)
        .await
        .map_err(|e| store_error("taskboard.api.create_task", e))?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<TaskId>,
    JsonBody(body): JsonBody<TaskUpdate>,
) -> ApiResult<Json<Task>> {
    state
        .store
        .update_task(task_id, &body)
        .await
        .map(Json)
        .map_err(|e| store_error("taskboard.api.update_task", e))
}

pub async fn assign_task(
    State(state): State<AppState>,
    Path(task_id): Path<TaskId>,
    JsonBody(body): JsonBody<AssignTaskBody>,
) -> ApiResult<Json<Task>> {
    state
        .store
        .assign_task(task_id, body.assigned_user_id)
        .await
        .map(Json)
        .map_err(|e| store_error("taskboard.api.assign_task", e))
}

pub async fn move_task(
    State(state): State<AppState>,
    Path(task_id): Path<TaskId>,
    JsonBody(body): JsonBody<MoveTaskBody>,
) -> ApiResult<StatusCode> {
    state
        .store
        .move_task(task_id, body)
        .await
        .map_err(|e| store_error("taskboard.api.move_task", e))?;
    log::debug!(
        target: "taskboard.api.move_task",
        "Task {} -> column {} @ {}",
        task_id,
        body.board_column_id,
        body.position
    );
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<TaskId>,
) -> ApiResult<StatusCode> {
    state
        .store
        .delete_task(task_id)
        .await
        .map_err(|e| store_error("taskboard.api.delete_task", e))?;
    Ok(StatusCode::NO_CONTENT)
}
