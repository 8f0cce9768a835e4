use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use taskboard_core::types::{BoardColumn, BoardId};
use taskboard_core::wire::{CreateColumnBody, ReorderColumnsBody};
use taskboard_core::BoardStore;

use super::{store_error, ApiResult, JsonBody};
use crate::state::AppState;

pub async fn list_columns(
    State(state): State<AppState>,
    Path(board_id): Path<BoardId>,
) -> ApiResult<Json<Vec<BoardColumn>>> {
    state
        .store
        .list_columns(board_id)
        .await
        .map(Json)
        .map_err(|e| store_error("taskboard.api.list_columns", e))
}

pub async fn create_column(
    State(state): State<AppState>,
    Path(board_id): Path<BoardId>,
    JsonBody(body): JsonBody<CreateColumnBody>,
) -> ApiResult<(StatusCode, Json<BoardColumn>)> {
    let column = state
        .store
        .create_column(board_id, &body.name, body.position)
        .await
        .map_err(|e| store_error("taskboard.api.create_column", e))?;
    Ok((StatusCode::CREATED, Json(column)))
}

/// Batched `{id, position}` update sent after a column drag.
pub async fn reorder_columns(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ReorderColumnsBody>,
) -> ApiResult<StatusCode> {
    state
        .store
        .reorder_columns(&body.items)
        .await
        .map_err(|e| store_error("taskboard.api.reorder_columns", e))?;
    log::debug!(target: "taskboard.api.reorder_columns", "Reordered {} columns", body.items.len());
    Ok(StatusCode::NO_CONTENT)
}
